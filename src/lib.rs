pub mod api;
pub mod candidates;
pub mod cli;
pub mod config;
pub mod session;
