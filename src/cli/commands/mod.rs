pub mod auth;
pub mod candidate;
