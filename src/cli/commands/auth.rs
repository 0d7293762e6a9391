use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::api::client::ApiClient;
use crate::cli::config::FileSessionStorage;
use crate::cli::utils::{output_success, prompt_line};
use crate::cli::OutputFormat;
use crate::session::{login_failure_message, SessionState, SessionStore};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the PEMIRA backend")]
    Login {
        #[arg(help = "Admin email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and clear the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = SessionStore::new(Arc::new(FileSessionStorage::from_env()?));

    match cmd {
        AuthCommands::Login { email, password } => {
            // Mirror of the login view's mount guard: an already-resolved
            // session skips the credential exchange entirely.
            if let Some(session) = store.resolve()?.session() {
                return output_success(
                    &output_format,
                    &format!(
                        "Already signed in as {} ({})",
                        session.user.id, session.user.role
                    ),
                    None,
                );
            }

            let password = match password {
                Some(password) => password,
                None => prompt_line("Password")?,
            };

            let client = ApiClient::from_config()?;
            match store.submit_credentials(&client, &email, &password).await {
                Ok(session) => output_success(
                    &output_format,
                    &format!("Signed in as {} ({})", session.user.id, session.user.role),
                    Some(json!({ "user": session.user })),
                ),
                // Local validation keeps its own message; backend and
                // transport failures go through the priority extraction.
                Err(err @ crate::api::ApiError::Validation(_)) => Err(err.into()),
                Err(err) => Err(anyhow::anyhow!(login_failure_message(&err))),
            }
        }

        AuthCommands::Logout => {
            store.resolve()?;
            store.clear()?;
            output_success(&output_format, "Signed out", None)
        }

        AuthCommands::Status => match store.resolve()? {
            SessionState::Authenticated(session) => output_success(
                &output_format,
                &format!("Signed in as {} ({})", session.user.id, session.user.role),
                Some(json!({ "user": session.user })),
            ),
            _ => output_success(&output_format, "Not signed in", None),
        },
    }
}
