use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::api::client::ApiClient;
use crate::candidates::{ActionKind, Candidate, CandidateInput, LifecycleManager};
use crate::cli::config::FileSessionStorage;
use crate::cli::utils::{confirm, output_success};
use crate::cli::OutputFormat;
use crate::session::guard::{Navigator, RenderDecision, SessionGuard};
use crate::session::{Session, SessionStore};

#[derive(Subcommand)]
pub enum CandidateCommands {
    #[command(about = "List candidates")]
    List {
        #[arg(long, help = "Include soft-deleted candidates")]
        include_deleted: bool,
    },

    #[command(about = "Create a candidate pair")]
    Create {
        #[arg(long, help = "Ballot position, starting at 1")]
        order_number: u32,
        #[arg(long, help = "Pair name, \"<Chair> & <ViceChair>\"")]
        name: String,
        #[arg(long)]
        vision: String,
        #[arg(long)]
        mission: String,
        #[arg(long)]
        photo_url: Option<String>,
    },

    #[command(about = "Update a candidate; omitted fields keep their value")]
    Update {
        #[arg(help = "Candidate ID")]
        id: String,
        #[arg(long)]
        order_number: Option<u32>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        vision: Option<String>,
        #[arg(long)]
        mission: Option<String>,
        #[arg(long)]
        photo_url: Option<String>,
    },

    #[command(about = "Soft-delete a candidate (restorable)")]
    Delete {
        #[arg(help = "Candidate ID")]
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Restore a soft-deleted candidate")]
    Restore {
        #[arg(help = "Candidate ID")]
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Permanently delete a candidate (irreversible)")]
    PermanentDelete {
        #[arg(help = "Candidate ID")]
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

/// Points an unauthenticated invocation at the login entry point.
struct LoginHint;

impl Navigator for LoginHint {
    fn redirect_to_login(&mut self) {
        eprintln!("Not signed in. Run `pemira auth login <email>` first.");
    }
}

fn authenticated_session() -> anyhow::Result<Session> {
    let store = SessionStore::new(Arc::new(FileSessionStorage::from_env()?));
    let state = store.resolve()?;

    let mut guard = SessionGuard::new();
    match guard.evaluate(&state, &mut LoginHint) {
        RenderDecision::Protected => state
            .session()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("session state out of sync")),
        _ => anyhow::bail!("authentication required"),
    }
}

pub async fn handle(cmd: CandidateCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = authenticated_session()?;
    let role = session.user.role;
    let client = ApiClient::from_config()?.with_token(session.token);
    let mut manager = LifecycleManager::new(client, role);

    match cmd {
        CandidateCommands::List { include_deleted } => {
            let candidates = manager.listing(include_deleted).await?;
            print_listing(&candidates, &output_format)
        }

        CandidateCommands::Create { order_number, name, vision, mission, photo_url } => {
            let input = CandidateInput { order_number, name, vision, mission, photo_url };
            manager.create(&input).await?;
            output_success(
                &output_format,
                &format!("Candidate #{} ({}) created", input.order_number, input.name),
                None,
            )
        }

        CandidateCommands::Update { id, order_number, name, vision, mission, photo_url } => {
            let existing = find_candidate(&mut manager, &id).await?;
            let input = CandidateInput {
                order_number: order_number.unwrap_or(existing.order_number),
                name: name.unwrap_or_else(|| existing.name.clone()),
                vision: vision.unwrap_or_else(|| existing.vision.clone()),
                mission: mission.unwrap_or_else(|| existing.mission.clone()),
                photo_url: photo_url.or_else(|| existing.photo_url.clone()),
            };
            manager.update(&id, &input).await?;
            output_success(
                &output_format,
                &format!("Candidate #{} ({}) updated", input.order_number, input.name),
                Some(json!({ "candidate": id })),
            )
        }

        CandidateCommands::Delete { id, yes } => {
            confirmed_action(&mut manager, ActionKind::SoftDelete, &id, yes, &output_format).await
        }

        CandidateCommands::Restore { id, yes } => {
            confirmed_action(&mut manager, ActionKind::Restore, &id, yes, &output_format).await
        }

        CandidateCommands::PermanentDelete { id, yes } => {
            confirmed_action(&mut manager, ActionKind::PermanentDelete, &id, yes, &output_format)
                .await
        }
    }
}

fn print_listing(candidates: &[Candidate], output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(candidates)?);
        }
        OutputFormat::Text => {
            if candidates.is_empty() {
                println!("No candidates found");
                return Ok(());
            }
            for candidate in candidates {
                let marker = if candidate.is_deleted() { " [deleted]" } else { "" };
                println!(
                    "#{} {} ({}){}",
                    candidate.order_number, candidate.name, candidate.id, marker
                );
            }
        }
    }
    Ok(())
}

async fn find_candidate(manager: &mut LifecycleManager, id: &str) -> anyhow::Result<Candidate> {
    // Search across deleted candidates too so restore/permanent work.
    let candidates = manager.listing(true).await?;
    candidates
        .iter()
        .find(|candidate| candidate.id == id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("candidate '{}' not found", id))
}

async fn confirmed_action(
    manager: &mut LifecycleManager,
    kind: ActionKind,
    id: &str,
    yes: bool,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let candidate = find_candidate(manager, id).await?;
    let label = format!("candidate #{} ({})", candidate.order_number, candidate.name);

    let prompt = match kind {
        ActionKind::SoftDelete => {
            format!("Soft-delete {}? The record can be restored later.", label)
        }
        ActionKind::Restore => {
            format!("Restore {}? It will reappear in the active listing.", label)
        }
        ActionKind::PermanentDelete => {
            format!("PERMANENTLY delete {}? This cannot be undone.", label)
        }
    };

    manager.request(kind, candidate)?;

    let proceed = yes || confirm(&prompt)?;
    if !proceed {
        manager.cancel();
        output_success(output_format, "Cancelled; no changes made", None)?;
        return Ok(());
    }

    let outcome = manager.confirm().await?;
    let message = match outcome.kind {
        ActionKind::SoftDelete => format!("Soft-deleted {}; it can be restored", label),
        ActionKind::Restore => format!("Restored {}", label),
        ActionKind::PermanentDelete => format!("Permanently deleted {}", label),
    };
    output_success(output_format, &message, Some(json!({ "candidate": outcome.candidate.id })))
}
