use std::collections::HashMap;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::candidates::{Candidate, CandidateInput};
use crate::session::Role;

/// Destructive candidate actions. Each one is confirmed before executing and
/// offered only to super admins; the backend enforces the role independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    SoftDelete,
    Restore,
    PermanentDelete,
}

impl ActionKind {
    /// Presentation-layer role gate, the equivalent of hiding the button.
    pub fn allowed_for(&self, role: Role) -> bool {
        role.is_super_admin()
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ActionKind::SoftDelete => "soft-delete",
            ActionKind::Restore => "restore",
            ActionKind::PermanentDelete => "permanent-delete",
        }
    }
}

/// The single action awaiting confirmation. Requesting another action
/// overwrites this; destructive actions are never queued.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub candidate: Candidate,
}

/// Result of a confirmed, successfully executed action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub candidate: Candidate,
}

/// Candidate listing plus the confirm-then-execute state machine.
///
/// Listings are cached per `includeDeleted` filter. The manager never holds
/// authoritative candidate state: every mutation invalidates the cache and
/// refetches from the backend.
pub struct LifecycleManager {
    client: ApiClient,
    role: Role,
    listings: HashMap<bool, Vec<Candidate>>,
    current_filter: bool,
    pending: Option<PendingAction>,
}

impl LifecycleManager {
    pub fn new(client: ApiClient, role: Role) -> Self {
        Self {
            client,
            role,
            listings: HashMap::new(),
            current_filter: false,
            pending: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Which destructive actions the current role may take on a candidate.
    /// Active candidates offer soft-delete; deleted ones restore and
    /// permanent-delete. Regular admins get none of them.
    pub fn visible_actions(&self, candidate: &Candidate) -> Vec<ActionKind> {
        if !self.role.is_super_admin() {
            return Vec::new();
        }
        if candidate.is_deleted() {
            vec![ActionKind::Restore, ActionKind::PermanentDelete]
        } else {
            vec![ActionKind::SoftDelete]
        }
    }

    /// Cached listing for the given filter; fetches on first use.
    pub async fn listing(&mut self, include_deleted: bool) -> Result<Vec<Candidate>, ApiError> {
        self.current_filter = include_deleted;
        if let Some(cached) = self.listings.get(&include_deleted) {
            return Ok(cached.clone());
        }
        self.refetch(include_deleted).await
    }

    /// Fetch from the backend, replacing any cached listing for the filter.
    pub async fn refetch(&mut self, include_deleted: bool) -> Result<Vec<Candidate>, ApiError> {
        let candidates = self.client.list_candidates(include_deleted).await?;
        self.listings.insert(include_deleted, candidates.clone());
        Ok(candidates)
    }

    /// `POST /candidates`; no confirmation step, any admin may create.
    pub async fn create(&mut self, input: &CandidateInput) -> Result<(), ApiError> {
        tracing::info!(order = input.order_number, "creating candidate");
        self.client.create_candidate(input).await?;
        self.refetch_after_mutation().await;
        Ok(())
    }

    /// `PUT /candidates/{id}`; no confirmation step, any admin may update.
    pub async fn update(&mut self, id: &str, input: &CandidateInput) -> Result<(), ApiError> {
        tracing::info!(candidate = id, "updating candidate");
        self.client.update_candidate(id, input).await?;
        self.refetch_after_mutation().await;
        Ok(())
    }

    /// Stage a destructive action for confirmation, overwriting any action
    /// already pending.
    pub fn request(&mut self, kind: ActionKind, candidate: Candidate) -> Result<(), ApiError> {
        if !kind.allowed_for(self.role) {
            return Err(ApiError::Validation(format!(
                "{} requires the super_admin role",
                kind.describe()
            )));
        }
        self.pending = Some(PendingAction { kind, candidate });
        Ok(())
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Discard the pending action without issuing any request.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Execute the pending action: exactly one request, then a list refetch.
    ///
    /// Success is reported even when the refetch itself fails; a failed
    /// action clears the pending slot so the caller is back where it started.
    pub async fn confirm(&mut self) -> Result<ActionOutcome, ApiError> {
        let Some(PendingAction { kind, candidate }) = self.pending.take() else {
            return Err(ApiError::Validation(
                "no action is pending confirmation".to_string(),
            ));
        };

        tracing::info!(candidate = %candidate.id, action = kind.describe(), "executing candidate action");
        match kind {
            ActionKind::SoftDelete => self.client.soft_delete_candidate(&candidate.id).await?,
            ActionKind::Restore => self.client.restore_candidate(&candidate.id).await?,
            ActionKind::PermanentDelete => {
                self.client.permanent_delete_candidate(&candidate.id).await?
            }
        }

        self.refetch_after_mutation().await;
        Ok(ActionOutcome { kind, candidate })
    }

    async fn refetch_after_mutation(&mut self) {
        self.listings.clear();
        // A refetch failure is not surfaced to the caller; the next listing
        // call will fetch again anyway.
        if let Err(err) = self.refetch(self.current_filter).await {
            tracing::warn!(error = %err, "list refetch after mutation failed");
            self.listings.clear();
        }
    }
}
