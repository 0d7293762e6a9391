pub mod lifecycle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use lifecycle::{ActionKind, ActionOutcome, LifecycleManager, PendingAction};

/// A chair / vice-chair pair on the ballot.
///
/// `deleted_at == None` means the candidate is active and appears in the
/// default listing; soft-deleted candidates are only returned when the
/// listing asks for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    /// Ballot position, starting at 1.
    pub order_number: u32,
    /// Stored as "<chair> & <vice chair>".
    pub name: String,
    pub vision: String,
    pub mission: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Set by soft-delete, cleared by restore.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Chair half of the pair name.
    pub fn chair(&self) -> &str {
        self.name.split(" & ").next().unwrap_or(&self.name)
    }

    /// Vice-chair half, when the name follows the pair convention.
    pub fn vice_chair(&self) -> Option<&str> {
        self.name.split(" & ").nth(1)
    }
}

/// Create/update payload; ids are always server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInput {
    pub order_number: u32,
    pub name: String,
    pub vision: String,
    pub mission: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl From<&Candidate> for CandidateInput {
    fn from(candidate: &Candidate) -> Self {
        Self {
            order_number: candidate.order_number,
            name: candidate.name.clone(),
            vision: candidate.vision.clone(),
            mission: candidate.mission.clone(),
            photo_url: candidate.photo_url.clone(),
        }
    }
}
