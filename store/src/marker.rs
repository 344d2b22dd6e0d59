//! Deletion-in-progress markers.
//!
//! The cascade deletion is a multi-stage workflow with no cross-stage
//! atomicity. A persisted marker records how far a cascade got, so an
//! interrupted deletion can be resumed (or audited) instead of leaving the
//! account half-cleaned with no trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerly_core::UserId;

/// The stages of the cascade, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeletionStage {
    /// Removing the account from every circle it belongs to.
    LeavingCircles,

    /// Deleting friendship documents referencing the account.
    DeletingFriendships,

    /// Staging dependent-data deletions, the username release, and the
    /// account soft-reset into the final atomic batch.
    ClearingData,
}

/// A persisted record of a cascade deletion in progress.
///
/// Written before the first stage, advanced between stages, and removed
/// inside the final atomic batch, so a completed cascade leaves no marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionMarker {
    /// The account being deleted.
    pub user_id: UserId,

    /// The stage the cascade is currently in.
    pub stage: DeletionStage,

    /// When the cascade first started.
    pub started_at: DateTime<Utc>,

    /// When the stage last advanced.
    pub updated_at: DateTime<Utc>,
}

impl DeletionMarker {
    /// Create a marker at the first stage.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            stage: DeletionStage::LeavingCircles,
            started_at: now,
            updated_at: now,
        }
    }

    /// Advance to a later stage.
    pub fn advance(&mut self, stage: DeletionStage) {
        debug_assert!(stage >= self.stage);
        self.stage = stage;
        self.updated_at = Utc::now();
    }
}
