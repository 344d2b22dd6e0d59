//! Atomic write batches.
//!
//! A [`StagedBatch`] is a transient, in-memory accumulation of writes
//! against the store's collections. It is owned by the orchestrator for the
//! duration of one operation: collaborator modules stage into it, then the
//! orchestrator commits it through [`crate::RocksStore::commit`], which
//! applies every staged write in a single indivisible `RocksDB` write —
//! all of them take effect, or none do.

use ledgerly_core::{
    CircleId, FriendRequestId, Friendship, FriendshipId, NotificationId, ProfilePatch,
    RecurringExpenseId, SettlementId, TransactionId, UserId, Username,
};

/// One staged write against a specific document.
///
/// Merge operations resolve their target at commit time: a merge into a
/// missing account document fails the whole batch before anything is
/// written, while a merge into a missing relationship snapshot is skipped
/// (the relationship may have been deleted since the query).
#[derive(Debug, Clone)]
pub enum StagedWrite {
    /// Merge a profile patch into the account document.
    /// Fails the batch if the account does not exist.
    MergeProfile {
        /// The account to update.
        user_id: UserId,
        /// The fields to merge.
        patch: ProfilePatch,
    },

    /// Set the account document's username field.
    /// Fails the batch if the account does not exist.
    SetUsername {
        /// The account to update.
        user_id: UserId,
        /// The new username.
        username: Username,
    },

    /// Soft-reset the account document's mutable fields to their
    /// registration defaults. Fails the batch if the account does not
    /// exist.
    ResetUser {
        /// The account to reset.
        user_id: UserId,
    },

    /// Write a username reservation.
    PutUsername {
        /// The reserved username (lowercased).
        username: Username,
        /// The owning account.
        user_id: UserId,
    },

    /// Delete a username reservation. No-op if absent.
    DeleteUsername {
        /// The username to release.
        username: Username,
    },

    /// Create (or overwrite) a friendship document and its participant
    /// index entries.
    PutFriendship(Box<Friendship>),

    /// Delete a friendship document and its index entries. No-op if absent.
    DeleteFriendship {
        /// The pair identifier.
        id: FriendshipId,
    },

    /// Merge a profile patch into one participant's snapshot inside a
    /// friendship document. Skipped if the document or snapshot is absent.
    MergeFriendshipSnapshot {
        /// The pair identifier.
        id: FriendshipId,
        /// Whose snapshot to update.
        user_id: UserId,
        /// The fields to merge.
        patch: ProfilePatch,
    },

    /// Merge a profile patch into one member's snapshot inside a circle
    /// document. Skipped if the document or snapshot is absent.
    MergeCircleSnapshot {
        /// The circle.
        id: CircleId,
        /// Whose snapshot to update.
        user_id: UserId,
        /// The fields to merge.
        patch: ProfilePatch,
    },

    /// Delete a transaction and its owner index entry. No-op if absent.
    DeleteTransaction {
        /// The transaction to delete.
        id: TransactionId,
    },

    /// Delete a recurring expense and its owner index entry. No-op if absent.
    DeleteRecurringExpense {
        /// The recurring expense to delete.
        id: RecurringExpenseId,
    },

    /// Delete a notification and its recipient index entry. No-op if absent.
    DeleteNotification {
        /// The notification to delete.
        id: NotificationId,
    },

    /// Delete a friend request and both participant index entries.
    /// No-op if absent.
    DeleteFriendRequest {
        /// The request to delete.
        id: FriendRequestId,
    },

    /// Delete a settlement and both participant index entries.
    /// No-op if absent.
    DeleteSettlement {
        /// The settlement to delete.
        id: SettlementId,
    },

    /// Remove the deletion-in-progress marker for an account.
    DeleteDeletionMarker {
        /// The account whose marker to remove.
        user_id: UserId,
    },
}

/// An ordered accumulation of staged writes that commit atomically.
#[derive(Debug, Default)]
pub struct StagedBatch {
    writes: Vec<StagedWrite>,
}

impl StagedBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a write into the batch.
    pub fn stage(&mut self, write: StagedWrite) {
        self.writes.push(write);
    }

    /// Number of staged writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consume the batch, yielding the staged writes in order.
    #[must_use]
    pub(crate) fn into_writes(self) -> Vec<StagedWrite> {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_preserves_staging_order() {
        let mut batch = StagedBatch::new();
        assert!(batch.is_empty());

        let username = Username::parse("alice").unwrap();
        batch.stage(StagedWrite::DeleteUsername {
            username: username.clone(),
        });
        batch.stage(StagedWrite::PutUsername {
            username,
            user_id: UserId::generate(),
        });

        assert_eq!(batch.len(), 2);
        let writes = batch.into_writes();
        assert!(matches!(writes[0], StagedWrite::DeleteUsername { .. }));
        assert!(matches!(writes[1], StagedWrite::PutUsername { .. }));
    }
}
