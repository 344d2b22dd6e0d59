//! Notifications.

use ledgerly_core::{Notification, UserId};
use ledgerly_store::{RocksStore, StagedBatch, StagedWrite, Store, StoreError};

use crate::error::ServiceError;

/// Deliver a notification to an account.
pub fn push_notification(
    store: &RocksStore,
    recipient: &UserId,
    message: String,
) -> Result<Notification, ServiceError> {
    let notification = Notification::new(*recipient, message);
    store.put_notification(&notification)?;
    Ok(notification)
}

/// Stage deletions of every notification addressed to the account into the
/// caller's batch. Stages only; never commits.
pub fn add_notifications_deletions_to_batch(
    store: &RocksStore,
    user_id: &UserId,
    batch: &mut StagedBatch,
) -> Result<(), StoreError> {
    for notification in store.notifications_for_user(user_id)? {
        batch.stage(StagedWrite::DeleteNotification { id: notification.id });
    }
    Ok(())
}
