//! Spending transactions.

use chrono::{DateTime, Utc};

use ledgerly_core::{Transaction, UserError, UserId};
use ledgerly_store::{RocksStore, StagedBatch, StagedWrite, Store, StoreError};

use crate::error::ServiceError;

/// Record a spending transaction for an account.
pub fn record_transaction(
    store: &RocksStore,
    owner: &UserId,
    amount_cents: i64,
    category: String,
    description: String,
    date: Option<DateTime<Utc>>,
) -> Result<Transaction, ServiceError> {
    store.get_user(owner)?.ok_or_else(|| UserError::UserNotFound {
        user_id: owner.to_string(),
    })?;

    let transaction = Transaction::new(
        *owner,
        amount_cents,
        category,
        description,
        date.unwrap_or_else(Utc::now),
    );
    store.put_transaction(&transaction)?;

    tracing::debug!(owner = %owner, transaction_id = %transaction.id, "transaction recorded");
    Ok(transaction)
}

/// Stage deletions of every transaction owned by the account into the
/// caller's batch. Stages only; never commits.
pub fn add_transactions_deletions_to_batch(
    store: &RocksStore,
    user_id: &UserId,
    batch: &mut StagedBatch,
) -> Result<(), StoreError> {
    for transaction in store.transactions_for_user(user_id)? {
        batch.stage(StagedWrite::DeleteTransaction { id: transaction.id });
    }
    Ok(())
}
