//! Recurring expenses.

use chrono::{DateTime, Utc};

use ledgerly_core::{Frequency, RecurringExpense, UserError, UserId};
use ledgerly_store::{RocksStore, StagedBatch, StagedWrite, Store, StoreError};

use crate::error::ServiceError;

/// Create a recurring expense for an account.
pub fn create_recurring_expense(
    store: &RocksStore,
    owner: &UserId,
    amount_cents: i64,
    category: String,
    description: String,
    frequency: Frequency,
    next_due: DateTime<Utc>,
) -> Result<RecurringExpense, ServiceError> {
    store.get_user(owner)?.ok_or_else(|| UserError::UserNotFound {
        user_id: owner.to_string(),
    })?;

    let expense = RecurringExpense::new(
        *owner,
        amount_cents,
        category,
        description,
        frequency,
        next_due,
    );
    store.put_recurring_expense(&expense)?;

    tracing::debug!(owner = %owner, expense_id = %expense.id, "recurring expense created");
    Ok(expense)
}

/// Stage deletions of every recurring expense owned by the account into the
/// caller's batch. Stages only; never commits.
pub fn add_recurring_expenses_deletions_to_batch(
    store: &RocksStore,
    user_id: &UserId,
    batch: &mut StagedBatch,
) -> Result<(), StoreError> {
    for expense in store.recurring_expenses_for_user(user_id)? {
        batch.stage(StagedWrite::DeleteRecurringExpense { id: expense.id });
    }
    Ok(())
}
