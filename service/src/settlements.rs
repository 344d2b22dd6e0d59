//! Debt settlements between accounts.

use ledgerly_core::{Settlement, UserError, UserId};
use ledgerly_store::{RocksStore, StagedBatch, StagedWrite, Store, StoreError};

use crate::error::ServiceError;

/// Record a settlement paid by one account to another.
pub fn record_settlement(
    store: &RocksStore,
    payer: &UserId,
    payee: &UserId,
    amount_cents: i64,
    note: Option<String>,
) -> Result<Settlement, ServiceError> {
    if payer == payee {
        return Err(UserError::SelfSettlement.into());
    }
    store.get_user(payee)?.ok_or_else(|| UserError::UserNotFound {
        user_id: payee.to_string(),
    })?;

    let settlement = Settlement::new(*payer, *payee, amount_cents, note);
    store.put_settlement(&settlement)?;

    tracing::debug!(payer = %payer, payee = %payee, settlement_id = %settlement.id, "settlement recorded");
    Ok(settlement)
}

/// Stage deletions of every settlement involving the account into the
/// caller's batch. Stages only; never commits.
pub fn add_settlements_deletions_to_batch(
    store: &RocksStore,
    user_id: &UserId,
    batch: &mut StagedBatch,
) -> Result<(), StoreError> {
    for settlement in store.settlements_for_user(user_id)? {
        batch.stage(StagedWrite::DeleteSettlement { id: settlement.id });
    }
    Ok(())
}
