//! Transaction, recurring-expense, and settlement handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use ledgerly_core::{Frequency, RecurringExpense, Settlement, Transaction, UserId};
use ledgerly_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::{recurring, settlements, transactions};

/// Record transaction request.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    /// Amount in cents.
    pub amount_cents: i64,
    /// Spending category.
    pub category: String,
    /// Description.
    pub description: String,
    /// When the spending happened (defaults to now).
    pub date: Option<DateTime<Utc>>,
}

/// Record a spending transaction.
pub async fn record_transaction(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<RecordTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = transactions::record_transaction(
        &state.store,
        &auth.user_id,
        body.amount_cents,
        body.category,
        body.description,
        body.date,
    )?;
    Ok(Json(transaction))
}

/// List the current user's transactions.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = state.store.transactions_for_user(&auth.user_id)?;
    Ok(Json(transactions))
}

/// Create recurring expense request.
#[derive(Debug, Deserialize)]
pub struct CreateRecurringExpenseRequest {
    /// Amount in cents per occurrence.
    pub amount_cents: i64,
    /// Spending category.
    pub category: String,
    /// Description.
    pub description: String,
    /// Repeat frequency.
    pub frequency: Frequency,
    /// Next due date.
    pub next_due: DateTime<Utc>,
}

/// Create a recurring expense.
pub async fn create_recurring_expense(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateRecurringExpenseRequest>,
) -> Result<Json<RecurringExpense>, ApiError> {
    let expense = recurring::create_recurring_expense(
        &state.store,
        &auth.user_id,
        body.amount_cents,
        body.category,
        body.description,
        body.frequency,
        body.next_due,
    )?;
    Ok(Json(expense))
}

/// List the current user's recurring expenses.
pub async fn list_recurring_expenses(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<RecurringExpense>>, ApiError> {
    let expenses = state.store.recurring_expenses_for_user(&auth.user_id)?;
    Ok(Json(expenses))
}

/// Record settlement request.
#[derive(Debug, Deserialize)]
pub struct RecordSettlementRequest {
    /// The account being paid.
    pub payee: UserId,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Optional note.
    pub note: Option<String>,
}

/// Record a settlement paid by the current user.
pub async fn record_settlement(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<RecordSettlementRequest>,
) -> Result<Json<Settlement>, ApiError> {
    let settlement = settlements::record_settlement(
        &state.store,
        &auth.user_id,
        &body.payee,
        body.amount_cents,
        body.note,
    )?;
    Ok(Json(settlement))
}

/// List the settlements the current user is a side of.
pub async fn list_settlements(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Settlement>>, ApiError> {
    let settlements = state.store.settlements_for_user(&auth.user_id)?;
    Ok(Json(settlements))
}
