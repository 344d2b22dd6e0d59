//! Request and response types for the ledgerly client.
//!
//! Documents the service returns verbatim (circles, friendships, friend
//! requests, transactions, recurring expenses, settlements, notifications,
//! public profiles) are deserialized straight into their `ledgerly-core`
//! types; this module only defines the shapes that exist solely at the API
//! boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerly_core::{Frequency, UserId};

/// Create account request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub display_name: String,
    /// Email address (immutable afterwards).
    pub email: String,
    /// Optional initial photo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Account response.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub user_id: String,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Reserved username, if any.
    pub username: Option<String>,
    /// Budget in cents.
    pub budget_cents: i64,
    /// Budget formatted as dollars.
    pub budget_formatted: String,
    /// Whether the user has set a budget.
    pub budget_is_set: bool,
    /// Profile photo URL.
    pub photo_url: Option<String>,
    /// Spending categories.
    pub categories: Vec<String>,
    /// Accent color preference.
    pub primary_color: String,
    /// Created timestamp.
    pub created_at: String,
}

/// Username availability response.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityResponse {
    /// The queried username.
    pub username: String,
    /// Whether it can be reserved.
    pub available: bool,
}

/// Record transaction request.
#[derive(Debug, Clone, Serialize)]
pub struct RecordTransactionRequest {
    /// Amount in cents.
    pub amount_cents: i64,
    /// Spending category.
    pub category: String,
    /// Description.
    pub description: String,
    /// When the spending happened (defaults to now on the server).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Create recurring expense request.
#[derive(Debug, Clone, Serialize)]
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

/// Record settlement request.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSettlementRequest {
    /// The account being paid.
    pub payee: UserId,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Optional note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// API error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// API error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}
