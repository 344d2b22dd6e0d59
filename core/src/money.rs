//! Dependent-data documents: transactions, recurring expenses,
//! notifications, friend requests, settlements.
//!
//! Each of these collections is owned by (or references) accounts and is
//! swept by the deletion cascade. All amounts are integer cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{
    FriendRequestId, NotificationId, RecurringExpenseId, SettlementId, TransactionId, UserId,
};

/// A spending transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The account that recorded the transaction.
    pub owner: UserId,

    /// Amount in cents. Positive = spending, negative = refund.
    pub amount_cents: i64,

    /// Spending category.
    pub category: String,

    /// Human-readable description.
    pub description: String,

    /// When the spending happened.
    pub date: DateTime<Utc>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Record a new transaction.
    #[must_use]
    pub fn new(
        owner: UserId,
        amount_cents: i64,
        category: String,
        description: String,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            owner,
            amount_cents,
            category,
            description,
            date,
            created_at: Utc::now(),
        }
    }
}

/// How often a recurring expense repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every week.
    Weekly,
    /// Every month.
    Monthly,
    /// Every year.
    Yearly,
}

/// A recurring expense template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringExpense {
    /// Unique identifier.
    pub id: RecurringExpenseId,

    /// The account that owns the expense.
    pub owner: UserId,

    /// Amount in cents per occurrence.
    pub amount_cents: i64,

    /// Spending category.
    pub category: String,

    /// Human-readable description.
    pub description: String,

    /// Repeat frequency.
    pub frequency: Frequency,

    /// Next due date.
    pub next_due: DateTime<Utc>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl RecurringExpense {
    /// Create a new recurring expense.
    #[must_use]
    pub fn new(
        owner: UserId,
        amount_cents: i64,
        category: String,
        description: String,
        frequency: Frequency,
        next_due: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecurringExpenseId::generate(),
            owner,
            amount_cents,
            category,
            description,
            frequency,
            next_due,
            created_at: Utc::now(),
        }
    }
}

/// A notification delivered to one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier (ULID for time-ordering).
    pub id: NotificationId,

    /// The account the notification is for.
    pub recipient: UserId,

    /// Notification text.
    pub message: String,

    /// Whether the recipient has seen it.
    pub read: bool,

    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread notification.
    #[must_use]
    pub fn new(recipient: UserId, message: String) -> Self {
        Self {
            id: NotificationId::generate(),
            recipient,
            message,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// A pending friend request between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    /// Unique identifier.
    pub id: FriendRequestId,

    /// The account that sent the request.
    pub from: UserId,

    /// The account the request was sent to.
    pub to: UserId,

    /// When the request was sent.
    pub created_at: DateTime<Utc>,
}

impl FriendRequest {
    /// Create a pending request.
    #[must_use]
    pub fn new(from: UserId, to: UserId) -> Self {
        Self {
            id: FriendRequestId::generate(),
            from,
            to,
            created_at: Utc::now(),
        }
    }

    /// Whether the account is either side of the request.
    #[must_use]
    pub fn involves(&self, user_id: &UserId) -> bool {
        self.from == *user_id || self.to == *user_id
    }
}

/// A settlement of a debt between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier.
    pub id: SettlementId,

    /// The account that paid.
    pub payer: UserId,

    /// The account that was paid.
    pub payee: UserId,

    /// Amount in cents.
    pub amount_cents: i64,

    /// Optional note.
    pub note: Option<String>,

    /// When the settlement was recorded.
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    /// Record a settlement.
    #[must_use]
    pub fn new(payer: UserId, payee: UserId, amount_cents: i64, note: Option<String>) -> Self {
        Self {
            id: SettlementId::generate(),
            payer,
            payee,
            amount_cents,
            note,
            created_at: Utc::now(),
        }
    }

    /// Whether the account is either side of the settlement.
    #[must_use]
    pub fn involves(&self, user_id: &UserId) -> bool {
        self.payer == *user_id || self.payee == *user_id
    }
}
