//! Database schema definitions and column families.
//!
//! Each logical collection gets its own column family; collections queried
//! by participant or owner get an additional index family whose keys are
//! `participant_id || document_key` with empty values.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Account documents, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Username reservations, keyed by the lowercased username.
    /// Value is the owning `user_id`.
    pub const USERNAMES: &str = "usernames";

    /// Index: accounts by email, keyed by `email || 0x00 || user_id`.
    /// Value is empty (index only). Emails are immutable, so entries are
    /// written once at account creation.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Friendship documents, keyed by the canonical user-id pair.
    pub const FRIENDSHIPS: &str = "friendships";

    /// Index: friendships by participant.
    pub const FRIENDSHIPS_BY_USER: &str = "friendships_by_user";

    /// Circle documents, keyed by `circle_id`.
    pub const CIRCLES: &str = "circles";

    /// Index: circles by member.
    pub const CIRCLES_BY_MEMBER: &str = "circles_by_member";

    /// Spending transactions, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: transactions by owner.
    pub const TRANSACTIONS_BY_USER: &str = "transactions_by_user";

    /// Recurring expenses, keyed by `recurring_expense_id`.
    pub const RECURRING_EXPENSES: &str = "recurring_expenses";

    /// Index: recurring expenses by owner.
    pub const RECURRING_EXPENSES_BY_USER: &str = "recurring_expenses_by_user";

    /// Notifications, keyed by `notification_id` (ULID).
    pub const NOTIFICATIONS: &str = "notifications";

    /// Index: notifications by recipient.
    pub const NOTIFICATIONS_BY_USER: &str = "notifications_by_user";

    /// Friend requests, keyed by `friend_request_id`.
    pub const FRIEND_REQUESTS: &str = "friend_requests";

    /// Index: friend requests by either participant.
    pub const FRIEND_REQUESTS_BY_USER: &str = "friend_requests_by_user";

    /// Settlements, keyed by `settlement_id`.
    pub const SETTLEMENTS: &str = "settlements";

    /// Index: settlements by either participant.
    pub const SETTLEMENTS_BY_USER: &str = "settlements_by_user";

    /// Deletion-in-progress markers, keyed by `user_id`.
    pub const DELETION_MARKERS: &str = "deletion_markers";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERNAMES,
        cf::USERS_BY_EMAIL,
        cf::FRIENDSHIPS,
        cf::FRIENDSHIPS_BY_USER,
        cf::CIRCLES,
        cf::CIRCLES_BY_MEMBER,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_USER,
        cf::RECURRING_EXPENSES,
        cf::RECURRING_EXPENSES_BY_USER,
        cf::NOTIFICATIONS,
        cf::NOTIFICATIONS_BY_USER,
        cf::FRIEND_REQUESTS,
        cf::FRIEND_REQUESTS_BY_USER,
        cf::SETTLEMENTS,
        cf::SETTLEMENTS_BY_USER,
        cf::DELETION_MARKERS,
    ]
}
