//! Error types for ledgerly domain operations.

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, UserError>;

/// Errors that can occur in user-service operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    /// The username does not match the allowed pattern.
    ///
    /// The message is part of the API contract and must not change.
    #[error(
        "Username must be 3-15 characters long and can only contain letters, numbers, and underscores."
    )]
    InvalidUsername,

    /// The username already has a reservation.
    #[error("Username \"{username}\" is already taken.")]
    UsernameTaken {
        /// The requested username.
        username: String,
    },

    /// Account not found.
    #[error("user not found: {user_id}")]
    UserNotFound {
        /// The user ID that was not found.
        user_id: String,
    },

    /// Account already exists.
    #[error("user already exists: {user_id}")]
    UserAlreadyExists {
        /// The user ID that already exists.
        user_id: String,
    },

    /// Circle not found.
    #[error("circle not found: {circle_id}")]
    CircleNotFound {
        /// The circle ID that was not found.
        circle_id: String,
    },

    /// The user is not a member of the circle.
    #[error("user {user_id} is not a member of circle {circle_id}")]
    NotAMember {
        /// The user ID.
        user_id: String,
        /// The circle ID.
        circle_id: String,
    },

    /// Friend request not found.
    #[error("friend request not found: {request_id}")]
    FriendRequestNotFound {
        /// The request ID that was not found.
        request_id: String,
    },

    /// A friend request or friendship would reference the sender itself.
    #[error("cannot befriend yourself")]
    SelfFriendship,

    /// A friendship already exists between the two accounts.
    #[error("users are already friends")]
    AlreadyFriends,

    /// A settlement's payer and payee are the same account.
    #[error("payer and payee must be different accounts")]
    SelfSettlement,

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] crate::ids::IdError),
}
