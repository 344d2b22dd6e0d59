//! Core types for the ledgerly service.
//!
//! This crate defines the domain model shared by the store, service, and
//! client crates:
//!
//! - Strongly-typed identifiers (UUID and ULID based)
//! - User profiles and the public profile projection
//! - Username validation and normalization
//! - Friendships and circles with denormalized member snapshots
//! - Dependent data: transactions, recurring expenses, notifications,
//!   friend requests, settlements
//! - The domain error taxonomy

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod money;
pub mod profile;
pub mod social;
pub mod username;

pub use error::{Result, UserError};
pub use ids::{
    CircleId, FriendRequestId, FriendshipId, IdError, NotificationId, RecurringExpenseId,
    SettlementId, TransactionId, UserId,
};
pub use money::{
    Frequency, FriendRequest, Notification, RecurringExpense, Settlement, Transaction,
};
pub use profile::{
    default_categories, MemberSnapshot, ProfilePatch, PublicProfile, UserProfile, UserUpdate,
    DEFAULT_PRIMARY_COLOR,
};
pub use social::{Circle, Friendship};
pub use username::Username;
