//! `RocksDB` document storage layer for ledgerly.
//!
//! This crate persists the application's collections — accounts, username
//! reservations, friendships, circles, and the dependent data swept by the
//! deletion cascade — using `RocksDB` with one column family per collection
//! and index families for participant queries.
//!
//! # Atomic batches
//!
//! Multi-document operations stage their writes into a [`StagedBatch`] and
//! commit it through [`Store::commit`]. Every staged write resolves against
//! the current database state and lands in a single `RocksDB` `WriteBatch`,
//! so a commit either applies completely or not at all. Staged writes that
//! must find their target (account merges) fail the whole batch before
//! anything is written; staged deletes of already-gone documents are
//! no-ops.
//!
//! # Example
//!
//! ```no_run
//! use ledgerly_store::{RocksStore, Store};
//! use ledgerly_core::{UserId, UserProfile};
//!
//! let store = RocksStore::open("/tmp/ledgerly-db").unwrap();
//!
//! let user = UserProfile::new(
//!     UserId::generate(),
//!     "Alice".into(),
//!     "alice@example.com".into(),
//!     None,
//! );
//! store.put_user(&user).unwrap();
//!
//! let retrieved = store.get_user(&user.user_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod batch;
pub mod error;
pub mod keys;
pub mod marker;
pub mod rocks;
pub mod schema;

pub use batch::{StagedBatch, StagedWrite};
pub use error::{Result, StoreError};
pub use marker::{DeletionMarker, DeletionStage};
pub use rocks::RocksStore;

use ledgerly_core::{
    Circle, CircleId, FriendRequest, FriendRequestId, Friendship, FriendshipId, Notification,
    RecurringExpense, Settlement, Transaction, UserId, UserProfile, Username,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Accounts
    // =========================================================================

    /// Insert or update an account document (and its email-index entry).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_user(&self, user: &UserProfile) -> Result<()>;

    /// Get an account by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<UserProfile>>;

    /// Find accounts by exact email match, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_users_by_email(&self, email: &str, limit: usize) -> Result<Vec<UserProfile>>;

    // =========================================================================
    // Username reservations
    // =========================================================================

    /// Resolve a username reservation to its owning account, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_username_owner(&self, username: &Username) -> Result<Option<UserId>>;

    // =========================================================================
    // Friendships
    // =========================================================================

    /// Get a friendship by its pair identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_friendship(&self, id: &FriendshipId) -> Result<Option<Friendship>>;

    /// List every friendship the account participates in.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn friendships_for_user(&self, user_id: &UserId) -> Result<Vec<Friendship>>;

    // =========================================================================
    // Circles
    // =========================================================================

    /// Insert or update a circle document.
    ///
    /// The member index is diffed against the stored document, so members
    /// removed from the circle lose their index entries in the same write.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_circle(&self, circle: &Circle) -> Result<()>;

    /// Get a circle by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_circle(&self, id: &CircleId) -> Result<Option<Circle>>;

    /// Delete a circle document and its member-index entries.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the circle doesn't exist.
    fn delete_circle(&self, id: &CircleId) -> Result<()>;

    /// List every circle the account is a member of.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn circles_for_member(&self, user_id: &UserId) -> Result<Vec<Circle>>;

    // =========================================================================
    // Dependent data
    // =========================================================================

    /// Insert a spending transaction (and its owner-index entry).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// List an account's transactions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn transactions_for_user(&self, user_id: &UserId) -> Result<Vec<Transaction>>;

    /// Insert a recurring expense (and its owner-index entry).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_recurring_expense(&self, expense: &RecurringExpense) -> Result<()>;

    /// List an account's recurring expenses.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn recurring_expenses_for_user(&self, user_id: &UserId) -> Result<Vec<RecurringExpense>>;

    /// Insert a notification (and its recipient-index entry).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_notification(&self, notification: &Notification) -> Result<()>;

    /// List an account's notifications, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn notifications_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>>;

    /// Insert a friend request (indexed by both participants).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_friend_request(&self, request: &FriendRequest) -> Result<()>;

    /// Get a friend request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_friend_request(&self, id: &FriendRequestId) -> Result<Option<FriendRequest>>;

    /// List friend requests where the account is either side.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn friend_requests_for_user(&self, user_id: &UserId) -> Result<Vec<FriendRequest>>;

    /// Insert a settlement (indexed by both participants).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_settlement(&self, settlement: &Settlement) -> Result<()>;

    /// List settlements where the account is either side.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn settlements_for_user(&self, user_id: &UserId) -> Result<Vec<Settlement>>;

    // =========================================================================
    // Deletion markers
    // =========================================================================

    /// Write (or refresh) the deletion-in-progress marker for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_deletion_marker(&self, marker: &DeletionMarker) -> Result<()>;

    /// Get the deletion-in-progress marker for an account, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_deletion_marker(&self, user_id: &UserId) -> Result<Option<DeletionMarker>>;

    // =========================================================================
    // Atomic commit
    // =========================================================================

    /// Commit a staged batch in one indivisible write.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if a staged account merge targets a missing
    ///   document (nothing is written in that case).
    /// - `StoreError::Database` if the underlying write fails.
    fn commit(&self, batch: StagedBatch) -> Result<()>;
}
