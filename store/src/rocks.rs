//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait. Every document is stored CBOR-encoded in its collection's column
//! family; participant queries go through index families maintained
//! alongside the documents. Staged batches translate into a single
//! `RocksDB` `WriteBatch`, which is what gives commits their all-or-nothing
//! guarantee.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use ledgerly_core::{
    Circle, CircleId, FriendRequest, FriendRequestId, Friendship, FriendshipId, Notification,
    RecurringExpense, Settlement, Transaction, UserId, UserProfile, Username,
};

use crate::batch::{StagedBatch, StagedWrite};
use crate::error::{Result, StoreError};
use crate::keys;
use crate::marker::DeletionMarker;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Get one document from a collection.
    fn get_doc<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Write one document plus its participant-index entries atomically.
    fn put_indexed<T: serde::Serialize>(
        &self,
        doc_cf: &str,
        index_cf: &str,
        doc_key: &[u8],
        participants: &[UserId],
        value: &T,
    ) -> Result<()> {
        let cf_doc = self.cf(doc_cf)?;
        let cf_index = self.cf(index_cf)?;
        let bytes = Self::serialize(value)?;

        let mut wb = WriteBatch::default();
        wb.put_cf(&cf_doc, doc_key, &bytes);
        for participant in participants {
            wb.put_cf(&cf_index, keys::participant_index_key(participant, doc_key), []);
        }

        self.db
            .write(wb)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Collect the document keys indexed under a participant.
    fn doc_keys_for_participant(&self, index_cf: &str, participant: &UserId) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(index_cf)?;
        let prefix = keys::participant_prefix(participant);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut doc_keys = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            doc_keys.push(keys::extract_doc_key(&key).to_vec());
        }
        Ok(doc_keys)
    }

    /// Load every document of a collection indexed under a participant.
    ///
    /// Index entries whose document has since disappeared are skipped.
    fn load_for_participant<T: serde::de::DeserializeOwned>(
        &self,
        index_cf: &str,
        doc_cf: &str,
        participant: &UserId,
    ) -> Result<Vec<T>> {
        let doc_keys = self.doc_keys_for_participant(index_cf, participant)?;
        let mut docs = Vec::with_capacity(doc_keys.len());
        for key in doc_keys {
            if let Some(doc) = self.get_doc(doc_cf, &key)? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    /// Stage the deletion of one document plus its index entries.
    fn stage_indexed_delete(
        &self,
        wb: &mut WriteBatch,
        doc_cf: &str,
        index_cf: &str,
        doc_key: &[u8],
        participants: &[UserId],
    ) -> Result<()> {
        let cf_doc = self.cf(doc_cf)?;
        let cf_index = self.cf(index_cf)?;

        wb.delete_cf(&cf_doc, doc_key);
        for participant in participants {
            wb.delete_cf(&cf_index, keys::participant_index_key(participant, doc_key));
        }
        Ok(())
    }

    /// Translate one staged write into `RocksDB` batch operations.
    ///
    /// All reads happen here, before anything is written; an error leaves
    /// the database untouched.
    fn translate(&self, write: StagedWrite, wb: &mut WriteBatch) -> Result<()> {
        match write {
            StagedWrite::MergeProfile { user_id, patch } => {
                let mut user =
                    self.get_user(&user_id)?
                        .ok_or_else(|| StoreError::NotFound {
                            entity: "user",
                            id: user_id.to_string(),
                        })?;
                user.apply_patch(&patch);
                wb.put_cf(
                    &self.cf(cf::USERS)?,
                    keys::user_key(&user_id),
                    Self::serialize(&user)?,
                );
            }
            StagedWrite::SetUsername { user_id, username } => {
                let mut user =
                    self.get_user(&user_id)?
                        .ok_or_else(|| StoreError::NotFound {
                            entity: "user",
                            id: user_id.to_string(),
                        })?;
                user.username = Some(username);
                user.updated_at = chrono::Utc::now();
                wb.put_cf(
                    &self.cf(cf::USERS)?,
                    keys::user_key(&user_id),
                    Self::serialize(&user)?,
                );
            }
            StagedWrite::ResetUser { user_id } => {
                let mut user =
                    self.get_user(&user_id)?
                        .ok_or_else(|| StoreError::NotFound {
                            entity: "user",
                            id: user_id.to_string(),
                        })?;
                user.reset();
                wb.put_cf(
                    &self.cf(cf::USERS)?,
                    keys::user_key(&user_id),
                    Self::serialize(&user)?,
                );
            }
            StagedWrite::PutUsername { username, user_id } => {
                wb.put_cf(
                    &self.cf(cf::USERNAMES)?,
                    keys::username_key(&username),
                    user_id.as_bytes(),
                );
            }
            StagedWrite::DeleteUsername { username } => {
                wb.delete_cf(&self.cf(cf::USERNAMES)?, keys::username_key(&username));
            }
            StagedWrite::PutFriendship(friendship) => {
                let doc_key = keys::friendship_key(&friendship.id);
                wb.put_cf(&self.cf(cf::FRIENDSHIPS)?, &doc_key, Self::serialize(&friendship)?);
                let cf_index = self.cf(cf::FRIENDSHIPS_BY_USER)?;
                for participant in &friendship.user_ids {
                    wb.put_cf(&cf_index, keys::participant_index_key(participant, &doc_key), []);
                }
            }
            StagedWrite::DeleteFriendship { id } => {
                if let Some(friendship) = self.get_friendship(&id)? {
                    self.stage_indexed_delete(
                        wb,
                        cf::FRIENDSHIPS,
                        cf::FRIENDSHIPS_BY_USER,
                        &keys::friendship_key(&id),
                        &friendship.user_ids,
                    )?;
                }
            }
            StagedWrite::MergeFriendshipSnapshot { id, user_id, patch } => {
                if let Some(mut friendship) = self.get_friendship(&id)? {
                    if let Some(snapshot) = friendship.users.get_mut(&user_id) {
                        snapshot.merge(&patch);
                        wb.put_cf(
                            &self.cf(cf::FRIENDSHIPS)?,
                            keys::friendship_key(&id),
                            Self::serialize(&friendship)?,
                        );
                    }
                }
            }
            StagedWrite::MergeCircleSnapshot { id, user_id, patch } => {
                if let Some(mut circle) = self.get_circle(&id)? {
                    if let Some(snapshot) = circle.members.get_mut(&user_id) {
                        snapshot.merge(&patch);
                        circle.updated_at = chrono::Utc::now();
                        wb.put_cf(
                            &self.cf(cf::CIRCLES)?,
                            keys::circle_key(&id),
                            Self::serialize(&circle)?,
                        );
                    }
                }
            }
            StagedWrite::DeleteTransaction { id } => {
                if let Some(transaction) =
                    self.get_doc::<Transaction>(cf::TRANSACTIONS, &keys::transaction_key(&id))?
                {
                    self.stage_indexed_delete(
                        wb,
                        cf::TRANSACTIONS,
                        cf::TRANSACTIONS_BY_USER,
                        &keys::transaction_key(&id),
                        &[transaction.owner],
                    )?;
                }
            }
            StagedWrite::DeleteRecurringExpense { id } => {
                if let Some(expense) = self.get_doc::<RecurringExpense>(
                    cf::RECURRING_EXPENSES,
                    &keys::recurring_expense_key(&id),
                )? {
                    self.stage_indexed_delete(
                        wb,
                        cf::RECURRING_EXPENSES,
                        cf::RECURRING_EXPENSES_BY_USER,
                        &keys::recurring_expense_key(&id),
                        &[expense.owner],
                    )?;
                }
            }
            StagedWrite::DeleteNotification { id } => {
                if let Some(notification) =
                    self.get_doc::<Notification>(cf::NOTIFICATIONS, &keys::notification_key(&id))?
                {
                    self.stage_indexed_delete(
                        wb,
                        cf::NOTIFICATIONS,
                        cf::NOTIFICATIONS_BY_USER,
                        &keys::notification_key(&id),
                        &[notification.recipient],
                    )?;
                }
            }
            StagedWrite::DeleteFriendRequest { id } => {
                if let Some(request) = self
                    .get_doc::<FriendRequest>(cf::FRIEND_REQUESTS, &keys::friend_request_key(&id))?
                {
                    self.stage_indexed_delete(
                        wb,
                        cf::FRIEND_REQUESTS,
                        cf::FRIEND_REQUESTS_BY_USER,
                        &keys::friend_request_key(&id),
                        &[request.from, request.to],
                    )?;
                }
            }
            StagedWrite::DeleteSettlement { id } => {
                if let Some(settlement) =
                    self.get_doc::<Settlement>(cf::SETTLEMENTS, &keys::settlement_key(&id))?
                {
                    self.stage_indexed_delete(
                        wb,
                        cf::SETTLEMENTS,
                        cf::SETTLEMENTS_BY_USER,
                        &keys::settlement_key(&id),
                        &[settlement.payer, settlement.payee],
                    )?;
                }
            }
            StagedWrite::DeleteDeletionMarker { user_id } => {
                wb.delete_cf(
                    &self.cf(cf::DELETION_MARKERS)?,
                    keys::deletion_marker_key(&user_id),
                );
            }
        }
        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Accounts
    // =========================================================================

    fn put_user(&self, user: &UserProfile) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;

        let mut wb = WriteBatch::default();
        wb.put_cf(&cf_users, keys::user_key(&user.user_id), Self::serialize(user)?);
        // Emails are immutable, so rewriting the entry is idempotent.
        wb.put_cf(&cf_by_email, keys::email_index_key(&user.email, &user.user_id), []);

        self.db
            .write(wb)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        self.get_doc(cf::USERS, &keys::user_key(user_id))
    }

    fn find_users_by_email(&self, email: &str, limit: usize) -> Result<Vec<UserProfile>> {
        let cf = self.cf(cf::USERS_BY_EMAIL)?;
        let prefix = keys::email_prefix(email);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut users = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) || users.len() >= limit {
                break;
            }
            let user_id = keys::extract_user_id_from_email_key(&key);
            if let Some(user) = self.get_user(&user_id)? {
                users.push(user);
            }
        }
        Ok(users)
    }

    // =========================================================================
    // Username reservations
    // =========================================================================

    fn get_username_owner(&self, username: &Username) -> Result<Option<UserId>> {
        let cf = self.cf(cf::USERNAMES)?;
        let data = self
            .db
            .get_cf(&cf, keys::username_key(username))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        data.map(|bytes| {
            let bytes: [u8; 16] = bytes.as_slice().try_into().map_err(|_| {
                StoreError::Serialization("username reservation holds malformed user id".into())
            })?;
            Ok(UserId::from_bytes(bytes))
        })
        .transpose()
    }

    // =========================================================================
    // Friendships
    // =========================================================================

    fn get_friendship(&self, id: &FriendshipId) -> Result<Option<Friendship>> {
        self.get_doc(cf::FRIENDSHIPS, &keys::friendship_key(id))
    }

    fn friendships_for_user(&self, user_id: &UserId) -> Result<Vec<Friendship>> {
        self.load_for_participant(cf::FRIENDSHIPS_BY_USER, cf::FRIENDSHIPS, user_id)
    }

    // =========================================================================
    // Circles
    // =========================================================================

    fn put_circle(&self, circle: &Circle) -> Result<()> {
        let cf_circles = self.cf(cf::CIRCLES)?;
        let cf_index = self.cf(cf::CIRCLES_BY_MEMBER)?;
        let doc_key = keys::circle_key(&circle.id);

        let previous = self.get_circle(&circle.id)?;

        let mut wb = WriteBatch::default();
        if let Some(previous) = previous {
            for member in previous
                .member_ids
                .iter()
                .filter(|member| !circle.is_member(member))
            {
                wb.delete_cf(&cf_index, keys::participant_index_key(member, &doc_key));
            }
        }
        for member in &circle.member_ids {
            wb.put_cf(&cf_index, keys::participant_index_key(member, &doc_key), []);
        }
        wb.put_cf(&cf_circles, &doc_key, Self::serialize(circle)?);

        self.db
            .write(wb)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_circle(&self, id: &CircleId) -> Result<Option<Circle>> {
        self.get_doc(cf::CIRCLES, &keys::circle_key(id))
    }

    fn delete_circle(&self, id: &CircleId) -> Result<()> {
        let circle = self.get_circle(id)?.ok_or_else(|| StoreError::NotFound {
            entity: "circle",
            id: id.to_string(),
        })?;

        let mut wb = WriteBatch::default();
        self.stage_indexed_delete(
            &mut wb,
            cf::CIRCLES,
            cf::CIRCLES_BY_MEMBER,
            &keys::circle_key(id),
            &circle.member_ids,
        )?;

        self.db
            .write(wb)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn circles_for_member(&self, user_id: &UserId) -> Result<Vec<Circle>> {
        self.load_for_participant(cf::CIRCLES_BY_MEMBER, cf::CIRCLES, user_id)
    }

    // =========================================================================
    // Dependent data
    // =========================================================================

    fn put_transaction(&self, transaction: &Transaction) -> Result<()> {
        self.put_indexed(
            cf::TRANSACTIONS,
            cf::TRANSACTIONS_BY_USER,
            &keys::transaction_key(&transaction.id),
            &[transaction.owner],
            transaction,
        )
    }

    fn transactions_for_user(&self, user_id: &UserId) -> Result<Vec<Transaction>> {
        self.load_for_participant(cf::TRANSACTIONS_BY_USER, cf::TRANSACTIONS, user_id)
    }

    fn put_recurring_expense(&self, expense: &RecurringExpense) -> Result<()> {
        self.put_indexed(
            cf::RECURRING_EXPENSES,
            cf::RECURRING_EXPENSES_BY_USER,
            &keys::recurring_expense_key(&expense.id),
            &[expense.owner],
            expense,
        )
    }

    fn recurring_expenses_for_user(&self, user_id: &UserId) -> Result<Vec<RecurringExpense>> {
        self.load_for_participant(
            cf::RECURRING_EXPENSES_BY_USER,
            cf::RECURRING_EXPENSES,
            user_id,
        )
    }

    fn put_notification(&self, notification: &Notification) -> Result<()> {
        self.put_indexed(
            cf::NOTIFICATIONS,
            cf::NOTIFICATIONS_BY_USER,
            &keys::notification_key(&notification.id),
            &[notification.recipient],
            notification,
        )
    }

    fn notifications_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>> {
        self.load_for_participant(cf::NOTIFICATIONS_BY_USER, cf::NOTIFICATIONS, user_id)
    }

    fn put_friend_request(&self, request: &FriendRequest) -> Result<()> {
        self.put_indexed(
            cf::FRIEND_REQUESTS,
            cf::FRIEND_REQUESTS_BY_USER,
            &keys::friend_request_key(&request.id),
            &[request.from, request.to],
            request,
        )
    }

    fn get_friend_request(&self, id: &FriendRequestId) -> Result<Option<FriendRequest>> {
        self.get_doc(cf::FRIEND_REQUESTS, &keys::friend_request_key(id))
    }

    fn friend_requests_for_user(&self, user_id: &UserId) -> Result<Vec<FriendRequest>> {
        self.load_for_participant(cf::FRIEND_REQUESTS_BY_USER, cf::FRIEND_REQUESTS, user_id)
    }

    fn put_settlement(&self, settlement: &Settlement) -> Result<()> {
        self.put_indexed(
            cf::SETTLEMENTS,
            cf::SETTLEMENTS_BY_USER,
            &keys::settlement_key(&settlement.id),
            &[settlement.payer, settlement.payee],
            settlement,
        )
    }

    fn settlements_for_user(&self, user_id: &UserId) -> Result<Vec<Settlement>> {
        self.load_for_participant(cf::SETTLEMENTS_BY_USER, cf::SETTLEMENTS, user_id)
    }

    // =========================================================================
    // Deletion markers
    // =========================================================================

    fn put_deletion_marker(&self, marker: &DeletionMarker) -> Result<()> {
        let cf = self.cf(cf::DELETION_MARKERS)?;
        self.db
            .put_cf(
                &cf,
                keys::deletion_marker_key(&marker.user_id),
                Self::serialize(marker)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_deletion_marker(&self, user_id: &UserId) -> Result<Option<DeletionMarker>> {
        self.get_doc(cf::DELETION_MARKERS, &keys::deletion_marker_key(user_id))
    }

    // =========================================================================
    // Atomic commit
    // =========================================================================

    fn commit(&self, batch: StagedBatch) -> Result<()> {
        let staged = batch.len();
        let mut wb = WriteBatch::default();
        for write in batch.into_writes() {
            self.translate(write, &mut wb)?;
        }

        self.db
            .write(wb)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(staged, "batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerly_core::{MemberSnapshot, ProfilePatch};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn test_user(name: &str) -> UserProfile {
        UserProfile::new(
            UserId::generate(),
            name.to_string(),
            format!("{name}@example.com"),
            None,
        )
    }

    #[test]
    fn user_crud_and_email_index() {
        let (store, _dir) = create_test_store();
        let user = test_user("alice");

        store.put_user(&user).unwrap();

        let retrieved = store.get_user(&user.user_id).unwrap().unwrap();
        assert_eq!(retrieved.display_name, "alice");

        let by_email = store.find_users_by_email("alice@example.com", 10).unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].user_id, user.user_id);

        assert!(store.find_users_by_email("nobody@example.com", 10).unwrap().is_empty());
    }

    #[test]
    fn email_query_respects_limit() {
        let (store, _dir) = create_test_store();
        for _ in 0..4 {
            let mut user = test_user("dup");
            user.email = "shared@example.com".into();
            store.put_user(&user).unwrap();
        }

        let capped = store.find_users_by_email("shared@example.com", 3).unwrap();
        assert_eq!(capped.len(), 3);
    }

    #[test]
    fn username_reservation_via_batch() {
        let (store, _dir) = create_test_store();
        let user = test_user("alice");
        store.put_user(&user).unwrap();

        let username = Username::parse("Alice_42").unwrap();
        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::PutUsername {
            username: username.clone(),
            user_id: user.user_id,
        });
        batch.stage(StagedWrite::SetUsername {
            user_id: user.user_id,
            username: username.clone(),
        });
        store.commit(batch).unwrap();

        assert_eq!(store.get_username_owner(&username).unwrap(), Some(user.user_id));
        let updated = store.get_user(&user.user_id).unwrap().unwrap();
        assert_eq!(updated.username, Some(username));
    }

    #[test]
    fn friendship_batch_maintains_both_index_sides() {
        let (store, _dir) = create_test_store();
        let alice = test_user("alice");
        let bob = test_user("bob");
        store.put_user(&alice).unwrap();
        store.put_user(&bob).unwrap();

        let friendship = Friendship::new(&alice, &bob);
        let id = friendship.id;

        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::PutFriendship(Box::new(friendship)));
        store.commit(batch).unwrap();

        assert_eq!(store.friendships_for_user(&alice.user_id).unwrap().len(), 1);
        assert_eq!(store.friendships_for_user(&bob.user_id).unwrap().len(), 1);

        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::DeleteFriendship { id });
        store.commit(batch).unwrap();

        assert!(store.friendships_for_user(&alice.user_id).unwrap().is_empty());
        assert!(store.friendships_for_user(&bob.user_id).unwrap().is_empty());
        assert!(store.get_friendship(&id).unwrap().is_none());
    }

    #[test]
    fn circle_put_diffs_membership_index() {
        let (store, _dir) = create_test_store();
        let alice = test_user("alice");
        let bob = test_user("bob");

        let mut circle = Circle::new("Trip".into(), &alice);
        circle.add_member(&bob);
        store.put_circle(&circle).unwrap();

        assert_eq!(store.circles_for_member(&alice.user_id).unwrap().len(), 1);
        assert_eq!(store.circles_for_member(&bob.user_id).unwrap().len(), 1);

        circle.remove_member(&alice.user_id);
        store.put_circle(&circle).unwrap();

        assert!(store.circles_for_member(&alice.user_id).unwrap().is_empty());
        assert_eq!(store.circles_for_member(&bob.user_id).unwrap().len(), 1);
    }

    #[test]
    fn delete_circle_clears_member_index() {
        let (store, _dir) = create_test_store();
        let alice = test_user("alice");
        let circle = Circle::new("Trip".into(), &alice);
        store.put_circle(&circle).unwrap();

        store.delete_circle(&circle.id).unwrap();

        assert!(store.get_circle(&circle.id).unwrap().is_none());
        assert!(store.circles_for_member(&alice.user_id).unwrap().is_empty());
    }

    #[test]
    fn commit_is_all_or_nothing() {
        let (store, _dir) = create_test_store();
        let user = test_user("alice");
        store.put_user(&user).unwrap();

        let username = Username::parse("alice").unwrap();
        let mut setup = StagedBatch::new();
        setup.stage(StagedWrite::PutUsername {
            username: username.clone(),
            user_id: user.user_id,
        });
        store.commit(setup).unwrap();

        // The merge targets a missing account, so the whole batch must fail
        // with the reservation deletion unapplied.
        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::DeleteUsername {
            username: username.clone(),
        });
        batch.stage(StagedWrite::MergeProfile {
            user_id: UserId::generate(),
            patch: ProfilePatch {
                display_name: Some("ghost".into()),
                photo_url: None,
            },
        });

        let result = store.commit(batch);
        assert!(matches!(result, Err(StoreError::NotFound { entity: "user", .. })));
        assert_eq!(store.get_username_owner(&username).unwrap(), Some(user.user_id));
    }

    #[test]
    fn snapshot_merge_skips_missing_documents() {
        let (store, _dir) = create_test_store();

        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::MergeFriendshipSnapshot {
            id: FriendshipId::new(UserId::generate(), UserId::generate()),
            user_id: UserId::generate(),
            patch: ProfilePatch::default(),
        });
        batch.stage(StagedWrite::MergeCircleSnapshot {
            id: CircleId::generate(),
            user_id: UserId::generate(),
            patch: ProfilePatch::default(),
        });

        store.commit(batch).unwrap();
    }

    #[test]
    fn snapshot_merge_updates_only_supplied_fields() {
        let (store, _dir) = create_test_store();
        let mut alice = test_user("alice");
        alice.photo_url = Some("https://img.example/alice.png".into());
        let bob = test_user("bob");
        store.put_user(&alice).unwrap();
        store.put_user(&bob).unwrap();

        let friendship = Friendship::new(&alice, &bob);
        let id = friendship.id;
        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::PutFriendship(Box::new(friendship)));
        store.commit(batch).unwrap();

        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::MergeFriendshipSnapshot {
            id,
            user_id: alice.user_id,
            patch: ProfilePatch {
                display_name: Some("Alicia".into()),
                photo_url: None,
            },
        });
        store.commit(batch).unwrap();

        let friendship = store.get_friendship(&id).unwrap().unwrap();
        let snapshot: &MemberSnapshot = &friendship.users[&alice.user_id];
        assert_eq!(snapshot.display_name, "Alicia");
        assert_eq!(snapshot.photo_url.as_deref(), Some("https://img.example/alice.png"));
        assert_eq!(friendship.users[&bob.user_id].display_name, "bob");
    }

    #[test]
    fn dependent_data_deletes_clear_indexes() {
        let (store, _dir) = create_test_store();
        let alice = test_user("alice");
        let bob = test_user("bob");

        let transaction = Transaction::new(
            alice.user_id,
            1_250,
            "Food".into(),
            "Lunch".into(),
            chrono::Utc::now(),
        );
        store.put_transaction(&transaction).unwrap();

        let settlement = Settlement::new(alice.user_id, bob.user_id, 5_000, None);
        store.put_settlement(&settlement).unwrap();

        assert_eq!(store.transactions_for_user(&alice.user_id).unwrap().len(), 1);
        assert_eq!(store.settlements_for_user(&bob.user_id).unwrap().len(), 1);

        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::DeleteTransaction { id: transaction.id });
        batch.stage(StagedWrite::DeleteSettlement { id: settlement.id });
        store.commit(batch).unwrap();

        assert!(store.transactions_for_user(&alice.user_id).unwrap().is_empty());
        assert!(store.settlements_for_user(&alice.user_id).unwrap().is_empty());
        assert!(store.settlements_for_user(&bob.user_id).unwrap().is_empty());
    }

    #[test]
    fn deletion_marker_roundtrip() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        let marker = DeletionMarker::new(user_id);
        store.put_deletion_marker(&marker).unwrap();

        let retrieved = store.get_deletion_marker(&user_id).unwrap().unwrap();
        assert_eq!(retrieved.stage, crate::marker::DeletionStage::LeavingCircles);

        let mut batch = StagedBatch::new();
        batch.stage(StagedWrite::DeleteDeletionMarker { user_id });
        store.commit(batch).unwrap();

        assert!(store.get_deletion_marker(&user_id).unwrap().is_none());
    }
}
