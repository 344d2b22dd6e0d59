//! Key encoding utilities for `RocksDB`.
//!
//! Document keys are the raw identifier bytes (16 bytes for UUID/ULID ids,
//! 32 bytes for friendship pairs). Index keys are
//! `participant_id (16 bytes) || document_key`, so a prefix scan on the
//! participant id yields that participant's documents; ULID document keys
//! additionally arrive in chronological order.

use ledgerly_core::{
    CircleId, FriendRequestId, FriendshipId, NotificationId, RecurringExpenseId, SettlementId,
    TransactionId, UserId, Username,
};

/// Create an account key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a username reservation key (the lowercased username bytes).
#[must_use]
pub fn username_key(username: &Username) -> Vec<u8> {
    username.as_str().as_bytes().to_vec()
}

/// Create an email-index key.
///
/// Format: `email || 0x00 || user_id (16 bytes)`. The separator keeps one
/// email's entries from being a prefix of another's.
#[must_use]
pub fn email_index_key(email: &str, user_id: &UserId) -> Vec<u8> {
    let mut key = Vec::with_capacity(email.len() + 17);
    key.extend_from_slice(email.as_bytes());
    key.push(0);
    key.extend_from_slice(user_id.as_bytes());
    key
}

/// Create a prefix for iterating all accounts with the given email.
#[must_use]
pub fn email_prefix(email: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(email.len() + 1);
    prefix.extend_from_slice(email.as_bytes());
    prefix.push(0);
    prefix
}

/// Extract the user ID from an email-index key.
///
/// # Panics
///
/// Panics if the key is shorter than 16 bytes.
#[must_use]
pub fn extract_user_id_from_email_key(key: &[u8]) -> UserId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[key.len() - 16..]);
    UserId::from_bytes(bytes)
}

/// Create a friendship key from the canonical pair identifier.
#[must_use]
pub fn friendship_key(id: &FriendshipId) -> Vec<u8> {
    id.to_bytes().to_vec()
}

/// Create a circle key from a circle ID.
#[must_use]
pub fn circle_key(id: &CircleId) -> Vec<u8> {
    id.as_bytes().to_vec()
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(id: &TransactionId) -> Vec<u8> {
    id.to_bytes().to_vec()
}

/// Create a recurring-expense key.
#[must_use]
pub fn recurring_expense_key(id: &RecurringExpenseId) -> Vec<u8> {
    id.as_bytes().to_vec()
}

/// Create a notification key from a notification ID.
#[must_use]
pub fn notification_key(id: &NotificationId) -> Vec<u8> {
    id.to_bytes().to_vec()
}

/// Create a friend-request key.
#[must_use]
pub fn friend_request_key(id: &FriendRequestId) -> Vec<u8> {
    id.as_bytes().to_vec()
}

/// Create a settlement key.
#[must_use]
pub fn settlement_key(id: &SettlementId) -> Vec<u8> {
    id.as_bytes().to_vec()
}

/// Create a deletion-marker key from a user ID.
#[must_use]
pub fn deletion_marker_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a participant-index key.
///
/// Format: `participant_id (16 bytes) || document_key`.
#[must_use]
pub fn participant_index_key(participant: &UserId, doc_key: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(16 + doc_key.len());
    key.extend_from_slice(participant.as_bytes());
    key.extend_from_slice(doc_key);
    key
}

/// Create a prefix for iterating a participant's index entries.
#[must_use]
pub fn participant_prefix(participant: &UserId) -> Vec<u8> {
    participant.as_bytes().to_vec()
}

/// Extract the document key from a participant-index key.
///
/// # Panics
///
/// Panics if the key is not longer than 16 bytes.
#[must_use]
pub fn extract_doc_key(index_key: &[u8]) -> &[u8] {
    assert!(index_key.len() > 16, "index key too short");
    &index_key[16..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_key_length() {
        let user_id = UserId::generate();
        assert_eq!(user_key(&user_id).len(), 16);
    }

    #[test]
    fn participant_index_key_format() {
        let user_id = UserId::generate();
        let tx_id = TransactionId::generate();
        let doc_key = transaction_key(&tx_id);
        let key = participant_index_key(&user_id, &doc_key);

        assert_eq!(key.len(), 32);
        assert_eq!(&key[..16], user_id.as_bytes());
        assert_eq!(extract_doc_key(&key), doc_key.as_slice());
    }

    #[test]
    fn friendship_index_roundtrip() {
        let user_id = UserId::generate();
        let friendship_id = FriendshipId::new(UserId::generate(), UserId::generate());
        let doc_key = friendship_key(&friendship_id);
        let key = participant_index_key(&user_id, &doc_key);

        let extracted = FriendshipId::from_bytes(extract_doc_key(&key)).unwrap();
        assert_eq!(extracted, friendship_id);
    }

    #[test]
    fn email_index_roundtrip() {
        let user_id = UserId::generate();
        let key = email_index_key("a@b.com", &user_id);

        assert!(key.starts_with(&email_prefix("a@b.com")));
        assert_eq!(extract_user_id_from_email_key(&key), user_id);
    }

    #[test]
    fn email_prefix_is_not_a_prefix_of_longer_email() {
        let user_id = UserId::generate();
        let key = email_index_key("a@b.common", &user_id);
        assert!(!key.starts_with(&email_prefix("a@b.com")));
    }
}
