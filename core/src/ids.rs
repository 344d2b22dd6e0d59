//! Identifier types for ledgerly.
//!
//! This module provides strongly-typed identifiers for the documents in the
//! store.
//!
//! # Macro-based ID Types
//!
//! The `uuid_id_type!` macro reduces boilerplate for UUID-based identifier
//! types, ensuring consistent implementation of serialization, parsing, and
//! display traits. Time-ordered identifiers (transactions, notifications)
//! use ULIDs instead so prefix scans return them chronologically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Macro to define a UUID-based identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around `uuid::Uuid` with implementations for:
/// - `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - `Serialize`, `Deserialize` (as string)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`
/// - `AsRef<[u8]>`
macro_rules! uuid_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Create a new identifier from a UUID.
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Return the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Return the bytes of the UUID (16 bytes).
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            /// Create an identifier from raw bytes.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(uuid::Uuid::from_bytes(bytes))
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
                Ok(Self(uuid))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_bytes()
            }
        }
    };
}

// Define UUID-based identifier types using the macro
uuid_id_type!(UserId, "A user account identifier.");
uuid_id_type!(CircleId, "A circle (expense group) identifier.");
uuid_id_type!(RecurringExpenseId, "A recurring expense identifier.");
uuid_id_type!(FriendRequestId, "A friend request identifier.");
uuid_id_type!(SettlementId, "A settlement identifier.");

/// Macro to define a ULID-based identifier type for time-ordered documents.
///
/// ULIDs sort lexicographically by creation time, so index scans return
/// documents in chronological order without a separate timestamp index.
macro_rules! ulid_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Ulid);

        impl $name {
            /// Create an identifier from a ULID.
            #[must_use]
            pub const fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            /// Generate a new identifier with the current timestamp.
            #[must_use]
            pub fn generate() -> Self {
                Self(Ulid::new())
            }

            /// Return the underlying ULID.
            #[must_use]
            pub const fn as_ulid(&self) -> &Ulid {
                &self.0
            }

            /// Return the bytes of the ULID (16 bytes).
            #[must_use]
            pub fn to_bytes(&self) -> [u8; 16] {
                self.0.to_bytes()
            }

            /// Create an identifier from bytes.
            ///
            /// # Errors
            ///
            /// Returns an error if the bytes are invalid.
            pub fn from_bytes(bytes: [u8; 16]) -> Result<Self, IdError> {
                Ok(Self(Ulid::from_bytes(bytes)))
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
                Ok(Self(ulid))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }
    };
}

ulid_id_type!(TransactionId, "A spending transaction identifier (ULID for time-ordering).");
ulid_id_type!(NotificationId, "A notification identifier (ULID for time-ordering).");

/// A friendship identifier: the canonically ordered pair of the two
/// participants' user ids.
///
/// Ordering the pair makes the identifier independent of which side
/// initiated the friendship, so there is exactly one document per pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FriendshipId([UserId; 2]);

impl FriendshipId {
    /// Create the canonical identifier for a pair of users.
    #[must_use]
    pub fn new(a: UserId, b: UserId) -> Self {
        if a.as_bytes() <= b.as_bytes() {
            Self([a, b])
        } else {
            Self([b, a])
        }
    }

    /// The two participants, in canonical order.
    #[must_use]
    pub const fn user_ids(&self) -> &[UserId; 2] {
        &self.0
    }

    /// Whether the given user is one of the two participants.
    #[must_use]
    pub fn contains(&self, user_id: &UserId) -> bool {
        self.0[0] == *user_id || self.0[1] == *user_id
    }

    /// Return the key bytes (32 bytes: both UUIDs concatenated).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(self.0[0].as_bytes());
        bytes[16..].copy_from_slice(self.0[1].as_bytes());
        bytes
    }

    /// Create an identifier from key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        if bytes.len() != 32 {
            return Err(IdError::InvalidUuid);
        }
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        a.copy_from_slice(&bytes[..16]);
        b.copy_from_slice(&bytes[16..]);
        Ok(Self([UserId::from_bytes(a), UserId::from_bytes(b)]))
    }
}

impl FromStr for FriendshipId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once('_').ok_or(IdError::InvalidUuid)?;
        Ok(Self::new(a.parse()?, b.parse()?))
    }
}

impl fmt::Debug for FriendshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FriendshipId({}_{})", self.0[0], self.0[1])
    }
}

impl fmt::Display for FriendshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.0[0], self.0[1])
    }
}

impl TryFrom<String> for FriendshipId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FriendshipId> for String {
    fn from(id: FriendshipId) -> Self {
        id.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_roundtrip() {
        let id = UserId::generate();
        let str_repr = id.to_string();
        let parsed = UserId::from_str(&str_repr).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn user_id_serde_json() {
        let id = UserId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn transaction_id_roundtrip() {
        let id = TransactionId::generate();
        let str_repr = id.to_string();
        let parsed = TransactionId::from_str(&str_repr).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn transaction_id_bytes_roundtrip() {
        let id = TransactionId::generate();
        let bytes = id.to_bytes();
        let parsed = TransactionId::from_bytes(bytes).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn friendship_id_is_order_independent() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_eq!(FriendshipId::new(a, b), FriendshipId::new(b, a));
    }

    #[test]
    fn friendship_id_contains_both_participants() {
        let a = UserId::generate();
        let b = UserId::generate();
        let id = FriendshipId::new(a, b);
        assert!(id.contains(&a));
        assert!(id.contains(&b));
        assert!(!id.contains(&UserId::generate()));
    }

    #[test]
    fn friendship_id_bytes_roundtrip() {
        let id = FriendshipId::new(UserId::generate(), UserId::generate());
        let parsed = FriendshipId::from_bytes(&id.to_bytes()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn friendship_id_string_roundtrip() {
        let id = FriendshipId::new(UserId::generate(), UserId::generate());
        let parsed: FriendshipId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
