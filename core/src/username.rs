//! Username validation and normalization.
//!
//! Usernames are case-insensitively unique: a `Username` always holds the
//! lowercased form, and the lowercased form is what the reservation
//! collection is keyed by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UserError;

/// Minimum username length.
pub const USERNAME_MIN_LEN: usize = 3;

/// Maximum username length.
pub const USERNAME_MAX_LEN: usize = 15;

/// A validated, lowercased username.
///
/// Valid usernames match `^[A-Za-z0-9_]{3,15}$`; the stored form is always
/// lowercase.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Parse and normalize a username.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::InvalidUsername`] if the input does not match
    /// the allowed pattern.
    pub fn parse(input: &str) -> Result<Self, UserError> {
        if !Self::is_valid(input) {
            return Err(UserError::InvalidUsername);
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    /// Whether the input matches `^[A-Za-z0-9_]{3,15}$`.
    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&input.len())
            && input
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// The lowercased username string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Username {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({})", self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
