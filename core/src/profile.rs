//! User profile documents and their projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::UserId;
use crate::username::Username;

/// Default spending categories for a new (or reset) account.
#[must_use]
pub fn default_categories() -> Vec<String> {
    [
        "Food",
        "Transport",
        "Housing",
        "Utilities",
        "Entertainment",
        "Health",
        "Shopping",
        "Other",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Default accent color for a new (or reset) account, as an HSL triple.
pub const DEFAULT_PRIMARY_COLOR: &str = "181 95% 45%";

/// A user account document.
///
/// The identifier and email are immutable after creation. Deleting an
/// account soft-resets this document (see [`UserProfile::reset`]) instead of
/// removing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// The account identifier (stable, immutable).
    pub user_id: UserId,

    /// Display name shown to other users.
    pub display_name: String,

    /// Email address (immutable post-creation).
    pub email: String,

    /// The reserved username, if one has been chosen.
    pub username: Option<Username>,

    /// Monthly budget in cents.
    pub budget_cents: i64,

    /// Whether the user has explicitly set a budget.
    pub budget_is_set: bool,

    /// Profile photo URL.
    pub photo_url: Option<String>,

    /// Spending categories.
    pub categories: Vec<String>,

    /// Accent color preference (HSL triple).
    pub primary_color: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new account document with default budget and categories.
    #[must_use]
    pub fn new(
        user_id: UserId,
        display_name: String,
        email: String,
        photo_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            display_name,
            email,
            username: None,
            budget_cents: 0,
            budget_is_set: false,
            photo_url,
            categories: default_categories(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a plain account update (no fan-out fields).
    ///
    /// Absent fields are left untouched.
    pub fn apply_update(&mut self, update: &UserUpdate) {
        if let Some(display_name) = &update.display_name {
            self.display_name.clone_from(display_name);
        }
        if let Some(budget_cents) = update.budget_cents {
            self.budget_cents = budget_cents;
        }
        if let Some(budget_is_set) = update.budget_is_set {
            self.budget_is_set = budget_is_set;
        }
        if let Some(categories) = &update.categories {
            self.categories.clone_from(categories);
        }
        if let Some(primary_color) = &update.primary_color {
            self.primary_color.clone_from(primary_color);
        }
        self.updated_at = Utc::now();
    }

    /// Apply a propagating profile patch to the account document itself.
    pub fn apply_patch(&mut self, patch: &ProfilePatch) {
        if let Some(display_name) = &patch.display_name {
            self.display_name.clone_from(display_name);
        }
        if let Some(photo_url) = &patch.photo_url {
            self.photo_url.clone_from(photo_url);
        }
        self.updated_at = Utc::now();
    }

    /// Soft-reset the mutable fields after account deletion.
    ///
    /// Identifier, display name, and email are retained; everything else
    /// returns to its registration default and the username is cleared
    /// (its reservation is deleted in the same batch).
    pub fn reset(&mut self) {
        self.username = None;
        self.budget_cents = 0;
        self.budget_is_set = false;
        self.photo_url = None;
        self.categories = default_categories();
        self.primary_color = DEFAULT_PRIMARY_COLOR.to_string();
        self.updated_at = Utc::now();
    }

    /// The public projection of this account.
    #[must_use]
    pub fn public(&self) -> PublicProfile {
        PublicProfile {
            user_id: self.user_id,
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            photo_url: self.photo_url.clone(),
            username: self.username.clone(),
        }
    }

    /// The denormalized snapshot embedded in relationship documents.
    #[must_use]
    pub fn snapshot(&self) -> MemberSnapshot {
        MemberSnapshot {
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// The public projection of an account, returned by lookup and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// The account identifier.
    pub user_id: UserId,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Profile photo URL.
    pub photo_url: Option<String>,
    /// Reserved username, if any.
    pub username: Option<Username>,
}

/// A denormalized copy of a member's display fields, embedded in
/// friendship and circle documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    /// Display name at snapshot time.
    pub display_name: String,
    /// Photo URL at snapshot time.
    pub photo_url: Option<String>,
}

impl MemberSnapshot {
    /// Merge a profile patch into the snapshot, field by field.
    ///
    /// Fields not supplied in the patch are left untouched.
    pub fn merge(&mut self, patch: &ProfilePatch) {
        if let Some(display_name) = &patch.display_name {
            self.display_name.clone_from(display_name);
        }
        if let Some(photo_url) = &patch.photo_url {
            self.photo_url.clone_from(photo_url);
        }
    }
}

/// A partial update of the propagated display fields.
///
/// `photo_url` distinguishes "not supplied" (outer `None`) from
/// "set to no photo" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    /// New display name, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// New photo URL, if supplied (`Some(None)` clears the photo).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub photo_url: Option<Option<String>>,
}

impl ProfilePatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.photo_url.is_none()
    }
}

/// A partial update of the plain (non-propagated) account fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New display name, if supplied. Display-name changes through this
    /// update do not fan out to relationship snapshots; use the propagating
    /// profile update for that.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// New budget in cents, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_cents: Option<i64>,

    /// New budget-is-set flag, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_is_set: Option<bool>,

    /// New category list, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,

    /// New accent color, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
}

/// Deserialize a present-but-possibly-null field into `Some(Option<T>)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new(
            UserId::generate(),
            "Alice".into(),
            "alice@example.com".into(),
            Some("https://img.example/alice.png".into()),
        )
    }

    #[test]
    fn new_profile_has_registration_defaults() {
        let profile = profile();
        assert_eq!(profile.budget_cents, 0);
        assert!(!profile.budget_is_set);
        assert!(profile.username.is_none());
        assert_eq!(profile.categories, default_categories());
        assert_eq!(profile.primary_color, DEFAULT_PRIMARY_COLOR);
    }

    #[test]
    fn reset_keeps_identity_fields() {
        let mut profile = profile();
        profile.budget_cents = 120_000;
        profile.budget_is_set = true;
        profile.username = Some(Username::parse("alice").unwrap());
        profile.categories = vec!["Custom".into()];
        profile.primary_color = "10 10% 10%".into();

        let email = profile.email.clone();
        let display_name = profile.display_name.clone();
        profile.reset();

        assert_eq!(profile.email, email);
        assert_eq!(profile.display_name, display_name);
        assert_eq!(profile.budget_cents, 0);
        assert!(!profile.budget_is_set);
        assert!(profile.photo_url.is_none());
        assert!(profile.username.is_none());
        assert_eq!(profile.categories, default_categories());
        assert_eq!(profile.primary_color, DEFAULT_PRIMARY_COLOR);
    }

    #[test]
    fn snapshot_merge_is_partial() {
        let mut snapshot = profile().snapshot();
        let before_photo = snapshot.photo_url.clone();

        snapshot.merge(&ProfilePatch {
            display_name: Some("Alicia".into()),
            photo_url: None,
        });

        assert_eq!(snapshot.display_name, "Alicia");
        assert_eq!(snapshot.photo_url, before_photo);
    }

    #[test]
    fn snapshot_merge_can_clear_photo() {
        let mut snapshot = profile().snapshot();
        snapshot.merge(&ProfilePatch {
            display_name: None,
            photo_url: Some(None),
        });
        assert!(snapshot.photo_url.is_none());
    }

    #[test]
    fn patch_json_distinguishes_null_from_absent() {
        let absent: ProfilePatch = serde_json::from_str("{}").unwrap();
        assert!(absent.photo_url.is_none());

        let null: ProfilePatch = serde_json::from_str(r#"{"photo_url": null}"#).unwrap();
        assert_eq!(null.photo_url, Some(None));

        let set: ProfilePatch =
            serde_json::from_str(r#"{"photo_url": "https://img.example/x.png"}"#).unwrap();
        assert_eq!(set.photo_url, Some(Some("https://img.example/x.png".into())));
    }
}
