//! Relationship documents: friendships and circles.
//!
//! Both embed denormalized [`MemberSnapshot`]s of their members' display
//! fields; the propagation orchestrator keeps those copies in sync when a
//! profile changes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CircleId, FriendshipId, UserId};
use crate::profile::{MemberSnapshot, UserProfile};

/// A bidirectional friendship between two accounts.
///
/// Invariant: both ids in `user_ids` have an entry in `users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    /// The canonical pair identifier.
    pub id: FriendshipId,

    /// Both participants.
    pub user_ids: [UserId; 2],

    /// Denormalized display snapshot per participant.
    pub users: HashMap<UserId, MemberSnapshot>,

    /// When the friendship was created.
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// Create a friendship between two profiles.
    #[must_use]
    pub fn new(a: &UserProfile, b: &UserProfile) -> Self {
        let id = FriendshipId::new(a.user_id, b.user_id);
        let mut users = HashMap::with_capacity(2);
        users.insert(a.user_id, a.snapshot());
        users.insert(b.user_id, b.snapshot());
        Self {
            id,
            user_ids: *id.user_ids(),
            users,
            created_at: Utc::now(),
        }
    }

    /// The other participant, if the given user is one of the pair.
    #[must_use]
    pub fn other(&self, user_id: &UserId) -> Option<UserId> {
        match self.user_ids {
            [a, b] if a == *user_id => Some(b),
            [a, b] if b == *user_id => Some(a),
            _ => None,
        }
    }
}

/// A named group of accounts with a shared membership list.
///
/// Invariant: `member_ids` and the key set of `members` stay in sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    /// The circle identifier.
    pub id: CircleId,

    /// Circle name.
    pub name: String,

    /// Member account ids.
    pub member_ids: Vec<UserId>,

    /// Denormalized display snapshot per member.
    pub members: HashMap<UserId, MemberSnapshot>,

    /// When the circle was created.
    pub created_at: DateTime<Utc>,

    /// When the membership or snapshots last changed.
    pub updated_at: DateTime<Utc>,
}

impl Circle {
    /// Create a circle with the creator as its first member.
    #[must_use]
    pub fn new(name: String, creator: &UserProfile) -> Self {
        let now = Utc::now();
        let mut members = HashMap::new();
        members.insert(creator.user_id, creator.snapshot());
        Self {
            id: CircleId::generate(),
            name,
            member_ids: vec![creator.user_id],
            members,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the account is a member.
    #[must_use]
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.member_ids.contains(user_id)
    }

    /// Add a member, keeping `member_ids` and `members` in sync.
    ///
    /// Adding an existing member only refreshes its snapshot.
    pub fn add_member(&mut self, profile: &UserProfile) {
        if !self.is_member(&profile.user_id) {
            self.member_ids.push(profile.user_id);
        }
        self.members.insert(profile.user_id, profile.snapshot());
        self.updated_at = Utc::now();
    }

    /// Remove a member, keeping `member_ids` and `members` in sync.
    ///
    /// Returns true if the account was a member.
    pub fn remove_member(&mut self, user_id: &UserId) -> bool {
        let was_member = self.is_member(user_id);
        self.member_ids.retain(|id| id != user_id);
        self.members.remove(user_id);
        if was_member {
            self.updated_at = Utc::now();
        }
        was_member
    }
}
