//! The user service: account lifecycle, username registry, profile
//! propagation, cascade deletion, and search.
//!
//! Every operation takes the store handle explicitly; nothing here holds
//! global state. Multi-document writes go through [`StagedBatch`] commits,
//! so each operation's writes are all-or-nothing. The deletion cascade is
//! the one multi-batch workflow; its progress is tracked by a persisted
//! [`DeletionMarker`] because there is no atomicity between its stages.

use ledgerly_core::{
    ProfilePatch, PublicProfile, UserError, UserId, UserProfile, UserUpdate, Username,
};
use ledgerly_store::{
    DeletionMarker, DeletionStage, RocksStore, StagedBatch, StagedWrite, Store,
};

use crate::error::ServiceError;
use crate::{circles, friends, notifications, recurring, settlements, transactions};

/// Cap on exact-email search results.
const EMAIL_SEARCH_LIMIT: usize = 10;

/// Create the initial account document.
///
/// New accounts start with zero budget, the default categories, the default
/// accent color, and no username.
pub fn create_user(
    store: &RocksStore,
    user_id: UserId,
    display_name: String,
    email: String,
    photo_url: Option<String>,
) -> Result<UserProfile, ServiceError> {
    if store.get_user(&user_id)?.is_some() {
        return Err(UserError::UserAlreadyExists {
            user_id: user_id.to_string(),
        }
        .into());
    }

    let user = UserProfile::new(user_id, display_name, email, photo_url);
    store.put_user(&user)?;

    tracing::info!(user_id = %user_id, "account created");
    Ok(user)
}

/// Apply a plain account update (budget, categories, preferences).
///
/// Does not fan out to relationship snapshots; display-name and photo
/// changes that should propagate go through [`propagate_profile_update`].
pub fn update_user(
    store: &RocksStore,
    user_id: &UserId,
    update: &UserUpdate,
) -> Result<UserProfile, ServiceError> {
    let mut user = store.get_user(user_id)?.ok_or_else(|| UserError::UserNotFound {
        user_id: user_id.to_string(),
    })?;

    user.apply_update(update);
    store.put_user(&user)?;
    Ok(user)
}

/// Check whether a username can be reserved.
///
/// # Errors
///
/// Fails with the fixed validation message for malformed input, before any
/// lookup happens.
pub fn is_username_available(store: &RocksStore, input: &str) -> Result<bool, ServiceError> {
    let username = Username::parse(input).map_err(ServiceError::User)?;
    Ok(store.get_username_owner(&username)?.is_none())
}

/// Resolve a username to the public profile of its owner.
///
/// Returns `None` when no reservation exists, when the input cannot be a
/// username at all, or when the reservation points at a missing account
/// document — the latter is data inconsistency and is deliberately treated
/// as "not found" rather than an error.
pub fn get_user_by_username(
    store: &RocksStore,
    input: &str,
) -> Result<Option<PublicProfile>, ServiceError> {
    let Ok(username) = Username::parse(input) else {
        return Ok(None);
    };
    let Some(owner) = store.get_username_owner(&username)? else {
        return Ok(None);
    };

    match store.get_user(&owner)? {
        Some(user) => Ok(Some(user.public())),
        None => {
            tracing::warn!(
                username = %username,
                owner = %owner,
                "username reservation points at a missing account"
            );
            Ok(None)
        }
    }
}

/// Reserve a username, or change an existing one.
///
/// Renaming to the current username (case-insensitively) is a no-op.
/// Otherwise the input is validated, availability is checked, and the old
/// reservation's deletion, the new reservation, and the account's username
/// field all commit as one atomic batch.
pub fn change_username(
    store: &RocksStore,
    user_id: &UserId,
    requested: &str,
) -> Result<UserProfile, ServiceError> {
    let mut user = store.get_user(user_id)?.ok_or_else(|| UserError::UserNotFound {
        user_id: user_id.to_string(),
    })?;

    if let Some(current) = &user.username {
        if requested.to_ascii_lowercase() == current.as_str() {
            return Ok(user);
        }
    }

    let username = Username::parse(requested).map_err(ServiceError::User)?;
    if store.get_username_owner(&username)?.is_some() {
        return Err(UserError::UsernameTaken {
            username: requested.to_string(),
        }
        .into());
    }

    let mut batch = StagedBatch::new();
    if let Some(old) = &user.username {
        batch.stage(StagedWrite::DeleteUsername {
            username: old.clone(),
        });
    }
    batch.stage(StagedWrite::PutUsername {
        username: username.clone(),
        user_id: *user_id,
    });
    batch.stage(StagedWrite::SetUsername {
        user_id: *user_id,
        username: username.clone(),
    });
    store.commit(batch)?;

    tracing::info!(user_id = %user_id, username = %username, "username changed");

    user.username = Some(username);
    Ok(user)
}

/// Propagate a display-field change to the account document and every
/// denormalized snapshot of it.
///
/// Queries all friendships and circles the account participates in and
/// merges only the supplied fields into each nested snapshot; the account
/// update and every snapshot merge commit as one atomic batch, so no
/// partially-propagated state is ever observable.
pub fn propagate_profile_update(
    store: &RocksStore,
    user_id: &UserId,
    patch: &ProfilePatch,
) -> Result<UserProfile, ServiceError> {
    let mut batch = StagedBatch::new();
    batch.stage(StagedWrite::MergeProfile {
        user_id: *user_id,
        patch: patch.clone(),
    });

    for friendship in store.friendships_for_user(user_id)? {
        batch.stage(StagedWrite::MergeFriendshipSnapshot {
            id: friendship.id,
            user_id: *user_id,
            patch: patch.clone(),
        });
    }
    for circle in store.circles_for_member(user_id)? {
        batch.stage(StagedWrite::MergeCircleSnapshot {
            id: circle.id,
            user_id: *user_id,
            patch: patch.clone(),
        });
    }

    let staged = batch.len();
    store.commit(batch)?;
    tracing::info!(user_id = %user_id, staged, "profile update propagated");

    store.get_user(user_id)?.ok_or_else(|| {
        UserError::UserNotFound {
            user_id: user_id.to_string(),
        }
        .into()
    })
}

/// Search for accounts by exact username or exact email.
///
/// A username hit short-circuits: the email query is never issued and the
/// result set has exactly one element. Otherwise the exact-email query runs,
/// capped at ten results. This is not fuzzy search.
pub fn search_users(store: &RocksStore, term: &str) -> Result<Vec<PublicProfile>, ServiceError> {
    if let Some(profile) = get_user_by_username(store, term)? {
        return Ok(vec![profile]);
    }

    let users = store.find_users_by_email(term, EMAIL_SEARCH_LIMIT)?;
    Ok(users.iter().map(UserProfile::public).collect())
}

/// Delete all data owned by or referencing an account, then soft-reset the
/// account document.
///
/// The cascade runs in three stages, each recorded in a persisted marker:
///
/// 1. `leaving-circles` — leave every circle; each leave is the circle
///    collaborator's own atomic operation, outside any batch.
/// 2. `deleting-friendships` — delete every friendship referencing the
///    account in one atomic batch.
/// 3. `clearing-data` — one shared atomic batch: every dependent-data
///    module stages its deletions, the username reservation is released,
///    the account document is soft-reset, and the marker itself is removed.
///
/// There is no atomicity across stages; a failure leaves the marker behind
/// and a later call resumes from the recorded stage. Within each batch the
/// usual all-or-nothing guarantee holds.
pub fn delete_all_user_data(store: &RocksStore, user_id: &UserId) -> Result<(), ServiceError> {
    let user = store.get_user(user_id)?.ok_or_else(|| UserError::UserNotFound {
        user_id: user_id.to_string(),
    })?;

    let mut marker = match store.get_deletion_marker(user_id)? {
        Some(marker) => {
            tracing::info!(
                user_id = %user_id,
                stage = ?marker.stage,
                "resuming interrupted account deletion"
            );
            marker
        }
        None => {
            let marker = DeletionMarker::new(*user_id);
            store.put_deletion_marker(&marker)?;
            marker
        }
    };

    if marker.stage <= DeletionStage::LeavingCircles {
        let memberships = store.circles_for_member(user_id)?;
        for circle in &memberships {
            circles::leave_circle(store, &circle.id, user_id)?;
        }
        tracing::debug!(user_id = %user_id, circles = memberships.len(), "left all circles");

        marker.advance(DeletionStage::DeletingFriendships);
        store.put_deletion_marker(&marker)?;
    }

    if marker.stage <= DeletionStage::DeletingFriendships {
        let friendships = store.friendships_for_user(user_id)?;
        let mut batch = StagedBatch::new();
        for friendship in &friendships {
            batch.stage(StagedWrite::DeleteFriendship { id: friendship.id });
        }
        store.commit(batch)?;
        tracing::debug!(user_id = %user_id, friendships = friendships.len(), "friendships deleted");

        marker.advance(DeletionStage::ClearingData);
        store.put_deletion_marker(&marker)?;
    }

    let mut batch = StagedBatch::new();
    transactions::add_transactions_deletions_to_batch(store, user_id, &mut batch)?;
    recurring::add_recurring_expenses_deletions_to_batch(store, user_id, &mut batch)?;
    notifications::add_notifications_deletions_to_batch(store, user_id, &mut batch)?;
    friends::add_friend_requests_deletions_to_batch(store, user_id, &mut batch)?;
    settlements::add_settlements_deletions_to_batch(store, user_id, &mut batch)?;

    if let Some(username) = &user.username {
        batch.stage(StagedWrite::DeleteUsername {
            username: username.clone(),
        });
    }
    batch.stage(StagedWrite::ResetUser { user_id: *user_id });
    batch.stage(StagedWrite::DeleteDeletionMarker { user_id: *user_id });

    let staged = batch.len();
    store.commit(batch)?;

    tracing::info!(user_id = %user_id, staged, "account data deleted and document reset");
    Ok(())
}
