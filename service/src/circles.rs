//! Circle operations.
//!
//! A circle is a shared document: any member's flows may mutate it. Leaving
//! a circle is a single-document operation that adjusts `member_ids` and
//! `members` together, so the membership invariant holds no matter which
//! flow (an explicit leave or the deletion cascade) triggers it. It is
//! deliberately not part of any staged batch.

use ledgerly_core::{Circle, CircleId, UserError, UserId};
use ledgerly_store::{RocksStore, Store};

use crate::error::ServiceError;

/// Create a circle with the creator as its first member.
pub fn create_circle(
    store: &RocksStore,
    creator: &UserId,
    name: String,
) -> Result<Circle, ServiceError> {
    let creator = store.get_user(creator)?.ok_or_else(|| UserError::UserNotFound {
        user_id: creator.to_string(),
    })?;

    let circle = Circle::new(name, &creator);
    store.put_circle(&circle)?;

    tracing::info!(circle_id = %circle.id, creator = %creator.user_id, "circle created");
    Ok(circle)
}

/// Add an account to a circle's membership.
pub fn join_circle(
    store: &RocksStore,
    circle_id: &CircleId,
    user_id: &UserId,
) -> Result<Circle, ServiceError> {
    let user = store.get_user(user_id)?.ok_or_else(|| UserError::UserNotFound {
        user_id: user_id.to_string(),
    })?;
    let mut circle = store.get_circle(circle_id)?.ok_or_else(|| UserError::CircleNotFound {
        circle_id: circle_id.to_string(),
    })?;

    circle.add_member(&user);
    store.put_circle(&circle)?;

    tracing::debug!(circle_id = %circle_id, user_id = %user_id, "joined circle");
    Ok(circle)
}

/// Remove an account from a circle's membership.
///
/// Removes the account from `member_ids` and `members` in one document
/// write. The last member leaving deletes the circle document.
pub fn leave_circle(
    store: &RocksStore,
    circle_id: &CircleId,
    user_id: &UserId,
) -> Result<(), ServiceError> {
    let mut circle = store.get_circle(circle_id)?.ok_or_else(|| UserError::CircleNotFound {
        circle_id: circle_id.to_string(),
    })?;

    if !circle.remove_member(user_id) {
        return Err(UserError::NotAMember {
            user_id: user_id.to_string(),
            circle_id: circle_id.to_string(),
        }
        .into());
    }

    if circle.member_ids.is_empty() {
        store.delete_circle(circle_id)?;
        tracing::info!(circle_id = %circle_id, "last member left, circle deleted");
    } else {
        store.put_circle(&circle)?;
        tracing::debug!(circle_id = %circle_id, user_id = %user_id, "left circle");
    }

    Ok(())
}
