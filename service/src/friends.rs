//! Friend requests and friendships.

use ledgerly_core::{
    FriendRequest, FriendRequestId, Friendship, FriendshipId, Notification, UserError, UserId,
};
use ledgerly_store::{RocksStore, StagedBatch, StagedWrite, Store};

use crate::error::ServiceError;

/// Send a friend request and notify the recipient.
pub fn send_friend_request(
    store: &RocksStore,
    from: &UserId,
    to: &UserId,
) -> Result<FriendRequest, ServiceError> {
    if from == to {
        return Err(UserError::SelfFriendship.into());
    }

    let sender = store.get_user(from)?.ok_or_else(|| UserError::UserNotFound {
        user_id: from.to_string(),
    })?;
    store.get_user(to)?.ok_or_else(|| UserError::UserNotFound {
        user_id: to.to_string(),
    })?;
    if are_friends(store, from, to)? {
        return Err(UserError::AlreadyFriends.into());
    }

    let request = FriendRequest::new(*from, *to);
    store.put_friend_request(&request)?;

    let notification = Notification::new(
        *to,
        format!("{} sent you a friend request", sender.display_name),
    );
    store.put_notification(&notification)?;

    tracing::info!(from = %from, to = %to, request_id = %request.id, "friend request sent");
    Ok(request)
}

/// Accept a friend request.
///
/// The request's deletion and the friendship's creation commit as one
/// atomic batch, so a request is never both pending and accepted. Requests
/// not addressed to the acceptor are reported as not found.
pub fn accept_friend_request(
    store: &RocksStore,
    request_id: &FriendRequestId,
    acceptor: &UserId,
) -> Result<Friendship, ServiceError> {
    let not_found = || UserError::FriendRequestNotFound {
        request_id: request_id.to_string(),
    };

    let request = store.get_friend_request(request_id)?.ok_or_else(not_found)?;
    if request.to != *acceptor {
        return Err(not_found().into());
    }

    let sender = store.get_user(&request.from)?.ok_or_else(|| UserError::UserNotFound {
        user_id: request.from.to_string(),
    })?;
    let recipient = store.get_user(&request.to)?.ok_or_else(|| UserError::UserNotFound {
        user_id: request.to.to_string(),
    })?;

    let friendship = Friendship::new(&sender, &recipient);

    let mut batch = StagedBatch::new();
    batch.stage(StagedWrite::DeleteFriendRequest { id: request.id });
    batch.stage(StagedWrite::PutFriendship(Box::new(friendship.clone())));
    store.commit(batch)?;

    let notification = Notification::new(
        request.from,
        format!("{} accepted your friend request", recipient.display_name),
    );
    store.put_notification(&notification)?;

    tracing::info!(
        friendship_id = %friendship.id,
        request_id = %request_id,
        "friend request accepted"
    );
    Ok(friendship)
}

/// Whether two accounts are already friends.
pub fn are_friends(store: &RocksStore, a: &UserId, b: &UserId) -> Result<bool, ServiceError> {
    Ok(store.get_friendship(&FriendshipId::new(*a, *b))?.is_some())
}

/// Stage deletions of every friend request involving the account into the
/// caller's batch. Stages only; never commits.
pub fn add_friend_requests_deletions_to_batch(
    store: &RocksStore,
    user_id: &UserId,
    batch: &mut StagedBatch,
) -> Result<(), ledgerly_store::StoreError> {
    for request in store.friend_requests_for_user(user_id)? {
        batch.stage(StagedWrite::DeleteFriendRequest { id: request.id });
    }
    Ok(())
}
