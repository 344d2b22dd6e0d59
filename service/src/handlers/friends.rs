//! Friend request and friendship handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use ledgerly_core::{FriendRequest, FriendRequestId, Friendship, UserId};
use ledgerly_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::friends;
use crate::state::AppState;

/// Send friend request body.
#[derive(Debug, Deserialize)]
pub struct SendFriendRequestRequest {
    /// The account to send the request to.
    pub to: UserId,
}

/// Send a friend request.
pub async fn send_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<SendFriendRequestRequest>,
) -> Result<Json<FriendRequest>, ApiError> {
    let request = friends::send_friend_request(&state.store, &auth.user_id, &body.to)?;
    Ok(Json(request))
}

/// List the friend requests the current user is a side of.
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<FriendRequest>>, ApiError> {
    let requests = state.store.friend_requests_for_user(&auth.user_id)?;
    Ok(Json(requests))
}

/// Accept a friend request addressed to the current user.
pub async fn accept_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(request_id): Path<FriendRequestId>,
) -> Result<Json<Friendship>, ApiError> {
    let friendship = friends::accept_friend_request(&state.store, &request_id, &auth.user_id)?;
    Ok(Json(friendship))
}

/// List the current user's friendships.
pub async fn list_friends(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Friendship>>, ApiError> {
    let friendships = state.store.friendships_for_user(&auth.user_id)?;
    Ok(Json(friendships))
}
