//! Notification handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use ledgerly_core::Notification;
use ledgerly_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// List the current user's notifications, oldest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state.store.notifications_for_user(&auth.user_id)?;
    Ok(Json(notifications))
}
