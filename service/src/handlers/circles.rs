//! Circle handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use ledgerly_core::{Circle, CircleId};
use ledgerly_store::Store;

use crate::auth::AuthUser;
use crate::circles;
use crate::error::ApiError;
use crate::state::AppState;

/// Create circle request.
#[derive(Debug, Deserialize)]
pub struct CreateCircleRequest {
    /// Circle name.
    pub name: String,
}

/// Create a circle with the current user as its first member.
pub async fn create_circle(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateCircleRequest>,
) -> Result<Json<Circle>, ApiError> {
    let circle = circles::create_circle(&state.store, &auth.user_id, body.name)?;
    Ok(Json(circle))
}

/// List the circles the current user belongs to.
pub async fn list_circles(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Circle>>, ApiError> {
    let circles = state.store.circles_for_member(&auth.user_id)?;
    Ok(Json(circles))
}

/// Join a circle.
pub async fn join_circle(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(circle_id): Path<CircleId>,
) -> Result<Json<Circle>, ApiError> {
    let circle = circles::join_circle(&state.store, &circle_id, &auth.user_id)?;
    Ok(Json(circle))
}

/// Leave a circle.
pub async fn leave_circle(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(circle_id): Path<CircleId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    circles::leave_circle(&state.store, &circle_id, &auth.user_id)?;
    Ok(Json(serde_json::json!({ "left": true })))
}
