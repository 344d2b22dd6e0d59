//! Account and username handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use ledgerly_core::{ProfilePatch, PublicProfile, UserProfile, UserUpdate};
use ledgerly_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users;

/// Account response.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub user_id: String,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Reserved username, if any.
    pub username: Option<String>,
    /// Budget in cents.
    pub budget_cents: i64,
    /// Budget formatted as dollars.
    pub budget_formatted: String,
    /// Whether the user has set a budget.
    pub budget_is_set: bool,
    /// Profile photo URL.
    pub photo_url: Option<String>,
    /// Spending categories.
    pub categories: Vec<String>,
    /// Accent color preference.
    pub primary_color: String,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&UserProfile> for UserResponse {
    fn from(user: &UserProfile) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            username: user.username.as_ref().map(ToString::to_string),
            budget_cents: user.budget_cents,
            budget_formatted: format!("${:.2}", user.budget_cents as f64 / 100.0),
            budget_is_set: user.budget_is_set,
            photo_url: user.photo_url.clone(),
            categories: user.categories.clone(),
            primary_color: user.primary_color.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Create account request.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub display_name: String,
    /// Email address (immutable afterwards).
    pub email: String,
    /// Optional initial photo URL.
    pub photo_url: Option<String>,
}

/// Create the authenticated user's account document.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users::create_user(
        &state.store,
        auth.user_id,
        body.display_name,
        body.email,
        body.photo_url,
    )?;
    Ok(Json(UserResponse::from(&user)))
}

/// Get the current user's account.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Apply a plain account update (budget, categories, preferences).
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<UserUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users::update_user(&state.store, &auth.user_id, &body)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Delete all of the current user's data and soft-reset the account.
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    users::delete_all_user_data(&state.store, &auth.user_id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Update display fields and propagate them into relationship snapshots.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<ProfilePatch>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users::propagate_profile_update(&state.store, &auth.user_id, &body)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Set username request.
#[derive(Debug, Deserialize)]
pub struct SetUsernameRequest {
    /// The requested username.
    pub username: String,
}

/// Reserve or change the current user's username.
pub async fn set_username(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<SetUsernameRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users::change_username(&state.store, &auth.user_id, &body.username)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Username availability response.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// The queried username.
    pub username: String,
    /// Whether it can be reserved.
    pub available: bool,
}

/// Check whether a username can be reserved.
pub async fn username_availability(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let available = users::is_username_available(&state.store, &username)?;
    Ok(Json(AvailabilityResponse {
        username,
        available,
    }))
}

/// Look up an account by its username.
pub async fn lookup_username(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    users::get_user_by_username(&state.store, &username)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// The search term: an exact username or an exact email.
    pub q: String,
}

/// Search for accounts by exact username or exact email.
pub async fn search(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PublicProfile>>, ApiError> {
    let results = users::search_users(&state.store, &query.q)?;
    Ok(Json(results))
}

/// Photo upload query parameters.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Original filename, if the client wants to pass it through.
    pub filename: Option<String>,
}

/// Photo upload response.
#[derive(Debug, Serialize)]
pub struct UploadPhotoResponse {
    /// The hosted photo URL.
    pub url: String,
}

/// Upload a profile photo to the image host and propagate the new URL.
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<UploadPhotoResponse>, ApiError> {
    let uploader = state
        .uploader
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Image host not configured".into()))?;

    let filename = query.filename.as_deref().unwrap_or("photo.png");
    let url = uploader.upload_image(filename, body.to_vec()).await?;

    let patch = ProfilePatch {
        display_name: None,
        photo_url: Some(Some(url.clone())),
    };
    users::propagate_profile_update(&state.store, &auth.user_id, &patch)?;

    Ok(Json(UploadPhotoResponse { url }))
}
