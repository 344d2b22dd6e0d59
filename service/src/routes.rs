//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{circles, friends, health, money, notifications, users};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Accounts (bearer JWT auth)
/// - `POST /v1/users` - Create account
/// - `GET /v1/users/me` - Get current user's account
/// - `PATCH /v1/users/me` - Plain account update
/// - `DELETE /v1/users/me` - Cascade deletion + account reset
/// - `PATCH /v1/users/me/profile` - Propagating display-field update
/// - `POST /v1/users/me/photo` - Upload photo + propagate
/// - `PUT /v1/users/me/username` - Reserve/change username
/// - `GET /v1/usernames/{username}` - Username availability
/// - `GET /v1/users/by-username/{username}` - Username lookup
/// - `GET /v1/users/search?q=` - Exact username/email search
///
/// ## Social (bearer JWT auth)
/// - `POST /v1/circles`, `GET /v1/circles`
/// - `POST /v1/circles/{id}/join`, `POST /v1/circles/{id}/leave`
/// - `POST /v1/friends/requests`, `GET /v1/friends/requests`
/// - `POST /v1/friends/requests/{id}/accept`, `GET /v1/friends`
///
/// ## Money (bearer JWT auth)
/// - `POST /v1/transactions`, `GET /v1/transactions`
/// - `POST /v1/recurring-expenses`, `GET /v1/recurring-expenses`
/// - `POST /v1/settlements`, `GET /v1/settlements`
/// - `GET /v1/notifications`
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/health", get(health::health))
        // Accounts
        .route("/v1/users", post(users::create_user))
        .route("/v1/users/me", get(users::get_me))
        .route("/v1/users/me", patch(users::update_me))
        .route("/v1/users/me", delete(users::delete_me))
        .route("/v1/users/me/profile", patch(users::update_profile))
        .route("/v1/users/me/photo", post(users::upload_photo))
        .route("/v1/users/me/username", put(users::set_username))
        .route("/v1/usernames/:username", get(users::username_availability))
        .route("/v1/users/by-username/:username", get(users::lookup_username))
        .route("/v1/users/search", get(users::search))
        // Circles
        .route("/v1/circles", post(circles::create_circle))
        .route("/v1/circles", get(circles::list_circles))
        .route("/v1/circles/:id/join", post(circles::join_circle))
        .route("/v1/circles/:id/leave", post(circles::leave_circle))
        // Friends
        .route("/v1/friends", get(friends::list_friends))
        .route("/v1/friends/requests", post(friends::send_request))
        .route("/v1/friends/requests", get(friends::list_requests))
        .route(
            "/v1/friends/requests/:id/accept",
            post(friends::accept_request),
        )
        // Money
        .route("/v1/transactions", post(money::record_transaction))
        .route("/v1/transactions", get(money::list_transactions))
        .route(
            "/v1/recurring-expenses",
            post(money::create_recurring_expense),
        )
        .route(
            "/v1/recurring-expenses",
            get(money::list_recurring_expenses),
        )
        .route("/v1/settlements", post(money::record_settlement))
        .route("/v1/settlements", get(money::list_settlements))
        // Notifications
        .route("/v1/notifications", get(notifications::list_notifications))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
