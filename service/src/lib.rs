//! Ledgerly HTTP API Service.
//!
//! This crate provides the HTTP API for the ledgerly backend, including:
//!
//! - Account lifecycle (creation, updates, cascade deletion)
//! - Username reservation, lookup, and search
//! - Profile propagation into friendship and circle snapshots
//! - Circles, friend requests, transactions, recurring expenses,
//!   notifications, and settlements
//!
//! # Authentication
//!
//! Requests authenticate with a bearer JWT (HS256). When no signing secret
//! is configured the service runs in dev mode and accepts
//! `test-token:<user-uuid>` bearer tokens instead.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for consistency

pub mod auth;
pub mod circles;
pub mod config;
pub mod error;
pub mod friends;
pub mod handlers;
pub mod notifications;
pub mod recurring;
pub mod routes;
pub mod settlements;
pub mod state;
pub mod transactions;
pub mod upload;
pub mod users;

pub use config::ServiceConfig;
pub use error::{ApiError, ServiceError};
pub use routes::create_router;
pub use state::AppState;
pub use upload::{UploadClient, UploadError};
