//! Ledgerly Client SDK.
//!
//! This crate provides a typed client for the ledgerly HTTP API. A client
//! acts on behalf of one authenticated user; construct it with that user's
//! bearer token.
//!
//! # Example
//!
//! ```no_run
//! use ledgerly_client::{CreateUserRequest, LedgerlyClient};
//!
//! # async fn example() -> Result<(), ledgerly_client::ClientError> {
//! let client = LedgerlyClient::new("http://ledgerly:8080", "user-jwt");
//!
//! let user = client
//!     .create_user(CreateUserRequest {
//!         display_name: "Alice".to_string(),
//!         email: "alice@example.com".to_string(),
//!         photo_url: None,
//!     })
//!     .await?;
//!
//! client.set_username("alice_42").await?;
//!
//! println!("Budget: {}", user.budget_formatted);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, LedgerlyClient};
pub use error::ClientError;
pub use types::*;
