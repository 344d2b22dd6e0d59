//! API handlers.

// Allow precision loss in handlers - formatted amounts are well within f64 precision
#![allow(clippy::cast_precision_loss)]

pub mod circles;
pub mod friends;
pub mod health;
pub mod money;
pub mod notifications;
pub mod users;
