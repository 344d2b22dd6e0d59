//! Error types for ledgerly storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A document required by a staged write is missing.
    ///
    /// Raised before anything is written, so a failed commit leaves every
    /// document untouched.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The collection the document belongs to.
        entity: &'static str,
        /// The document identifier.
        id: String,
    },
}
