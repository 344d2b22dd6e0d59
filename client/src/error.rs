//! Client error types.

/// Errors that can occur when using the ledgerly client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The bearer token was missing or rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The requested resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// The server's message.
        message: String,
    },

    /// The requested username is already reserved.
    #[error("{message}")]
    UsernameTaken {
        /// The server's message, naming the username.
        message: String,
    },

    /// The request was rejected as invalid (malformed username, self
    /// friendship, and similar domain-rule failures).
    #[error("{message}")]
    Invalid {
        /// The server's message.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
