//! Ledgerly HTTP client implementation.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use ledgerly_core::{
    Circle, CircleId, FriendRequest, FriendRequestId, Friendship, Notification, ProfilePatch,
    PublicProfile, RecurringExpense, Settlement, Transaction, UserId, UserUpdate,
};

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, AvailabilityResponse, CreateRecurringExpenseRequest, CreateUserRequest,
    RecordSettlementRequest, RecordTransactionRequest, UserResponse,
};

/// Ledgerly API client.
///
/// One client acts on behalf of one authenticated user: every request
/// carries the bearer token supplied at construction.
#[derive(Debug, Clone)]
pub struct LedgerlyClient {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl LedgerlyClient {
    /// Create a new ledgerly client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the ledgerly service (e.g., `"http://ledgerly:8080"`)
    /// * `bearer_token` - The user's bearer token (a JWT, or a
    ///   `test-token:<uuid>` token against a dev-mode service)
    #[must_use]
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::with_options(base_url, bearer_token, ClientOptions::default())
    }

    /// Create a new ledgerly client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Create the authenticated user's account document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<UserResponse, ClientError> {
        self.request(Method::POST, "/v1/users", Some(&request)).await
    }

    /// Get the current user's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_me(&self) -> Result<UserResponse, ClientError> {
        self.request::<(), _>(Method::GET, "/v1/users/me", None).await
    }

    /// Apply a plain account update (budget, categories, preferences).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn update_me(&self, update: &UserUpdate) -> Result<UserResponse, ClientError> {
        self.request(Method::PATCH, "/v1/users/me", Some(update)).await
    }

    /// Delete all of the current user's data and soft-reset the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn delete_me(&self) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .request::<(), _>(Method::DELETE, "/v1/users/me", None)
            .await?;
        Ok(())
    }

    /// Update display fields and propagate them into relationship snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<UserResponse, ClientError> {
        self.request(Method::PATCH, "/v1/users/me/profile", Some(patch))
            .await
    }

    // =========================================================================
    // Usernames and search
    // =========================================================================

    /// Reserve or change the current user's username.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Invalid`] for a malformed username and
    /// [`ClientError::UsernameTaken`] when the name is already reserved.
    pub async fn set_username(&self, username: &str) -> Result<UserResponse, ClientError> {
        let body = serde_json::json!({ "username": username });
        self.request(Method::PUT, "/v1/users/me/username", Some(&body))
            .await
    }

    /// Check whether a username can be reserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn username_availability(
        &self,
        username: &str,
    ) -> Result<AvailabilityResponse, ClientError> {
        self.request::<(), _>(Method::GET, &format!("/v1/usernames/{username}"), None)
            .await
    }

    /// Look up an account by its username.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no account owns the username.
    pub async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<PublicProfile, ClientError> {
        self.request::<(), _>(Method::GET, &format!("/v1/users/by-username/{username}"), None)
            .await
    }

    /// Search for accounts by exact username or exact email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn search_users(&self, term: &str) -> Result<Vec<PublicProfile>, ClientError> {
        let path = format!("/v1/users/search?q={}", urlencode(term));
        self.request::<(), _>(Method::GET, &path, None).await
    }

    // =========================================================================
    // Circles
    // =========================================================================

    /// Create a circle with the current user as its first member.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_circle(&self, name: &str) -> Result<Circle, ClientError> {
        let body = serde_json::json!({ "name": name });
        self.request(Method::POST, "/v1/circles", Some(&body)).await
    }

    /// List the circles the current user belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_circles(&self) -> Result<Vec<Circle>, ClientError> {
        self.request::<(), _>(Method::GET, "/v1/circles", None).await
    }

    /// Join a circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn join_circle(&self, circle_id: &CircleId) -> Result<Circle, ClientError> {
        self.request::<(), _>(Method::POST, &format!("/v1/circles/{circle_id}/join"), None)
            .await
    }

    /// Leave a circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn leave_circle(&self, circle_id: &CircleId) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .request::<(), _>(Method::POST, &format!("/v1/circles/{circle_id}/leave"), None)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Friends
    // =========================================================================

    /// Send a friend request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn send_friend_request(&self, to: &UserId) -> Result<FriendRequest, ClientError> {
        let body = serde_json::json!({ "to": to });
        self.request(Method::POST, "/v1/friends/requests", Some(&body))
            .await
    }

    /// List the friend requests the current user is a side of.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_friend_requests(&self) -> Result<Vec<FriendRequest>, ClientError> {
        self.request::<(), _>(Method::GET, "/v1/friends/requests", None)
            .await
    }

    /// Accept a friend request addressed to the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn accept_friend_request(
        &self,
        request_id: &FriendRequestId,
    ) -> Result<Friendship, ClientError> {
        self.request::<(), _>(
            Method::POST,
            &format!("/v1/friends/requests/{request_id}/accept"),
            None,
        )
        .await
    }

    /// List the current user's friendships.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_friends(&self) -> Result<Vec<Friendship>, ClientError> {
        self.request::<(), _>(Method::GET, "/v1/friends", None).await
    }

    // =========================================================================
    // Money
    // =========================================================================

    /// Record a spending transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn record_transaction(
        &self,
        request: RecordTransactionRequest,
    ) -> Result<Transaction, ClientError> {
        self.request(Method::POST, "/v1/transactions", Some(&request))
            .await
    }

    /// List the current user's transactions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        self.request::<(), _>(Method::GET, "/v1/transactions", None)
            .await
    }

    /// Create a recurring expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_recurring_expense(
        &self,
        request: CreateRecurringExpenseRequest,
    ) -> Result<RecurringExpense, ClientError> {
        self.request(Method::POST, "/v1/recurring-expenses", Some(&request))
            .await
    }

    /// List the current user's recurring expenses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_recurring_expenses(&self) -> Result<Vec<RecurringExpense>, ClientError> {
        self.request::<(), _>(Method::GET, "/v1/recurring-expenses", None)
            .await
    }

    /// Record a settlement paid by the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn record_settlement(
        &self,
        request: RecordSettlementRequest,
    ) -> Result<Settlement, ClientError> {
        self.request(Method::POST, "/v1/settlements", Some(&request))
            .await
    }

    /// List the settlements the current user is a side of.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_settlements(&self) -> Result<Vec<Settlement>, ClientError> {
        self.request::<(), _>(Method::GET, "/v1/settlements", None)
            .await
    }

    /// List the current user's notifications, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.request::<(), _>(Method::GET, "/v1/notifications", None)
            .await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Issue one authenticated request and parse the response.
    async fn request<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);

        let mut builder = self
            .client
            .request(method, &url)
            .header("authorization", format!("Bearer {}", self.bearer_token));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse the error envelope
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                // Map specific error codes to typed errors
                match code {
                    "unauthorized" => Err(ClientError::Unauthorized),
                    "not_found" => Err(ClientError::NotFound { message }),
                    "conflict" if message.contains("already taken") => {
                        Err(ClientError::UsernameTaken { message })
                    }
                    "bad_request" => Err(ClientError::Invalid { message }),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}

/// Percent-encode a query value. Only the characters that matter for a
/// query string (plus non-ASCII) are escaped; search terms are usernames
/// or email addresses, so this stays readable in logs.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'@' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = LedgerlyClient::new("http://localhost:8080", "test-token:abc");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = LedgerlyClient::new("http://localhost:8080/", "test-token:abc");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn urlencode_passes_emails_through() {
        assert_eq!(urlencode("alice@example.com"), "alice@example.com");
        assert_eq!(urlencode("has space"), "has%20space");
        assert_eq!(urlencode("a+b"), "a%2Bb");
    }
}
