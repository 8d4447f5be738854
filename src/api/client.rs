//! HTTP client for the Listinator API.
//!
//! A thin pass-through: one method per endpoint, JSON in and out, and any
//! non-2xx response turned into a [`ClientError`] that carries the status.
//! Sessions are cookie based, so the underlying `reqwest` client keeps a
//! cookie store for its lifetime.

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::models::*;
use crate::notifications::Diagnostic;

/// Path prefix of every endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: sign in first")]
    Unauthorized,

    #[error("API error, {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ClientError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(e) => e.status(),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
        }
    }
}

impl From<ClientError> for Diagnostic {
    fn from(err: ClientError) -> Self {
        Diagnostic::from_error(&err)
    }
}

impl From<&ClientError> for Diagnostic {
    fn from(err: &ClientError) -> Self {
        Diagnostic::from_error(err)
    }
}

/// HTTP client for the Listinator API.
#[derive(Debug, Clone)]
pub struct ListinatorClient {
    base_url: String,
    client: Client,
}

impl ListinatorClient {
    /// Create a client for the server at `base_url` (scheme, host and port;
    /// the `/api/v1` prefix is added per request).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self { base_url, client })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        tracing::debug!(%method, %url, "API request");
        self.client.request(method, &url)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Handle response whose body, if any, is ignored.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), ClientError> {
        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%status, %body, "API request failed");
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            _ => Err(ClientError::Status { status, body }),
        }
    }

    // ============================================================
    // Lists
    // ============================================================

    /// Create a new, empty list.
    pub async fn create_list(&self) -> Result<List, ClientError> {
        let response = self
            .request(Method::POST, "/lists")
            .json(&serde_json::json!({}))
            .send()
            .await?;
        self.handle_response(response).await
    }

    // ============================================================
    // Entries
    // ============================================================

    /// Get all entries of a list.
    pub async fn get_entries(&self, list_id: Uuid) -> Result<Vec<Entry>, ClientError> {
        let response = self
            .request(Method::GET, "/entries")
            .query(&[("ListID", list_id.to_string())])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get a single entry by ID.
    pub async fn get_entry(&self, id: Uuid) -> Result<Entry, ClientError> {
        let response = self
            .request(Method::GET, &format!("/entries/{}", id))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Add an entry to a list.
    pub async fn create_entry(&self, name: &str, list_id: Uuid) -> Result<Entry, ClientError> {
        let input = CreateEntryInput {
            name: name.to_string(),
            list_id,
            type_id: None,
        };
        let response = self
            .request(Method::POST, "/entries")
            .json(&input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Replace an entry with the given state. Returns the stored entry.
    pub async fn update_entry(&self, entry: &Entry) -> Result<Entry, ClientError> {
        self.put_entry(entry.id, &UpdateEntryInput::from(entry)).await
    }

    /// Replace the entry `id` with `input`.
    pub async fn put_entry(&self, id: Uuid, input: &UpdateEntryInput) -> Result<Entry, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/entries/{}", id))
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete an entry. The server answers with the deleted entry.
    pub async fn delete_entry(&self, entry: &Entry) -> Result<Entry, ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/entries/{}", entry.id))
            .send()
            .await?;
        self.handle_response(response).await
    }

    // ============================================================
    // Types
    // ============================================================

    /// Get all entry types.
    pub async fn get_types(&self) -> Result<Vec<ItemType>, ClientError> {
        let response = self.request(Method::GET, "/types").send().await?;
        self.handle_response(response).await
    }

    // ============================================================
    // Session
    // ============================================================

    /// Sign in. The session cookie is kept by this client.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let response = self
            .request(Method::POST, "/session")
            .json(credentials)
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Get the signed-in user's id.
    pub async fn session(&self) -> Result<SessionInfo, ClientError> {
        let response = self.request(Method::GET, "/session").send().await?;
        self.handle_response(response).await
    }

    /// Sign out.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.request(Method::DELETE, "/session").send().await?;
        self.handle_empty_response(response).await
    }
}
