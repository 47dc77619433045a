//! Client error types.

use diary_core::auth::{DecodeError, StoreError};
use diary_core::validation::ValidationError;
use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias for client return types.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the session and the gateway.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Login rejected the username/password. Not retried.
    #[error("Invalid credentials")]
    Credentials,

    /// The access token expired and could not be refreshed; sign in again.
    #[error("Session expired")]
    SessionExpired,

    /// The API rejected the bearer token. Authoritative over the local
    /// expiry check.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Token error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Token store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Map a non-success response to an error.
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(body),
            StatusCode::FORBIDDEN => ClientError::Forbidden(body),
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            _ => ClientError::Http { status, body },
        }
    }

    /// `true` when the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ClientError::SessionExpired | ClientError::Unauthorized(_)
        )
    }
}
