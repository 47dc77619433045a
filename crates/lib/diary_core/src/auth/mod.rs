//! Client-side token handling.
//!
//! Provides the token codec, the persisted credential store and the clock
//! used for expiry checks. Nothing here talks to the network.

pub mod clock;
pub mod jwt;
pub mod store;

use thiserror::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Token decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("No token")]
    Missing,

    #[error("Malformed token: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
}

/// Token store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Token store unavailable: {0}")]
    Unavailable(String),
}
