//! Error types for the zonesync system
//!
//! One flat error enum covers every failure a reconciliation pass can hit.
//! The engine never retries or reclassifies; errors travel unmodified up to
//! the scheduler, which logs them and waits for the next pass.

use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the zonesync system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing zone, credentials, bad values)
    #[error("configuration error: {0}")]
    Config(String),

    /// The external address lookup failed (network, timeout, malformed body)
    #[error("address lookup failed: {0}")]
    AddressLookup(String),

    /// Listing or fetching remote records failed
    #[error("provider read failed: {0}")]
    ProviderRead(String),

    /// Creating, updating, or deleting a remote record failed
    #[error("provider write failed: {0}")]
    ProviderWrite(String),

    /// Authentication rejected by the provider
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Provider rate limiting
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Record or zone not found at the provider
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid input (e.g. a mutation without a provider id)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an address lookup error
    pub fn address_lookup(msg: impl Into<String>) -> Self {
        Self::AddressLookup(msg.into())
    }

    /// Create a provider read error
    pub fn provider_read(msg: impl Into<String>) -> Self {
        Self::ProviderRead(msg.into())
    }

    /// Create a provider write error
    pub fn provider_write(msg: impl Into<String>) -> Self {
        Self::ProviderWrite(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
