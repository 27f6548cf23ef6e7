//! Configuration types for the zonesync system
//!
//! [`ZoneConfig`] is an immutable per-pass snapshot: the engine receives it by
//! reference on every `reconcile` call instead of reading process-wide state.

use serde::{Deserialize, Serialize};

/// Per-pass zone configuration snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Managed zone name (e.g. "example.org")
    pub zone: String,

    /// Default TTL in seconds for records the engine creates
    pub ttl: i64,

    /// Staleness bound for the cached external address, in seconds
    ///
    /// `None` reuses the record TTL: address checks are no more frequent than
    /// DNS would propagate anyway.
    #[serde(default)]
    pub address_max_age_secs: Option<i64>,

    /// Provider credentials and endpoint
    pub provider: ProviderCredentials,
}

impl ZoneConfig {
    /// Validate the configuration
    ///
    /// A failure here is fatal to the pass and surfaced to the caller; the
    /// engine runs it before touching any collaborator.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone.is_empty() {
            return Err(crate::Error::config("managed zone name is required"));
        }
        if self.ttl <= 0 {
            return Err(crate::Error::config(format!(
                "record TTL must be positive, got {}",
                self.ttl
            )));
        }
        self.provider.validate()
    }

    /// Effective staleness bound for the address cache
    pub fn address_max_age(&self) -> i64 {
        self.address_max_age_secs.unwrap_or(self.ttl)
    }
}

/// DNS provider credentials and API endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// Provider API endpoint or region name (e.g. "ovh-eu")
    pub endpoint: String,

    /// Application key
    pub application_key: String,

    /// Application secret
    /// ⚠️ NEVER log this value
    pub application_secret: String,

    /// Consumer key
    /// ⚠️ NEVER log this value
    pub consumer_key: String,
}

impl ProviderCredentials {
    /// Validate that every credential field is present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.endpoint.is_empty() {
            return Err(crate::Error::config("provider endpoint is required"));
        }
        if self.application_key.is_empty() {
            return Err(crate::Error::config("provider application key is required"));
        }
        if self.application_secret.is_empty() {
            return Err(crate::Error::config(
                "provider application secret is required",
            ));
        }
        if self.consumer_key.is_empty() {
            return Err(crate::Error::config("provider consumer key is required"));
        }
        Ok(())
    }
}

// Custom Debug implementation that hides the secrets
impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("endpoint", &self.endpoint)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .finish()
    }
}
