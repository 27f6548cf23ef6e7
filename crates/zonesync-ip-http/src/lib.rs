// # HTTP Address Lookup
//
// This crate provides an HTTP-based implementation of the zonesync address
// lookup seam.
//
// ## Purpose
//
// Queries an external JSON service for the host's public address. The
// service's response carries the address in a `query` field (the ip-api.com
// shape). Staleness policy does not live here: the core's `AddressCache`
// decides when to call, this crate only performs one lookup per call.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use zonesync_core::traits::AddressLookup;
use zonesync_core::{Error, Result};

/// Default address service endpoint
pub const DEFAULT_ADDRESS_URL: &str = "http://ip-api.com/json/";

/// Timeout for one address query
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Response body of the address service; extra fields are ignored
#[derive(Debug, Deserialize)]
struct AddressBody {
    query: String,
}

/// HTTP-based external address lookup
#[derive(Debug, Clone)]
pub struct HttpAddressLookup {
    url: String,
    client: reqwest::Client,
}

impl HttpAddressLookup {
    /// Create a lookup against the given service URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(LOOKUP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a lookup against the default service
    pub fn default_endpoint() -> Self {
        Self::new(DEFAULT_ADDRESS_URL)
    }
}

#[async_trait]
impl AddressLookup for HttpAddressLookup {
    async fn lookup(&self) -> Result<String> {
        tracing::debug!(url = %self.url, "querying external address");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::address_lookup(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::address_lookup(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }

        let body: AddressBody = response
            .json()
            .await
            .map_err(|e| Error::address_lookup(format!("failed to parse response: {e}")))?;

        let address = body.query.trim();
        // The apex target is a string on the wire, but a body that does not
        // hold an IP literal is a malformed response, not an address.
        address
            .parse::<IpAddr>()
            .map_err(|_| Error::address_lookup(format!("malformed address in response: {address:?}")))?;

        Ok(address.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_body_parses_the_query_field() {
        let body: AddressBody = serde_json::from_str(
            r#"{"status":"success","country":"France","query":"203.0.113.9"}"#,
        )
        .unwrap();
        assert_eq!(body.query, "203.0.113.9");
    }

    #[test]
    fn response_body_without_query_is_an_error() {
        let parsed = serde_json::from_str::<AddressBody>(r#"{"status":"fail"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn lookup_uses_configured_url() {
        let lookup = HttpAddressLookup::new("http://127.0.0.1:9/json/");
        assert_eq!(lookup.url, "http://127.0.0.1:9/json/");

        let default = HttpAddressLookup::default_endpoint();
        assert_eq!(default.url, DEFAULT_ADDRESS_URL);
    }
}
