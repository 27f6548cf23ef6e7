// # OVH Record Transport
//
// This crate provides an OVH implementation of the zonesync record transport.
//
// The transport is thin and single-shot: one signed HTTP call per method, no
// retry, no backoff, no caching. Retrying is the scheduler's job (the next
// reconciliation pass), and the loaded-state snapshot is owned by the core's
// `RecordStore`.
//
// ## API Reference
//
// - OVH API v1: https://eu.api.ovh.com/console/
// - List record ids: GET  `/domain/zone/{zone}/record`
// - Fetch a record:  GET  `/domain/zone/{zone}/record/{id}`
// - Create a record: POST `/domain/zone/{zone}/record`
// - Replace a record: PUT `/domain/zone/{zone}/record/{id}`
// - Delete a record: DELETE `/domain/zone/{zone}/record/{id}`
//
// Every request carries the OVH signature headers: the signature is
// `"$1$" + SHA1(application_secret "+" consumer_key "+" METHOD "+" url "+"
// body "+" timestamp)`.
//
// ## Security Requirements
//
// - Application secret and consumer key NEVER appear in logs
// - The transport fails fast on empty credentials

use std::time::Duration;

use async_trait::async_trait;
use sha1::{Digest, Sha1};

use zonesync_core::traits::RecordTransport;
use zonesync_core::{Error, ProviderCredentials, Record, Result};

/// Default HTTP timeout for provider API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolve an OVH endpoint or region name to its API base URL
///
/// Full `http(s)://` URLs are passed through unchanged, which covers test
/// servers and regions added after this list was written.
fn endpoint_base_url(endpoint: &str) -> Result<String> {
    let base = match endpoint {
        "ovh-eu" => "https://eu.api.ovh.com/1.0",
        "ovh-ca" => "https://ca.api.ovh.com/1.0",
        "ovh-us" => "https://api.us.ovhcloud.com/1.0",
        "kimsufi-eu" => "https://eu.api.kimsufi.com/1.0",
        "kimsufi-ca" => "https://ca.api.kimsufi.com/1.0",
        "soyoustart-eu" => "https://eu.api.soyoustart.com/1.0",
        "soyoustart-ca" => "https://ca.api.soyoustart.com/1.0",
        url if url.starts_with("http://") || url.starts_with("https://") => {
            return Ok(url.trim_end_matches('/').to_string());
        }
        other => {
            return Err(Error::config(format!("unknown OVH endpoint: {other}")));
        }
    };
    Ok(base.to_string())
}

/// OVH DNS record transport
pub struct OvhTransport {
    base_url: String,
    application_key: String,
    /// ⚠️ NEVER log this value
    application_secret: String,
    /// ⚠️ NEVER log this value
    consumer_key: String,
    client: reqwest::Client,
}

// Custom Debug implementation that hides the secrets
impl std::fmt::Debug for OvhTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhTransport")
            .field("base_url", &self.base_url)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .finish_non_exhaustive()
    }
}

impl OvhTransport {
    /// Create a transport from provider credentials
    ///
    /// Fails fast on an unknown endpoint or empty credentials; nothing here
    /// touches the network.
    pub fn new(credentials: &ProviderCredentials) -> Result<Self> {
        credentials.validate()?;
        let base_url = endpoint_base_url(&credentials.endpoint)?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            application_key: credentials.application_key.clone(),
            application_secret: credentials.application_secret.clone(),
            consumer_key: credentials.consumer_key.clone(),
            client,
        })
    }

    /// Compute the OVH request signature for one call
    fn sign(&self, method: &str, url: &str, body: &str, timestamp: i64) -> String {
        let raw = format!(
            "{}+{}+{}+{}+{}+{}",
            self.application_secret, self.consumer_key, method, url, body, timestamp
        );
        let digest = Sha1::digest(raw.as_bytes());
        let mut signature = String::with_capacity(3 + digest.len() * 2);
        signature.push_str("$1$");
        for byte in digest {
            signature.push_str(&format!("{byte:02x}"));
        }
        signature
    }

    /// Issue one signed request and return the raw response
    async fn send(
        &self,
        method: reqwest::Method,
        url: &str,
        body: String,
    ) -> Result<reqwest::Response> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(method.as_str(), url, &body, timestamp);

        let mut request = self
            .client
            .request(method, url)
            .header("X-Ovh-Application", &self.application_key)
            .header("X-Ovh-Consumer", &self.consumer_key)
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature);
        if !body.is_empty() {
            // The signed body and the sent body must be byte-identical, so the
            // pre-serialized string is attached as-is.
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        request
            .send()
            .await
            .map_err(|e| Error::provider_read(format!("HTTP request failed: {e}")))
    }

    /// Map a non-success response to the matching error, consuming the body
    async fn error_for(response: reqwest::Response, write: bool, context: &str) -> Error {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error response".to_string());

        match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "OVH rejected the request ({context}): invalid credentials or insufficient permissions, status {status}"
            )),
            404 => Error::not_found(format!("{context}: {error_text}")),
            429 => Error::rate_limited(format!("OVH rate limit hit ({context}), status {status}")),
            _ if write => Error::provider_write(format!("{context}: {status} - {error_text}")),
            _ => Error::provider_read(format!("{context}: {status} - {error_text}")),
        }
    }

    fn record_url(&self, zone: &str, id: i64) -> String {
        format!("{}/domain/zone/{}/record/{}", self.base_url, zone, id)
    }

    fn records_url(&self, zone: &str) -> String {
        format!("{}/domain/zone/{}/record", self.base_url, zone)
    }
}

#[async_trait]
impl RecordTransport for OvhTransport {
    async fn list_record_ids(&self, zone: &str) -> Result<Vec<i64>> {
        let url = self.records_url(zone);
        let response = self.send(reqwest::Method::GET, &url, String::new()).await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, false, &format!("listing records in zone {zone}")).await);
        }
        response
            .json::<Vec<i64>>()
            .await
            .map_err(|e| Error::provider_read(format!("failed to parse record id list: {e}")))
    }

    async fn fetch_record(&self, zone: &str, id: i64) -> Result<Record> {
        let url = self.record_url(zone, id);
        let response = self.send(reqwest::Method::GET, &url, String::new()).await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, false, &format!("fetching record {id}")).await);
        }
        response
            .json::<Record>()
            .await
            .map_err(|e| Error::provider_read(format!("failed to parse record {id}: {e}")))
    }

    async fn create_record(&self, zone: &str, record: &Record) -> Result<Record> {
        let url = self.records_url(zone);
        let body = serde_json::to_string(record)?;
        tracing::debug!(zone, subdomain = %record.subdomain, field_type = record.kind.field_type(), "creating record");

        let response = self
            .send(reqwest::Method::POST, &url, body)
            .await
            .map_err(write_error)?;
        if !response.status().is_success() {
            return Err(Self::error_for(
                response,
                true,
                &format!("creating {} record for {:?}", record.kind.field_type(), record.subdomain),
            )
            .await);
        }
        response
            .json::<Record>()
            .await
            .map_err(|e| Error::provider_write(format!("failed to parse created record: {e}")))
    }

    async fn update_record(&self, zone: &str, id: i64, record: &Record) -> Result<()> {
        let url = self.record_url(zone, id);
        let body = serde_json::to_string(record)?;
        tracing::debug!(zone, id, subdomain = %record.subdomain, "replacing record");

        let response = self
            .send(reqwest::Method::PUT, &url, body)
            .await
            .map_err(write_error)?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, true, &format!("updating record {id}")).await);
        }
        Ok(())
    }

    async fn delete_record(&self, zone: &str, id: i64) -> Result<()> {
        let url = self.record_url(zone, id);
        tracing::debug!(zone, id, "deleting record");

        let response = self
            .send(reqwest::Method::DELETE, &url, String::new())
            .await
            .map_err(write_error)?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, true, &format!("deleting record {id}")).await);
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "ovh"
    }
}

/// Requests that never reached the provider during a write are write failures
fn write_error(err: Error) -> Error {
    match err {
        Error::ProviderRead(msg) => Error::ProviderWrite(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            endpoint: "ovh-eu".to_string(),
            application_key: "app-key".to_string(),
            application_secret: "app-secret".to_string(),
            consumer_key: "consumer-key".to_string(),
        }
    }

    #[test]
    fn known_endpoints_resolve() {
        assert_eq!(
            endpoint_base_url("ovh-eu").unwrap(),
            "https://eu.api.ovh.com/1.0"
        );
        assert_eq!(
            endpoint_base_url("ovh-us").unwrap(),
            "https://api.us.ovhcloud.com/1.0"
        );
    }

    #[test]
    fn explicit_url_passes_through() {
        assert_eq!(
            endpoint_base_url("http://127.0.0.1:8080/1.0/").unwrap(),
            "http://127.0.0.1:8080/1.0"
        );
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        assert!(endpoint_base_url("ovh-moon").is_err());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let mut creds = credentials();
        creds.consumer_key.clear();
        assert!(OvhTransport::new(&creds).is_err());
    }

    #[test]
    fn signature_has_ovh_shape_and_is_deterministic() {
        let transport = OvhTransport::new(&credentials()).unwrap();
        let url = "https://eu.api.ovh.com/1.0/domain/zone/example.org/record";

        let first = transport.sign("GET", url, "", 1700000000);
        let second = transport.sign("GET", url, "", 1700000000);

        assert_eq!(first, second);
        assert!(first.starts_with("$1$"));
        // "$1$" plus 40 hex chars of SHA-1
        assert_eq!(first.len(), 43);
        assert!(first[3..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_covers_method_body_and_timestamp() {
        let transport = OvhTransport::new(&credentials()).unwrap();
        let url = "https://eu.api.ovh.com/1.0/domain/zone/example.org/record";

        let get = transport.sign("GET", url, "", 1700000000);
        assert_ne!(get, transport.sign("POST", url, "", 1700000000));
        assert_ne!(get, transport.sign("GET", url, "{}", 1700000000));
        assert_ne!(get, transport.sign("GET", url, "", 1700000001));
    }

    #[test]
    fn record_urls_follow_the_zone_layout() {
        let transport = OvhTransport::new(&credentials()).unwrap();
        assert_eq!(
            transport.records_url("example.org"),
            "https://eu.api.ovh.com/1.0/domain/zone/example.org/record"
        );
        assert_eq!(
            transport.record_url("example.org", 42),
            "https://eu.api.ovh.com/1.0/domain/zone/example.org/record/42"
        );
    }

    #[test]
    fn debug_does_not_expose_secrets() {
        let transport = OvhTransport::new(&credentials()).unwrap();
        let debug = format!("{transport:?}");
        assert!(!debug.contains("app-secret"));
        assert!(!debug.contains("consumer-key"));
        assert!(debug.contains("OvhTransport"));
    }
}
