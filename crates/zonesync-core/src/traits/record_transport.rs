// # Record Transport Trait
//
// Defines the interface to the DNS provider's record CRUD API.
//
// ## Implementations
//
// - OVH: `zonesync-provider-ovh` crate
// - Future: Cloudflare, Route53, etc.
//
// Transports are thin and single-shot: one provider call per method, no retry,
// no backoff, no caching. Retrying is the scheduler's job (the next pass), and
// the loaded-state snapshot is owned by `RecordStore`. Every failure is
// surfaced verbatim to the caller.

use crate::Record;
use async_trait::async_trait;

/// Trait for DNS provider transports
///
/// Implementations must be thread-safe and usable across async tasks. Each
/// method maps to exactly one synchronous provider call, bounded only by the
/// transport's own network timeout.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    /// List the identifiers of every record in the zone
    async fn list_record_ids(&self, zone: &str) -> Result<Vec<i64>, crate::Error>;

    /// Fetch the full body of one record by identifier
    async fn fetch_record(&self, zone: &str, id: i64) -> Result<Record, crate::Error>;

    /// Create a record; returns the created record with its provider id set
    async fn create_record(&self, zone: &str, record: &Record) -> Result<Record, crate::Error>;

    /// Replace the record stored under `id` with `record`
    async fn update_record(&self, zone: &str, id: i64, record: &Record)
    -> Result<(), crate::Error>;

    /// Delete the record stored under `id`
    async fn delete_record(&self, zone: &str, id: i64) -> Result<(), crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
