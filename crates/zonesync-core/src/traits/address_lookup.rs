// # Address Lookup Trait
//
// Defines the interface to the external address query service.
//
// ## Implementations
//
// - HTTP JSON service: `zonesync-ip-http` crate
//
// Lookups are single-shot and stateless. Caching and staleness policy live in
// `AddressCache`, never in the lookup implementation.

use async_trait::async_trait;

/// Trait for external address lookup implementations
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Query the current external address
    ///
    /// Returns the address as the provider-facing string (an IP literal).
    /// Implementations validate the response shape; a malformed body is an
    /// error, not an empty address.
    async fn lookup(&self) -> Result<String, crate::Error>;
}
