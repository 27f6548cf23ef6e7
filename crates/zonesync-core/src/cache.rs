//! Time-bounded cache for the external address
//!
//! The cache lives across reconciliation passes and refreshes from the
//! external lookup service only when the last successful lookup is older than
//! the staleness bound. A failed refresh leaves the cache untouched and
//! returns the error: the caller decides whether to proceed or abort, the
//! stale value is never silently served on an explicit failure.
//!
//! Passes run sequentially in a single-engine deployment, so the cache takes
//! `&mut self` instead of wrapping itself in a lock; a deployment with
//! overlapping passes must gate access externally.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::traits::AddressLookup;

/// Clock dependency, injected for testability
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside of tests
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CachedAddress {
    address: String,
    looked_up_at: DateTime<Utc>,
}

/// Cache of the current external address with a staleness bound
pub struct AddressCache {
    lookup: Box<dyn AddressLookup>,
    clock: Box<dyn Clock>,
    cached: Option<CachedAddress>,
}

impl AddressCache {
    /// Create an empty cache backed by the given lookup service
    pub fn new(lookup: Box<dyn AddressLookup>) -> Self {
        Self::with_clock(lookup, Box::new(SystemClock))
    }

    /// Create an empty cache with an explicit clock
    pub fn with_clock(lookup: Box<dyn AddressLookup>, clock: Box<dyn Clock>) -> Self {
        Self {
            lookup,
            clock,
            cached: None,
        }
    }

    /// Return the external address, refreshing if the cache is stale
    ///
    /// The cache is stale when no lookup has succeeded yet or the last one is
    /// older than `max_age_secs`. A bound of zero or less forces a refresh on
    /// every call.
    pub async fn get_address(&mut self, max_age_secs: i64) -> Result<String, crate::Error> {
        let now = self.clock.now();

        if let Some(cached) = &self.cached {
            let age_secs = now.signed_duration_since(cached.looked_up_at).num_seconds();
            if max_age_secs > 0 && age_secs <= max_age_secs {
                return Ok(cached.address.clone());
            }
            debug!(age_secs, max_age_secs, "cached address is stale, refreshing");
        } else {
            debug!("no cached address yet, performing initial lookup");
        }

        let address = self.lookup.lookup().await?;
        self.cached = Some(CachedAddress {
            address: address.clone(),
            looked_up_at: now,
        });
        Ok(address)
    }

    /// Last successfully looked-up address, if any
    pub fn last_known(&self) -> Option<&str> {
        self.cached.as_ref().map(|cached| cached.address.as_str())
    }
}

impl std::fmt::Debug for AddressCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressCache")
            .field("cached", &self.cached)
            .finish_non_exhaustive()
    }
}
