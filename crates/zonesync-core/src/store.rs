//! Provider-facing record store
//!
//! `RecordStore` owns no state beyond the transport handle, the zone name,
//! and the most recently loaded snapshot. `load` enumerates every record id
//! in the zone and buckets the bodies by kind; the mutating calls are thin
//! single-shot passthroughs to the transport with no internal retry.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::record::{Record, RecordKind};
use crate::traits::RecordTransport;

/// Loaded view of the zone plus record CRUD for one provider
pub struct RecordStore {
    transport: Arc<dyn RecordTransport>,
    zone: String,
    apex_records: Vec<Record>,
    alias_records: Vec<Record>,
}

impl RecordStore {
    /// Create a store for one zone; no provider call happens until [`load`](Self::load)
    pub fn new(transport: Arc<dyn RecordTransport>, zone: impl Into<String>) -> Self {
        Self {
            transport,
            zone: zone.into(),
            apex_records: Vec::new(),
            alias_records: Vec::new(),
        }
    }

    /// The managed zone name
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Load the zone's full record set and bucket it by kind
    ///
    /// Only apex address records (kind `A`, empty subdomain) and alias
    /// records are managed. Everything else, including address records on
    /// subdomains, is excluded from both buckets and never touched again;
    /// the zone may legitimately contain such records.
    pub async fn load(&mut self) -> Result<(), crate::Error> {
        let ids = self.transport.list_record_ids(&self.zone).await?;
        debug!(zone = %self.zone, records = ids.len(), "loading remote records");

        let mut apex_records = Vec::new();
        let mut alias_records = Vec::new();
        for id in ids {
            let record = self.transport.fetch_record(&self.zone, id).await?;
            match record.kind {
                RecordKind::Address if record.subdomain.is_empty() => apex_records.push(record),
                RecordKind::Alias => alias_records.push(record),
                _ => {
                    trace!(
                        id,
                        field_type = record.kind.field_type(),
                        subdomain = %record.subdomain,
                        "leaving unmanaged record untouched"
                    );
                }
            }
        }

        self.apex_records = apex_records;
        self.alias_records = alias_records;
        Ok(())
    }

    /// Apex address records from the most recent load
    pub fn apex_records(&self) -> &[Record] {
        &self.apex_records
    }

    /// Alias records from the most recent load
    pub fn alias_records(&self) -> &[Record] {
        &self.alias_records
    }

    /// Look up an alias by subdomain in the most recently loaded snapshot
    ///
    /// Does not re-fetch from the provider. Absence is an expected signal,
    /// not an error: the engine turns it into a create.
    pub fn find_alias(&self, subdomain: &str) -> Option<&Record> {
        self.alias_records
            .iter()
            .find(|record| record.subdomain == subdomain)
    }

    /// Create a record at the provider
    pub async fn add(&self, record: &Record) -> Result<Record, crate::Error> {
        self.transport.create_record(&self.zone, record).await
    }

    /// Replace an existing record; requires a known provider id
    pub async fn update(&self, record: &Record) -> Result<(), crate::Error> {
        let id = record
            .provider_id
            .ok_or_else(|| crate::Error::invalid_input("update requires a provider id"))?;
        self.transport.update_record(&self.zone, id, record).await
    }

    /// Delete an existing record; requires a known provider id
    pub async fn delete(&self, record: &Record) -> Result<(), crate::Error> {
        let id = record
            .provider_id
            .ok_or_else(|| crate::Error::invalid_input("delete requires a provider id"))?;
        self.transport.delete_record(&self.zone, id).await
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("zone", &self.zone)
            .field("apex_records", &self.apex_records.len())
            .field("alias_records", &self.alias_records.len())
            .finish_non_exhaustive()
    }
}
