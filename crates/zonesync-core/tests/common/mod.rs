//! Test doubles and common utilities for reconciliation tests
//!
//! The doubles track call counts behind `Arc` so a test can keep a handle
//! while the engine owns a sharing clone, mirroring how the real transports
//! are shared.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use chrono::{DateTime, Duration, Utc};
use zonesync_core::cache::Clock;
use zonesync_core::error::Result;
use zonesync_core::traits::{AddressLookup, RecordTransport};
use zonesync_core::{
    AddressCache, Error, ProviderCredentials, Record, RecordKind, ReconcileEngine, ZoneConfig,
};

/// In-memory provider with call counters and write-failure injection
pub struct MockRecordTransport {
    records: Arc<Mutex<BTreeMap<i64, Record>>>,
    next_id: Arc<AtomicI64>,
    list_calls: Arc<AtomicUsize>,
    fetch_calls: Arc<AtomicUsize>,
    write_attempts: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
    /// Writes with 0-based attempt index >= this value fail
    fail_writes_from: Arc<Mutex<Option<usize>>>,
}

impl MockRecordTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            list_calls: Arc::new(AtomicUsize::new(0)),
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            write_attempts: Arc::new(AtomicUsize::new(0)),
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_writes_from: Arc::new(Mutex::new(None)),
        })
    }

    /// Insert a record as pre-existing remote state, returning its id
    pub fn seed(&self, record: Record) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = record;
        stored.provider_id = Some(id);
        self.records.lock().unwrap().insert(id, stored);
        id
    }

    pub fn record(&self, id: i64) -> Option<Record> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().values().cloned().collect()
    }

    pub fn records_of_kind(&self, kind: &RecordKind) -> Vec<Record> {
        self.records()
            .into_iter()
            .filter(|record| &record.kind == kind)
            .collect()
    }

    pub fn alias_subdomains(&self) -> Vec<String> {
        self.records_of_kind(&RecordKind::Alias)
            .into_iter()
            .map(|record| record.subdomain)
            .collect()
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Total create/update/delete attempts, including failed ones
    pub fn write_attempt_count(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write with attempt index >= `index` fail
    pub fn fail_writes_from(&self, index: usize) {
        *self.fail_writes_from.lock().unwrap() = Some(index);
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(Error::provider_read("injected read failure"))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<()> {
        let attempt = self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(from) = *self.fail_writes_from.lock().unwrap()
            && attempt >= from
        {
            return Err(Error::provider_write("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordTransport for MockRecordTransport {
    async fn list_record_ids(&self, _zone: &str) -> Result<Vec<i64>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        Ok(self.records.lock().unwrap().keys().copied().collect())
    }

    async fn fetch_record(&self, _zone: &str, id: i64) -> Result<Record> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        self.records
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("record {id}")))
    }

    async fn create_record(&self, _zone: &str, record: &Record) -> Result<Record> {
        self.check_write()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut created = record.clone();
        created.provider_id = Some(id);
        self.records.lock().unwrap().insert(id, created.clone());
        Ok(created)
    }

    async fn update_record(&self, _zone: &str, id: i64, record: &Record) -> Result<()> {
        self.check_write()?;
        let mut records = self.records.lock().unwrap();
        if !records.contains_key(&id) {
            return Err(Error::not_found(format!("record {id}")));
        }
        let mut stored = record.clone();
        stored.provider_id = Some(id);
        records.insert(id, stored);
        Ok(())
    }

    async fn delete_record(&self, _zone: &str, id: i64) -> Result<()> {
        self.check_write()?;
        self.records
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("record {id}")))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Controllable address lookup with a call counter
#[derive(Clone)]
pub struct MockAddressLookup {
    address: Arc<Mutex<String>>,
    calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MockAddressLookup {
    pub fn new(address: &str) -> Self {
        Self {
            address: Arc::new(Mutex::new(address.to_string())),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_address(&self, address: &str) {
        *self.address.lock().unwrap() = address.to_string();
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressLookup for MockAddressLookup {
    async fn lookup(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::address_lookup("injected lookup failure"));
        }
        Ok(self.address.lock().unwrap().clone())
    }
}

/// Manually advanced clock shared between the test and the cache
#[derive(Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Utc::now())),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::seconds(secs);
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Zone configuration used by the reconciliation tests
pub fn zone_config() -> ZoneConfig {
    ZoneConfig {
        zone: "example.org".to_string(),
        ttl: 60,
        address_max_age_secs: None,
        provider: ProviderCredentials {
            endpoint: "ovh-eu".to_string(),
            application_key: "test-app-key".to_string(),
            application_secret: "test-app-secret".to_string(),
            consumer_key: "test-consumer-key".to_string(),
        },
    }
}

/// Engine over the given doubles with a system clock
pub fn engine(transport: &Arc<MockRecordTransport>, lookup: &MockAddressLookup) -> ReconcileEngine {
    let cache = AddressCache::new(Box::new(lookup.clone()));
    ReconcileEngine::new(transport.clone(), cache)
}

pub fn hosts(list: &[&str]) -> Vec<String> {
    list.iter().map(|h| h.to_string()).collect()
}
