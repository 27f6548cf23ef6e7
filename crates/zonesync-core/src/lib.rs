// # zonesync-core
//
// Core library for the zonesync DNS zone synchronizer.
//
// ## Architecture Overview
//
// This library keeps one DNS zone's records converged with the hostnames
// exposed by an ingress layer and with the host's current public address:
//
// - **RecordTransport**: Trait for the provider's record CRUD API
// - **AddressLookup**: Trait for the external address query service
// - **IngressSource**: Trait for the ingress hostname listing
// - **AddressCache**: Time-bounded cache of the external address
// - **RecordStore**: Loaded zone snapshot plus single-shot record CRUD
// - **DesiredState**: Pure translation of ingress hosts into target records
// - **ReconcileEngine**: Orchestrates one observe-diff-apply pass
//
// ## Design Principles
//
// 1. **Single-pass core**: The engine exposes one idempotent `reconcile`
//    operation; scheduling policy belongs to the caller
// 2. **Fail fast, no rollback**: A pass aborts on the first failure and is
//    re-attempted wholesale on the next pass
// 3. **Narrow collaborator seams**: Provider, address service, and ingress
//    listing are consumed through traits so every invariant is testable
//    against in-memory doubles

pub mod cache;
pub mod config;
pub mod desired;
pub mod engine;
pub mod error;
pub mod ingress;
pub mod record;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use cache::{AddressCache, Clock, SystemClock};
pub use config::{ProviderCredentials, ZoneConfig};
pub use desired::DesiredState;
pub use engine::{PassSummary, ReconcileEngine};
pub use error::{Error, Result};
pub use ingress::{FileIngressSource, StaticIngressSource};
pub use record::{Record, RecordKind};
pub use store::RecordStore;
pub use traits::{AddressLookup, IngressSource, RecordTransport};
