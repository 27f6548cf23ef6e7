//! Collaborator seams for the zonesync system
//!
//! The engine consumes three external sources of truth through these traits:
//!
//! - [`RecordTransport`]: the DNS provider's record CRUD API
//! - [`AddressLookup`]: the external address query service
//! - [`IngressSource`]: the ingress layer's hostname listing

pub mod address_lookup;
pub mod ingress_source;
pub mod record_transport;

pub use address_lookup::AddressLookup;
pub use ingress_source::IngressSource;
pub use record_transport::RecordTransport;
