//! DNS record model
//!
//! `Record` mirrors the provider's wire body (`ttl`, `id`, `subDomain`,
//! `target`, `fieldType`, `zone`). The record kind is a closed enum rather
//! than a raw field-type string: kinds the engine does not manage stay
//! visible as [`RecordKind::Other`] and are never mutated or pruned.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Kind of a DNS record, as the engine classifies it
///
/// Kind alone does not decide what the engine manages: the apex is the
/// address record with an empty subdomain, and address records on subdomains
/// are retained but never touched, like [`RecordKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// Address record (wire field type `A`)
    Address,
    /// Canonical-name record for a subdomain (wire field type `CNAME`)
    Alias,
    /// Any other record kind; retained but left untouched
    Other(String),
}

impl RecordKind {
    /// Classify a provider `fieldType` string
    pub fn from_field_type(field_type: &str) -> Self {
        match field_type {
            "A" => RecordKind::Address,
            "CNAME" => RecordKind::Alias,
            other => RecordKind::Other(other.to_string()),
        }
    }

    /// The provider `fieldType` string for this kind
    pub fn field_type(&self) -> &str {
        match self {
            RecordKind::Address => "A",
            RecordKind::Alias => "CNAME",
            RecordKind::Other(field_type) => field_type,
        }
    }
}

impl Serialize for RecordKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.field_type())
    }
}

impl<'de> Deserialize<'de> for RecordKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let field_type = String::deserialize(deserializer)?;
        if field_type.is_empty() {
            return Err(de::Error::custom("record fieldType cannot be empty"));
        }
        Ok(RecordKind::from_field_type(&field_type))
    }
}

/// A DNS resource record in the managed zone
///
/// `provider_id` is assigned by the provider on creation and is absent until
/// the record exists remotely. Mutating calls (`update`, `delete`) require it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record kind (wire `fieldType`)
    #[serde(rename = "fieldType")]
    pub kind: RecordKind,

    /// Subdomain label; empty string for the zone apex
    #[serde(rename = "subDomain")]
    pub subdomain: String,

    /// IP literal for apex records, fully-qualified name ending in `.` for aliases
    pub target: String,

    /// Time-to-live in seconds
    pub ttl: i64,

    /// Provider-assigned identifier; `None` until the record exists remotely
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<i64>,

    /// Zone the record belongs to, as reported by the provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,
}

impl Record {
    /// Desired address record for the zone apex
    pub fn apex(target: impl Into<String>, ttl: i64) -> Self {
        Self {
            kind: RecordKind::Address,
            subdomain: String::new(),
            target: target.into(),
            ttl,
            provider_id: None,
            zone: String::new(),
        }
    }

    /// Desired alias record pointing a subdomain at the zone apex
    pub fn alias(subdomain: impl Into<String>, zone: &str, ttl: i64) -> Self {
        Self {
            kind: RecordKind::Alias,
            subdomain: subdomain.into(),
            target: format!("{zone}."),
            ttl,
            provider_id: None,
            zone: String::new(),
        }
    }

    /// A copy of this record merged with an existing remote identifier
    ///
    /// Used when a desired record replaces a remote one: the comparison stays
    /// on freshly built values, only the identity is carried over.
    pub fn with_provider_id(mut self, provider_id: Option<i64>) -> Self {
        self.provider_id = provider_id;
        self
    }
}
