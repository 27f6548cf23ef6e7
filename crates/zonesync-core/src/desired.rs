//! Desired-state construction
//!
//! Pure translation of the ingress host set into the target record set: one
//! address record for the zone apex, one alias record per in-zone subdomain.
//! No I/O, no clock, fully unit-testable.

use std::collections::BTreeMap;

use crate::record::Record;

/// The record set that should exist in the managed zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    /// The single apex address record
    pub apex: Record,

    /// Alias records keyed by subdomain, deterministic iteration order
    pub aliases: BTreeMap<String, Record>,
}

impl DesiredState {
    /// Build the desired record set from the current ingress hosts
    ///
    /// Hosts that do not end in `.<zone>` are out of scope and skipped, not an
    /// error. A host equal to the zone itself maps to the apex and produces no
    /// alias. Duplicate hosts collapse to one desired record via the map
    /// insert, which is the intended idempotence.
    pub fn build(hosts: &[String], zone: &str, ttl: i64, apex_target: &str) -> Self {
        let apex = Record::apex(apex_target, ttl);
        let suffix = format!(".{zone}");

        let mut aliases = BTreeMap::new();
        for host in hosts {
            if host == zone {
                // already covered by the apex record
                continue;
            }
            let Some(subdomain) = host.strip_suffix(&suffix) else {
                continue;
            };
            if subdomain.is_empty() {
                continue;
            }
            aliases.insert(subdomain.to_string(), Record::alias(subdomain, zone, ttl));
        }

        Self { apex, aliases }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;

    fn hosts(list: &[&str]) -> Vec<String> {
        list.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn apex_record_uses_resolved_target() {
        let desired = DesiredState::build(&[], "example.org", 60, "203.0.113.9");
        assert_eq!(desired.apex.kind, RecordKind::Address);
        assert_eq!(desired.apex.subdomain, "");
        assert_eq!(desired.apex.target, "203.0.113.9");
        assert_eq!(desired.apex.ttl, 60);
        assert!(desired.aliases.is_empty());
    }

    #[test]
    fn in_zone_hosts_become_aliases() {
        let desired = DesiredState::build(
            &hosts(&["grafana.example.org", "www.example.org"]),
            "example.org",
            60,
            "203.0.113.9",
        );
        assert_eq!(desired.aliases.len(), 2);
        let grafana = &desired.aliases["grafana"];
        assert_eq!(grafana.kind, RecordKind::Alias);
        assert_eq!(grafana.target, "example.org.");
        assert_eq!(grafana.ttl, 60);
    }

    #[test]
    fn out_of_zone_host_is_ignored() {
        let desired = DesiredState::build(
            &hosts(&["foo.other.com", "www.example.org"]),
            "example.org",
            60,
            "203.0.113.9",
        );
        assert_eq!(desired.aliases.len(), 1);
        assert!(desired.aliases.contains_key("www"));
    }

    #[test]
    fn host_equal_to_zone_produces_no_alias() {
        let desired = DesiredState::build(&hosts(&["example.org"]), "example.org", 60, "203.0.113.9");
        assert!(desired.aliases.is_empty());
    }

    #[test]
    fn duplicate_hosts_collapse() {
        let desired = DesiredState::build(
            &hosts(&["www.example.org", "www.example.org"]),
            "example.org",
            60,
            "203.0.113.9",
        );
        assert_eq!(desired.aliases.len(), 1);
    }

    #[test]
    fn nested_subdomain_keeps_inner_labels() {
        let desired = DesiredState::build(
            &hosts(&["api.staging.example.org"]),
            "example.org",
            60,
            "203.0.113.9",
        );
        assert!(desired.aliases.contains_key("api.staging"));
    }

    #[test]
    fn empty_label_host_is_skipped() {
        let desired = DesiredState::build(&hosts(&[".example.org"]), "example.org", 60, "203.0.113.9");
        assert!(desired.aliases.is_empty());
    }
}
