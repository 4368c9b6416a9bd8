use std::collections::BTreeMap;
use serde::Serialize;

use super::catalog::PortCatalog;
use super::pairing::LogicalPairing;
use crate::tl1::parser::ConnectionRecord;

/// Directional connection map: destination port address -> source port address.
/// A bidirectional cross-connect shows up as two independent entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionMap {
    feeds: BTreeMap<String, String>,
}

impl ConnectionMap {
    pub fn insert(&mut self, destination: String, source: String) {
        if let Some(previous) = self.feeds.insert(destination.clone(), source) {
            tracing::debug!("{} was already fed by {}, replaced", destination, previous);
        }
    }

    /// Address of the port currently feeding `destination`
    pub fn source_of(&self, destination: &str) -> Option<&str> {
        self.feeds.get(destination).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.feeds.iter().map(|(dst, src)| (dst.as_str(), src.as_str()))
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

/// Physical mode: raw egress id is fed by raw ingress id.
/// Id 0 means unconnected; ids outside the catalog are not addressable.
pub fn resolve_physical(catalog: &PortCatalog, records: &[ConnectionRecord]) -> ConnectionMap {
    let mut map = ConnectionMap::default();

    for record in records {
        if record.ingress_id == 0 || record.egress_id == 0 {
            continue;
        }
        if !catalog.contains(record.ingress_id) || !catalog.contains(record.egress_id) {
            tracing::debug!(
                "Ignoring cross-connect {} -> {}, port not in catalog",
                record.ingress_id,
                record.egress_id
            );
            continue;
        }
        map.insert(record.egress_id.to_string(), record.ingress_id.to_string());
    }

    map
}

/// Logical mode: both ends are projected onto the pairs that enclose them.
pub fn resolve_logical(pairing: &LogicalPairing, records: &[ConnectionRecord]) -> ConnectionMap {
    let mut map = ConnectionMap::default();

    for record in records {
        let source = pairing.enclosing(record.ingress_name);
        let destination = pairing.enclosing(record.egress_name);

        match (source, destination) {
            (Some(src), Some(dst)) => map.insert(dst.address(), src.address()),
            _ => tracing::debug!(
                "Ignoring cross-connect {} -> {}, not part of an exposed pair",
                record.ingress_name,
                record.egress_name
            ),
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tl1::parser::{parse_connections, parse_ports};
    use crate::topology::PairingOverrides;

    const PORTS: &str = "PORTID=3,PORTNAME=IN3,PORTHEALTH=good\n\
                         PORTID=7,PORTNAME=OUT7,PORTHEALTH=good\n\
                         PORTID=4,PORTNAME=IN4,PORTHEALTH=good";

    #[test]
    fn test_physical_entry_is_directional() {
        let catalog = PortCatalog::build(parse_ports(PORTS));
        let records: Vec<_> =
            parse_connections("IPORTID=3,IPORTNAME=IN3,OPORTID=7,OPORTNAME=OUT7").collect();

        let map = resolve_physical(&catalog, &records);
        assert_eq!(map.len(), 1);
        assert_eq!(map.source_of("7"), Some("3"));
        assert_eq!(map.source_of("3"), None);
    }

    #[test]
    fn test_physical_unconnected_sentinel_filtered() {
        let catalog = PortCatalog::build(parse_ports(PORTS));
        let records: Vec<_> = parse_connections(
            "IPORTID=4,IPORTNAME=IN4,OPORTID=0,OPORTNAME=OUT0\n\
             IPORTID=0,IPORTNAME=IN0,OPORTID=7,OPORTNAME=OUT7",
        )
        .collect();

        assert!(resolve_physical(&catalog, &records).is_empty());
    }

    #[test]
    fn test_physical_unknown_port_dropped() {
        let catalog = PortCatalog::build(parse_ports(PORTS));
        let records: Vec<_> =
            parse_connections("IPORTID=3,IPORTNAME=IN3,OPORTID=99,OPORTNAME=OUT99").collect();
        assert!(resolve_physical(&catalog, &records).is_empty());
    }

    #[test]
    fn test_logical_bidirectional_is_two_entries() {
        let ports = "PORTID=10002,PORTNAME=IN2,PORTHEALTH=good\n\
                     PORTID=20002,PORTNAME=OUT2,PORTHEALTH=good\n\
                     PORTID=10004,PORTNAME=IN4,PORTHEALTH=good\n\
                     PORTID=20004,PORTNAME=OUT4,PORTHEALTH=good";
        let catalog = PortCatalog::build(parse_ports(ports));
        let pairing = LogicalPairing::resolve(&catalog, &PairingOverrides::default());
        let records: Vec<_> = parse_connections(
            "IPORTID=10002,IPORTNAME=IN2,OPORTID=20004,OPORTNAME=OUT4\n\
             IPORTID=10004,IPORTNAME=IN4,OPORTID=20002,OPORTNAME=OUT2\n\
             IPORTID=10008,IPORTNAME=IN8,OPORTID=20002,OPORTNAME=OUT2",
        )
        .collect();

        let map = resolve_logical(&pairing, &records);
        // IN8 has no pair, so the last record is dropped rather than overwriting
        assert_eq!(map.len(), 2);
        assert_eq!(map.source_of("4-4"), Some("2-2"));
        assert_eq!(map.source_of("2-2"), Some("4-4"));
    }

    #[test]
    fn test_logical_override_projection() {
        let ports = "PORTID=10012,PORTNAME=IN12,PORTHEALTH=good\n\
                     PORTID=20009,PORTNAME=OUT9,PORTHEALTH=good\n\
                     PORTID=10001,PORTNAME=IN1,PORTHEALTH=good\n\
                     PORTID=20001,PORTNAME=OUT1,PORTHEALTH=good";
        let catalog = PortCatalog::build(parse_ports(ports));
        let overrides: PairingOverrides = [(9, 12)].into_iter().collect();
        let pairing = LogicalPairing::resolve(&catalog, &overrides);
        let records: Vec<_> =
            parse_connections("IPORTID=10001,IPORTNAME=IN1,OPORTID=20009,OPORTNAME=OUT9").collect();

        let map = resolve_logical(&pairing, &records);
        assert_eq!(map.source_of("12-9"), Some("1-1"));
    }
}
