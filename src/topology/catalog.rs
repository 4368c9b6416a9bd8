use std::collections::BTreeMap;

use crate::tl1::parser::{Direction, Health, PortName, PortRecord};

/// A raw unidirectional fiber port as reported by the switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalPort {
    pub id: u32,
    pub name: PortName,
    pub health: Health,
}

impl PhysicalPort {
    pub fn direction(&self) -> Direction {
        self.name.direction
    }

    /// Numeric part of the port name, used for logical pairing
    pub fn suffix(&self) -> u32 {
        self.name.suffix
    }
}

impl From<PortRecord> for PhysicalPort {
    fn from(record: PortRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            health: record.health,
        }
    }
}

/// Port catalog keyed by port id, iterated in id order
#[derive(Debug, Clone, Default)]
pub struct PortCatalog {
    ports: BTreeMap<u32, PhysicalPort>,
}

impl PortCatalog {
    pub fn build(records: impl IntoIterator<Item = PortRecord>) -> Self {
        let mut ports = BTreeMap::new();
        for record in records {
            if let Some(previous) = ports.insert(record.id, PhysicalPort::from(record)) {
                tracing::warn!(
                    "Port id {} reported twice ({} replaced by {})",
                    record.id,
                    previous.name,
                    record.name
                );
            }
        }
        Self { ports }
    }

    pub fn get(&self, id: u32) -> Option<&PhysicalPort> {
        self.ports.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ports.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicalPort> {
        self.ports.values()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tl1::parser::parse_ports;

    #[test]
    fn test_catalog_direction_and_health() {
        let block = "PORTID=3,PORTNAME=IN3,PORTHEALTH=good\n\
                     PORTID=7,PORTNAME=OUT7,PORTHEALTH=bad\n\
                     garbage line";
        let catalog = PortCatalog::build(parse_ports(block));

        assert_eq!(catalog.len(), 2);
        let ingress = catalog.get(3).unwrap();
        assert_eq!(ingress.direction(), Direction::Ingress);
        assert_eq!(ingress.health, Health::Good);
        let egress = catalog.get(7).unwrap();
        assert_eq!(egress.direction(), Direction::Egress);
        assert_eq!(egress.health, Health::Bad);
        assert_eq!(egress.suffix(), 7);
        assert!(!catalog.contains(4));
    }

    #[test]
    fn test_catalog_iterates_by_id() {
        let block = "PORTID=20001,PORTNAME=OUT1,PORTHEALTH=good\n\
                     PORTID=10001,PORTNAME=IN1,PORTHEALTH=good";
        let catalog = PortCatalog::build(parse_ports(block));
        let ids: Vec<u32> = catalog.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10001, 20001]);
    }
}
