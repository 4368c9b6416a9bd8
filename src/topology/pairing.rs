//! Logical port pairing
//! In logical mode an IN<n> and an OUT<m> port are exposed together as one
//! bidirectional port "n-m". By default n == m; configured overrides redirect an
//! egress suffix to a different ingress suffix.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use super::catalog::{PhysicalPort, PortCatalog};
use super::PortState;
use crate::tl1::parser::{Direction, Health, PortName};

/// Configured pairing exceptions: egress suffix -> ingress suffix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingOverrides {
    by_egress: BTreeMap<u32, u32>,
}

impl PairingOverrides {
    pub fn insert(&mut self, egress_suffix: u32, ingress_suffix: u32) {
        self.by_egress.insert(egress_suffix, ingress_suffix);
    }

    pub fn ingress_for(&self, egress_suffix: u32) -> Option<u32> {
        self.by_egress.get(&egress_suffix).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_egress.is_empty()
    }
}

impl FromIterator<(u32, u32)> for PairingOverrides {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self {
            by_egress: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalPortPair {
    pub ingress: PhysicalPort,
    pub egress: PhysicalPort,
}

impl LogicalPortPair {
    pub fn address(&self) -> String {
        format!("{}-{}", self.ingress.suffix(), self.egress.suffix())
    }

    /// Disable if either side is bad
    pub fn state(&self) -> PortState {
        if self.ingress.health == Health::Bad || self.egress.health == Health::Bad {
            PortState::Disable
        } else {
            PortState::Enable
        }
    }
}

/// Pairs resolved for one snapshot, with lookups from either side's suffix
#[derive(Debug, Clone, Default)]
pub struct LogicalPairing {
    pairs: BTreeMap<u32, LogicalPortPair>,
    ingress_of_egress: HashMap<u32, u32>,
}

impl LogicalPairing {
    pub fn resolve(catalog: &PortCatalog, overrides: &PairingOverrides) -> Self {
        let mut ingress_ports: BTreeMap<u32, PhysicalPort> = BTreeMap::new();
        let mut egress_ports: BTreeMap<u32, PhysicalPort> = BTreeMap::new();

        // Suffix collisions on the same side: the later port id wins
        for port in catalog.iter() {
            let side = match port.direction() {
                Direction::Ingress => &mut ingress_ports,
                Direction::Egress => &mut egress_ports,
            };
            if let Some(previous) = side.insert(port.suffix(), *port) {
                tracing::warn!(
                    "Ports {} and {} share logical id {}, keeping {}",
                    previous.id,
                    port.id,
                    port.suffix(),
                    port.id
                );
            }
        }

        // Overridden egress ports claim their ingress first, so the natural
        // same-suffix egress cannot take it afterwards.
        let mut egress_for_ingress: BTreeMap<u32, PhysicalPort> = BTreeMap::new();
        for (suffix, port) in &egress_ports {
            if let Some(target) = overrides.ingress_for(*suffix) {
                if let Some(previous) = egress_for_ingress.insert(target, *port) {
                    tracing::warn!(
                        "Overrides pair both {} and {} with IN{}, keeping {}",
                        previous.name,
                        port.name,
                        target,
                        port.name
                    );
                }
            }
        }
        for (suffix, port) in &egress_ports {
            if overrides.ingress_for(*suffix).is_some() {
                continue;
            }
            match egress_for_ingress.entry(*suffix) {
                Entry::Vacant(slot) => {
                    slot.insert(*port);
                }
                Entry::Occupied(slot) => {
                    tracing::debug!(
                        "{} left unpaired, IN{} is paired with {}",
                        port.name,
                        suffix,
                        slot.get().name
                    );
                }
            }
        }

        let mut pairing = Self::default();
        for (suffix, ingress) in ingress_ports {
            match egress_for_ingress.get(&suffix) {
                Some(egress) => {
                    pairing.ingress_of_egress.insert(egress.suffix(), suffix);
                    pairing.pairs.insert(
                        suffix,
                        LogicalPortPair {
                            ingress,
                            egress: *egress,
                        },
                    );
                }
                None => tracing::debug!("{} has no egress partner, not exposed", ingress.name),
            }
        }

        pairing
    }

    /// Pairs in ingress suffix order
    pub fn pairs(&self) -> impl Iterator<Item = &LogicalPortPair> {
        self.pairs.values()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pair enclosing a port name, from whichever side it belongs to
    pub fn enclosing(&self, name: PortName) -> Option<&LogicalPortPair> {
        let ingress_suffix = match name.direction {
            Direction::Ingress => name.suffix,
            Direction::Egress => *self.ingress_of_egress.get(&name.suffix)?,
        };
        self.pairs.get(&ingress_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tl1::parser::parse_ports;

    fn catalog(lines: &[&str]) -> PortCatalog {
        PortCatalog::build(parse_ports(&lines.join("\n")))
    }

    fn addresses(pairing: &LogicalPairing) -> Vec<String> {
        pairing.pairs().map(|p| p.address()).collect()
    }

    #[test]
    fn test_default_pairing() {
        let catalog = catalog(&[
            "PORTID=10005,PORTNAME=IN5,PORTHEALTH=good",
            "PORTID=20005,PORTNAME=OUT5,PORTHEALTH=good",
            "PORTID=10006,PORTNAME=IN6,PORTHEALTH=good",
        ]);
        let pairing = LogicalPairing::resolve(&catalog, &PairingOverrides::default());

        assert_eq!(addresses(&pairing), vec!["5-5"]);
        assert_eq!(pairing.pairs().next().unwrap().state(), PortState::Enable);
    }

    #[test]
    fn test_bad_side_disables_pair() {
        let catalog = catalog(&[
            "PORTID=10001,PORTNAME=IN1,PORTHEALTH=good",
            "PORTID=20001,PORTNAME=OUT1,PORTHEALTH=bad",
            "PORTID=10002,PORTNAME=IN2,PORTHEALTH=Bad",
            "PORTID=20002,PORTNAME=OUT2,PORTHEALTH=good",
        ]);
        let pairing = LogicalPairing::resolve(&catalog, &PairingOverrides::default());
        assert!(pairing.pairs().all(|p| p.state() == PortState::Disable));
    }

    #[test]
    fn test_override_pairs_other_suffix() {
        let catalog = catalog(&[
            "PORTID=10012,PORTNAME=IN12,PORTHEALTH=good",
            "PORTID=20012,PORTNAME=OUT12,PORTHEALTH=good",
            "PORTID=10009,PORTNAME=IN9,PORTHEALTH=good",
            "PORTID=20009,PORTNAME=OUT9,PORTHEALTH=good",
        ]);
        let overrides: PairingOverrides = [(9, 12)].into_iter().collect();
        let pairing = LogicalPairing::resolve(&catalog, &overrides);

        // IN12 takes OUT9; OUT12 and IN9 are left without partners
        assert_eq!(addresses(&pairing), vec!["12-9"]);

        let out9 = PortName { direction: Direction::Egress, suffix: 9 };
        let in12 = PortName { direction: Direction::Ingress, suffix: 12 };
        let out12 = PortName { direction: Direction::Egress, suffix: 12 };
        assert_eq!(pairing.enclosing(out9).unwrap().address(), "12-9");
        assert_eq!(pairing.enclosing(in12).unwrap().address(), "12-9");
        assert!(pairing.enclosing(out12).is_none());
    }

    #[test]
    fn test_pairing_is_order_independent() {
        let lines = [
            "PORTID=10001,PORTNAME=IN1,PORTHEALTH=good",
            "PORTID=20001,PORTNAME=OUT1,PORTHEALTH=good",
            "PORTID=10002,PORTNAME=IN2,PORTHEALTH=bad",
            "PORTID=20002,PORTNAME=OUT2,PORTHEALTH=good",
            "PORTID=20003,PORTNAME=OUT3,PORTHEALTH=good",
        ];
        let overrides = PairingOverrides::default();
        let forward = LogicalPairing::resolve(&catalog(&lines), &overrides);

        let mut reversed_lines = lines;
        reversed_lines.reverse();
        let reversed = LogicalPairing::resolve(&catalog(&reversed_lines), &overrides);

        assert_eq!(addresses(&forward), addresses(&reversed));
        let states: Vec<_> = forward.pairs().map(|p| p.state()).collect();
        let reversed_states: Vec<_> = reversed.pairs().map(|p| p.state()).collect();
        assert_eq!(states, reversed_states);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_unpaired_ports_excluded() {
        let catalog = catalog(&[
            "PORTID=10001,PORTNAME=IN1,PORTHEALTH=good",
            "PORTID=20002,PORTNAME=OUT2,PORTHEALTH=good",
        ]);
        let pairing = LogicalPairing::resolve(&catalog, &PairingOverrides::default());
        assert!(pairing.is_empty());
    }
}
