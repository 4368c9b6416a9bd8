use std::str::FromStr;

use super::{port_part, AddressingScheme, PortMode};
use crate::error::{Error, Result};
use crate::tl1::parser::ConnectionRecord;
use crate::tl1::FiberCommand;
use crate::topology::{
    resolve_logical, ExposedPort, LogicalPairing, PairingOverrides, PortCatalog, PortView,
};

/// Fabric id of IN<n> is INGRESS_OFFSET + n
pub const INGRESS_OFFSET: u32 = 10000;
/// Fabric id of OUT<n> is EGRESS_OFFSET + n
pub const EGRESS_OFFSET: u32 = 20000;

/// Logical port address "{ingress}-{egress}"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalAddress {
    pub ingress: u32,
    pub egress: u32,
}

impl LogicalAddress {
    pub fn ingress_id(&self) -> Option<u32> {
        INGRESS_OFFSET.checked_add(self.ingress)
    }

    pub fn egress_id(&self) -> Option<u32> {
        EGRESS_OFFSET.checked_add(self.egress)
    }
}

impl FromStr for LogicalAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (ingress, egress) = s
            .split_once('-')
            .ok_or_else(|| Error::invalid_address(s, "expected {ingress}-{egress}"))?;
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| Error::invalid_address(s, format!("'{}' is not a port number", part)))
        };
        Ok(Self {
            ingress: parse(ingress)?,
            egress: parse(egress)?,
        })
    }
}

/// IN/OUT pairs exposed as bidirectional ports
#[derive(Debug, Clone, Default)]
pub struct LogicalAddressing {
    overrides: PairingOverrides,
}

impl LogicalAddressing {
    pub fn new(overrides: PairingOverrides) -> Self {
        Self { overrides }
    }

    fn address(full_address: &str) -> Result<LogicalAddress> {
        port_part(full_address)?.parse().map_err(|err| match err {
            Error::InvalidPortAddress { reason, .. } => {
                Error::invalid_address(full_address, reason)
            }
            other => other,
        })
    }

    fn fabric_ids(full_address: &str) -> Result<(u32, u32)> {
        let address = Self::address(full_address)?;
        match (address.ingress_id(), address.egress_id()) {
            (Some(ingress), Some(egress)) => Ok((ingress, egress)),
            _ => Err(Error::invalid_address(full_address, "port number out of range")),
        }
    }
}

impl AddressingScheme for LogicalAddressing {
    fn mode(&self) -> PortMode {
        PortMode::Logical
    }

    fn port_view(&self, catalog: &PortCatalog, records: &[ConnectionRecord]) -> PortView {
        let pairing = LogicalPairing::resolve(catalog, &self.overrides);
        let ports = pairing
            .pairs()
            .map(|pair| ExposedPort {
                address: pair.address(),
                state: pair.state(),
                description: String::new(),
            })
            .collect();

        PortView {
            ports,
            connections: resolve_logical(&pairing, records),
        }
    }

    /// Source ingress feeds destination egress. The min/max ordering of the
    /// physical mode is kept; offset ranges never overlap so ingress stays first.
    fn connect(&self, src: &str, dst: &str) -> Result<FiberCommand> {
        let (src_in, _) = Self::fabric_ids(src)?;
        let (_, dst_out) = Self::fabric_ids(dst)?;

        Ok(FiberCommand::EnterCrossConnect {
            ingress: vec![src_in.min(dst_out)],
            egress: vec![src_in.max(dst_out)],
        })
    }

    fn connect_bidirectional(&self, src: &str, dst: &str) -> Result<FiberCommand> {
        let (src_in, src_out) = Self::fabric_ids(src)?;
        let (dst_in, dst_out) = Self::fabric_ids(dst)?;

        Ok(FiberCommand::EnterCrossConnect {
            ingress: vec![src_in, dst_in],
            egress: vec![dst_out, src_out],
        })
    }

    fn disconnect(&self, src: &str) -> Result<FiberCommand> {
        let (src_in, _) = Self::fabric_ids(src)?;
        Ok(FiberCommand::DeleteCrossConnect { ingress: vec![src_in] })
    }

    fn disconnect_bidirectional(&self, src: &str, dst: &str) -> Result<FiberCommand> {
        let (src_in, _) = Self::fabric_ids(src)?;
        let (dst_in, _) = Self::fabric_ids(dst)?;
        Ok(FiberCommand::DeleteCrossConnect {
            ingress: vec![src_in, dst_in],
        })
    }
}
