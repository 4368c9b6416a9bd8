//! Port addressing schemes
//! Physical mode exposes every raw port by id. Logical mode exposes IN/OUT pairs
//! as bidirectional ports and offsets their suffixes into the fabric's id ranges.

mod logical;
mod physical;

pub use logical::{LogicalAddress, LogicalAddressing, EGRESS_OFFSET, INGRESS_OFFSET};
pub use physical::PhysicalAddressing;

use std::fmt;
use std::str::FromStr;
use serde::Serialize;

use crate::config::DriverConfig;
use crate::error::{Error, Result};
use crate::tl1::parser::ConnectionRecord;
use crate::tl1::FiberCommand;
use crate::topology::{PortCatalog, PortView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    Physical,
    Logical,
}

impl FromStr for PortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "physical" => Ok(PortMode::Physical),
            "logical" => Ok(PortMode::Logical),
            _ => Err(Error::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for PortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortMode::Physical => f.write_str("physical"),
            PortMode::Logical => f.write_str("logical"),
        }
    }
}

/// Port part of a full resource address "{switch}/{port}"
pub fn port_part(full_address: &str) -> Result<&str> {
    match full_address.rsplit_once('/') {
        Some((_, port)) if !port.is_empty() => Ok(port),
        _ => Err(Error::invalid_address(full_address, "expected {switch}/{port}")),
    }
}

/// The seam between the two addressing modes. Both the read side (which ports are
/// exposed, how connections are keyed) and the write side (which fabric ids a
/// command names) go through here.
pub trait AddressingScheme {
    fn mode(&self) -> PortMode;

    /// Exposed ports and the connection map keyed by their addresses
    fn port_view(&self, catalog: &PortCatalog, records: &[ConnectionRecord]) -> PortView;

    /// Unidirectional cross-connect, `src` feeding `dst`
    fn connect(&self, src: &str, dst: &str) -> Result<FiberCommand>;

    fn connect_bidirectional(&self, src: &str, dst: &str) -> Result<FiberCommand>;

    /// Remove the connection leaving `src`
    fn disconnect(&self, src: &str) -> Result<FiberCommand>;

    fn disconnect_bidirectional(&self, src: &str, dst: &str) -> Result<FiberCommand>;
}

pub fn scheme_for(config: &DriverConfig) -> Box<dyn AddressingScheme> {
    match config.port_mode {
        PortMode::Physical => Box::new(PhysicalAddressing),
        PortMode::Logical => Box::new(LogicalAddressing::new(config.port_pairing.clone())),
    }
}
