//! Switch topology snapshot
//! One root node for the chassis and one child per exposed port, each child
//! cross-referencing the port that currently feeds it.

mod catalog;
mod connections;
mod pairing;

pub use catalog::{PhysicalPort, PortCatalog};
pub use connections::{resolve_logical, resolve_physical, ConnectionMap};
pub use pairing::{LogicalPairing, LogicalPortPair, PairingOverrides};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::addressing::PortMode;
use crate::config::Naming;
use crate::tl1::parser::{Health, SwitchInfo};

/// Port state lookup as the resource model expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PortState {
    Enable,
    Disable,
}

impl PortState {
    pub fn lookup_index(self) -> u32 {
        match self {
            PortState::Enable => 0,
            PortState::Disable => 1,
        }
    }
}

impl From<Health> for PortState {
    fn from(health: Health) -> Self {
        match health {
            Health::Good => PortState::Enable,
            Health::Bad => PortState::Disable,
        }
    }
}

/// A port as exposed to the resource tree, in either addressing mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposedPort {
    pub address: String,
    pub state: PortState,
    pub description: String,
}

/// Everything the assembler needs from an addressing scheme
#[derive(Debug, Clone, Default)]
pub struct PortView {
    pub ports: Vec<ExposedPort>,
    pub connections: ConnectionMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum AttributeValue {
    Text(String),
    Lookup(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub value: AttributeValue,
}

impl Attribute {
    fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: AttributeValue::Text(value.into()),
        }
    }

    fn lookup(name: &str, index: u32) -> Self {
        Self {
            name: name.to_string(),
            value: AttributeValue::Lookup(index),
        }
    }
}

/// Node of the resource tree handed to the orchestration layer's serializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceNode {
    pub name: String,
    pub address: String,
    pub family: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_from: Option<String>,
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResourceNode>,
}

impl ResourceNode {
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| &attr.value)
    }

    pub fn child(&self, address: &str) -> Option<&ResourceNode> {
        self.children.iter().find(|node| node.address == address)
    }
}

/// Immutable result of one topology retrieval
#[derive(Debug, Clone, Serialize)]
pub struct SwitchTopology {
    pub mode: PortMode,
    pub info: SwitchInfo,
    /// Ingress plus egress ports advertised by the chassis
    pub switch_size: u64,
    pub root: ResourceNode,
    pub retrieved_at: DateTime<Utc>,
}

impl SwitchTopology {
    /// Look up a port node by its port address (without the switch prefix)
    pub fn port(&self, port_address: &str) -> Option<&ResourceNode> {
        let full = format!("{}/{}", self.root.address, port_address);
        self.root.child(&full)
    }
}

pub fn assemble(
    address: &str,
    mode: PortMode,
    info: SwitchInfo,
    view: PortView,
    naming: &Naming,
) -> SwitchTopology {
    let children: Vec<ResourceNode> = view
        .ports
        .iter()
        .map(|port| ResourceNode {
            name: naming.port_name(&port.address),
            address: format!("{}/{}", address, port.address),
            family: naming.port_family.clone(),
            model: naming.port_model.clone(),
            serial: None,
            mapped_from: view
                .connections
                .source_of(&port.address)
                .map(|source| format!("{}/{}", address, source)),
            attributes: vec![
                Attribute::lookup("State", port.state.lookup_index()),
                Attribute::lookup("Protocol Type", 0),
                Attribute::text("Port Description", port.description.clone()),
            ],
            children: Vec::new(),
        })
        .collect();

    tracing::info!(
        "Assembled {} topology for {}: {} ports, {} mapped",
        mode,
        address,
        children.len(),
        children.iter().filter(|c| c.mapped_from.is_some()).count()
    );

    let root = ResourceNode {
        name: String::new(),
        address: address.to_string(),
        family: naming.switch_family.clone(),
        model: naming.switch_model.clone(),
        serial: Some(info.serial_number.clone()),
        mapped_from: None,
        attributes: vec![
            Attribute::text("Vendor", info.vendor.clone()),
            Attribute::text("Hardware Type", info.hardware_type.clone()),
            Attribute::text("Version", info.software_version.clone()),
            Attribute::text("Model", info.model.clone()),
        ],
        children,
    };

    SwitchTopology {
        mode,
        switch_size: info.switch_size(),
        info,
        root,
        retrieved_at: Utc::now(),
    }
}
