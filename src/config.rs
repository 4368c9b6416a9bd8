//! Driver configuration
//! Read once at startup from an optional file plus GLIMMERGLASS__* environment overrides.

use std::collections::HashMap;
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::addressing::PortMode;
use crate::error::{Error, Result};
use crate::topology::PairingOverrides;

const ENV_PREFIX: &str = "GLIMMERGLASS";
const DEFAULT_CONNECTION_PORT: u16 = 10034;

/// Resource family/model names and the port display name template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Naming {
    pub switch_family: String,
    pub switch_model: String,
    pub port_family: String,
    pub port_model: String,
    pub port_name_template: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            switch_family: "L1 Optical Switch".to_string(),
            switch_model: "Glimmerglass".to_string(),
            port_family: "L1 Optical Switch Port".to_string(),
            port_model: "Port Glimmerglass".to_string(),
            port_name_template: "Port {address}".to_string(),
        }
    }
}

impl Naming {
    pub fn port_name(&self, address: &str) -> String {
        self.port_name_template.replace("{address}", address)
    }
}

/// Settings as they appear in the file/environment, before validation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSettings {
    port_mode: String,
    port_pairing: HashMap<String, String>,
    naming: Naming,
    connection_port: u16,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            port_mode: "physical".to_string(),
            port_pairing: HashMap::new(),
            naming: Naming::default(),
            connection_port: DEFAULT_CONNECTION_PORT,
        }
    }
}

/// Immutable driver configuration, shared read-only by every component
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub port_mode: PortMode,
    /// egress suffix -> ingress suffix
    pub port_pairing: PairingOverrides,
    pub naming: Naming,
    /// Only meaningful to the transport collaborator.
    pub connection_port: u16,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            port_mode: PortMode::Physical,
            port_pairing: PairingOverrides::default(),
            naming: Naming::default(),
            connection_port: DEFAULT_CONNECTION_PORT,
        }
    }
}

impl DriverConfig {
    /// Load configuration. A missing file falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                tracing::info!("Reading driver configuration from {:?}", path);
            } else {
                tracing::warn!("Configuration file {:?} not found, using defaults", path);
            }
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let raw: RawSettings = settings.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let port_mode: PortMode = raw.port_mode.parse()?;

        let mut port_pairing = PairingOverrides::default();
        for (egress, ingress) in &raw.port_pairing {
            let egress_suffix = parse_suffix(egress)?;
            let ingress_suffix = parse_suffix(ingress)?;
            port_pairing.insert(egress_suffix, ingress_suffix);
        }

        if !port_pairing.is_empty() && port_mode == PortMode::Physical {
            tracing::warn!("port_pairing overrides are ignored in physical port mode");
        }

        Ok(Self {
            port_mode,
            port_pairing,
            naming: raw.naming,
            connection_port: raw.connection_port,
        })
    }
}

fn parse_suffix(value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("port pairing entry '{}' is not a port number", value)))
}
