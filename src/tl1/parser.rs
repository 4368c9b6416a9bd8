//! TL1 response record parser
//! Glimmerglass responses quote each record ("...") and a record may wrap across
//! several lines, so records are cut at quote boundaries (unquoted text one line at
//! a time) and fields are located by key, not by position. Records that do not have
//! the expected shape are skipped.

use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ParseError;

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(err) => panic!("invalid TL1 pattern {pattern}: {err}"),
    }
}

// One quoted record, tolerating escaped quotes and embedded newlines
static QUOTED_RECORD: Lazy<Regex> = Lazy::new(|| compile(r#""((?:[^"\\]|\\.)*)""#));

static PORT_MATRIX: Lazy<Regex> = Lazy::new(|| compile(r"LicensedPortMatrix=(\d+)x(\d+)"));
static SERIAL_NUMBER: Lazy<Regex> = Lazy::new(|| compile(r#"SerialNumber=([^"\s,\\]+)"#));
static SYSTEM_TYPE: Lazy<Regex> = Lazy::new(|| compile(r#"SystemType=([^"\s,\\]+)"#));
static CHASSIS_TYPE: Lazy<Regex> =
    Lazy::new(|| compile(r#"([^"\s,:\\]+):ChassisType=([^"\s,\\]+)"#));
static SOFTWARE_VERSION: Lazy<Regex> =
    Lazy::new(|| compile(r#"SoftwareActiveVersion=([^"\s,\\]+)"#));

static PORT_ID: Lazy<Regex> = Lazy::new(|| compile(r"\bPORTID=(\d+)"));
static PORT_NAME: Lazy<Regex> = Lazy::new(|| compile(r#"\bPORTNAME=(?:\\?")?(IN|OUT)(\d+)\b"#));
static PORT_HEALTH: Lazy<Regex> = Lazy::new(|| compile(r"\bPORTHEALTH=(?i:(good|bad))\b"));

static IN_PORT_ID: Lazy<Regex> = Lazy::new(|| compile(r"\bIPORTID=(\d+)"));
static IN_PORT_NAME: Lazy<Regex> =
    Lazy::new(|| compile(r#"\bIPORTNAME=(?:\\?")?(IN|OUT)(\d+)\b"#));
static OUT_PORT_ID: Lazy<Regex> = Lazy::new(|| compile(r"\bOPORTID=(\d+)"));
static OUT_PORT_NAME: Lazy<Regex> =
    Lazy::new(|| compile(r#"\bOPORTNAME=(?:\\?")?(IN|OUT)(\d+)\b"#));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Ingress,
    Egress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Health {
    Good,
    Bad,
}

/// Port name token: IN<n> or OUT<n>. The numeric part is the logical suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortName {
    pub direction: Direction,
    pub suffix: u32,
}

impl fmt::Display for PortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ingress => write!(f, "IN{}", self.suffix),
            Direction::Egress => write!(f, "OUT{}", self.suffix),
        }
    }
}

/// Chassis identity from rtrv-system-info
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchInfo {
    pub ingress_count: u32,
    pub egress_count: u32,
    pub vendor: String,
    pub hardware_type: String,
    pub software_version: String,
    pub model: String,
    pub serial_number: String,
}

impl SwitchInfo {
    /// Advertised switch size: ingress plus egress ports
    pub fn switch_size(&self) -> u64 {
        u64::from(self.ingress_count) + u64::from(self.egress_count)
    }
}

/// One rtrv-cfg-fiber record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRecord {
    pub id: u32,
    pub name: PortName,
    pub health: Health,
}

/// One rtrv-crs-fiber record: ingress feeds egress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub ingress_id: u32,
    pub ingress_name: PortName,
    pub egress_id: u32,
    pub egress_name: PortName,
}

/// Split a response block into records. Every quoted span is one record; text
/// outside the quotes (headers, unquoted output) is one record per line.
pub fn records(block: &str) -> impl Iterator<Item = &str> + '_ {
    let mut records = Vec::new();
    let mut outside = 0;

    for caps in QUOTED_RECORD.captures_iter(block) {
        if let (Some(span), Some(inner)) = (caps.get(0), caps.get(1)) {
            records.extend(block[outside..span.start()].lines());
            records.push(inner.as_str());
            outside = span.end();
        }
    }
    records.extend(block[outside..].lines());

    records.into_iter().filter(|record| !record.trim().is_empty())
}

pub fn parse_system_info(block: &str) -> Result<SwitchInfo, ParseError> {
    let size = PORT_MATRIX
        .captures(block)
        .ok_or(ParseError::SystemInfoMalformed)?;
    let ingress_count = positive(&size[1]).ok_or(ParseError::SystemInfoMalformed)?;
    let egress_count = positive(&size[2]).ok_or(ParseError::SystemInfoMalformed)?;

    let field = |re: &Regex| -> Result<String, ParseError> {
        re.captures(block)
            .map(|caps| caps[1].to_string())
            .ok_or(ParseError::ModelInfoMalformed)
    };

    let serial_number = field(&SERIAL_NUMBER)?;
    let hardware_type = field(&SYSTEM_TYPE)?;
    let software_version = field(&SOFTWARE_VERSION)?;
    let chassis = CHASSIS_TYPE
        .captures(block)
        .ok_or(ParseError::ModelInfoMalformed)?;

    Ok(SwitchInfo {
        ingress_count,
        egress_count,
        vendor: chassis[1].to_string(),
        hardware_type,
        software_version,
        model: chassis[2].to_string(),
        serial_number,
    })
}

/// Port records from rtrv-cfg-fiber, lazily
pub fn parse_ports(block: &str) -> impl Iterator<Item = PortRecord> + '_ {
    records(block).filter_map(|record| {
        let parsed = parse_port(record);
        if parsed.is_none() {
            tracing::trace!("Skipping port record: {:?}", record);
        }
        parsed
    })
}

fn parse_port(record: &str) -> Option<PortRecord> {
    let id = positive(&PORT_ID.captures(record)?[1])?;
    let name = port_name(&PORT_NAME, record)?;
    let health = match PORT_HEALTH.captures(record)?[1].to_ascii_lowercase().as_str() {
        "good" => Health::Good,
        _ => Health::Bad,
    };

    Some(PortRecord { id, name, health })
}

/// Cross-connect records from rtrv-crs-fiber, lazily
pub fn parse_connections(block: &str) -> impl Iterator<Item = ConnectionRecord> + '_ {
    records(block).filter_map(|record| {
        let parsed = parse_connection(record);
        if parsed.is_none() {
            tracing::trace!("Skipping cross-connect record: {:?}", record);
        }
        parsed
    })
}

fn parse_connection(record: &str) -> Option<ConnectionRecord> {
    // id 0 marks an unconnected side; it is kept here and filtered by the resolver
    let ingress_id = IN_PORT_ID.captures(record)?[1].parse().ok()?;
    let ingress_name = port_name(&IN_PORT_NAME, record)?;
    let egress_id = OUT_PORT_ID.captures(record)?[1].parse().ok()?;
    let egress_name = port_name(&OUT_PORT_NAME, record)?;

    Some(ConnectionRecord {
        ingress_id,
        ingress_name,
        egress_id,
        egress_name,
    })
}

fn port_name(re: &Regex, record: &str) -> Option<PortName> {
    let caps = re.captures(record)?;
    let direction = match &caps[1] {
        "IN" => Direction::Ingress,
        _ => Direction::Egress,
    };
    let suffix = caps[2].parse().ok()?;
    Some(PortName { direction, suffix })
}

fn positive(digits: &str) -> Option<u32> {
    digits.parse().ok().filter(|n| *n > 0)
}
