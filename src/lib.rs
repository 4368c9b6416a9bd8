//! Glimmerglass L1 driver
//! TL1 topology resolution and fiber cross-connect commands for Glimmerglass
//! optical switches, in physical or logical (paired IN/OUT) port mode.

pub mod addressing;
pub mod commands;
pub mod config;
pub mod driver;
pub mod error;
pub mod tl1;
pub mod topology;

pub use addressing::{AddressingScheme, PortMode};
pub use commands::CommandGenerator;
pub use crate::config::DriverConfig;
pub use driver::SwitchDriver;
pub use error::{Error, ParseError, Result};
pub use tl1::{ReplayTransport, Tl1Command, Tl1Transport};
pub use topology::{ResourceNode, SwitchTopology};
