//! Glimmerglass switch driver
//! Resolves topology from the three retrieval commands and issues fiber
//! cross-connect mutations. One driver instance per switch session.

use crate::addressing::{scheme_for, PortMode};
use crate::commands::CommandGenerator;
use crate::config::DriverConfig;
use crate::error::Result;
use crate::tl1::parser::{parse_connections, parse_ports, parse_system_info};
use crate::tl1::{FiberCommand, Tl1Command, Tl1Transport};
use crate::topology::{assemble, PortCatalog, SwitchTopology};

pub struct SwitchDriver<T: Tl1Transport> {
    config: DriverConfig,
    transport: T,
    generator: CommandGenerator,
}

impl<T: Tl1Transport> SwitchDriver<T> {
    pub fn new(config: DriverConfig, transport: T) -> Self {
        let generator = CommandGenerator::new(scheme_for(&config));
        tracing::info!("Driver created in {} port mode", config.port_mode);
        Self {
            config,
            transport,
            generator,
        }
    }

    pub fn mode(&self) -> PortMode {
        self.config.port_mode
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&mut self, command: Tl1Command) -> Result<String> {
        tracing::debug!("-> {}", command.text);
        let response = self.transport.send(&command.text)?;
        tracing::debug!("<- [{}] {} bytes", command.tag, response.len());
        Ok(response)
    }

    fn retrieve(&mut self, command: FiberCommand) -> Result<String> {
        let command = self.generator.render(&command);
        self.send(command)
    }

    /// Fresh snapshot of the switch. Nothing is cached between calls.
    pub fn get_topology(&mut self, address: &str) -> Result<SwitchTopology> {
        let system_info = self.retrieve(FiberCommand::RetrieveSystemInfo)?;
        let port_list = self.retrieve(FiberCommand::RetrievePorts)?;
        let connections = self.retrieve(FiberCommand::RetrieveCrossConnects)?;

        let info = parse_system_info(&system_info)?;
        tracing::info!(
            "Switch {} {} serial {}, {}x{} ports",
            info.vendor,
            info.model,
            info.serial_number,
            info.ingress_count,
            info.egress_count
        );

        let catalog = PortCatalog::build(parse_ports(&port_list));
        let records: Vec<_> = parse_connections(&connections).collect();
        tracing::debug!("{} ports, {} cross-connect records", catalog.len(), records.len());

        let view = self.generator.scheme().port_view(&catalog, &records);
        Ok(assemble(address, self.config.port_mode, info, view, &self.config.naming))
    }

    pub fn map_uni(&mut self, src_port: &str, dst_port: &str) -> Result<String> {
        tracing::info!("map_uni {} {}", src_port, dst_port);
        let command = self.generator.connect_unidirectional(src_port, dst_port)?;
        self.send(command)
    }

    pub fn map_bidi(&mut self, src_port: &str, dst_port: &str, group: &str) -> Result<String> {
        tracing::info!("map_bidi {} {} group={}", src_port, dst_port, group);
        let command = self.generator.connect_bidirectional(src_port, dst_port, group)?;
        self.send(command)
    }

    pub fn map_clear_to(&mut self, src_port: &str, dst_port: &str) -> Result<String> {
        tracing::info!("map_clear_to {} {}", src_port, dst_port);
        let command = self.generator.disconnect(src_port, dst_port)?;
        self.send(command)
    }

    pub fn map_clear(&mut self, src_port: &str, dst_port: &str) -> Result<String> {
        tracing::info!("map_clear {} {}", src_port, dst_port);
        let command = self.generator.disconnect_bidirectional(src_port, dst_port)?;
        self.send(command)
    }
}
