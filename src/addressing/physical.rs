use super::{port_part, AddressingScheme, PortMode};
use crate::error::{Error, Result};
use crate::tl1::parser::ConnectionRecord;
use crate::tl1::FiberCommand;
use crate::topology::{resolve_physical, ExposedPort, PortCatalog, PortState, PortView};

/// Every raw port is addressed by its fabric id
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicalAddressing;

impl PhysicalAddressing {
    fn port_id(full_address: &str) -> Result<u32> {
        let port = port_part(full_address)?;
        let id: u32 = port
            .parse()
            .map_err(|_| Error::invalid_address(full_address, "port id is not a number"))?;
        if id == 0 {
            return Err(Error::invalid_address(full_address, "port id must be positive"));
        }
        Ok(id)
    }
}

impl AddressingScheme for PhysicalAddressing {
    fn mode(&self) -> PortMode {
        PortMode::Physical
    }

    fn port_view(&self, catalog: &PortCatalog, records: &[ConnectionRecord]) -> PortView {
        let ports = catalog
            .iter()
            .map(|port| ExposedPort {
                address: port.id.to_string(),
                state: PortState::from(port.health),
                description: port.name.to_string(),
            })
            .collect();

        PortView {
            ports,
            connections: resolve_physical(catalog, records),
        }
    }

    /// The lower id is the ingress side, whichever order the ports were given in
    fn connect(&self, src: &str, dst: &str) -> Result<FiberCommand> {
        let src_id = Self::port_id(src)?;
        let dst_id = Self::port_id(dst)?;

        Ok(FiberCommand::EnterCrossConnect {
            ingress: vec![src_id.min(dst_id)],
            egress: vec![src_id.max(dst_id)],
        })
    }

    fn connect_bidirectional(&self, src: &str, dst: &str) -> Result<FiberCommand> {
        tracing::warn!(
            "Physical ports are unidirectional, mapping {} -> {} one way only",
            src,
            dst
        );
        self.connect(src, dst)
    }

    fn disconnect(&self, src: &str) -> Result<FiberCommand> {
        Ok(FiberCommand::DeleteCrossConnect {
            ingress: vec![Self::port_id(src)?],
        })
    }

    fn disconnect_bidirectional(&self, src: &str, _dst: &str) -> Result<FiberCommand> {
        self.disconnect(src)
    }
}
