//! Cross-connect command generation
//! Owns the session's correlation counter; every rendered command takes the next tag.

use crate::addressing::{AddressingScheme, PortMode};
use crate::error::Result;
use crate::tl1::{CorrelationCounter, FiberCommand, Tl1Command};

pub struct CommandGenerator {
    scheme: Box<dyn AddressingScheme>,
    counter: CorrelationCounter,
}

impl CommandGenerator {
    pub fn new(scheme: Box<dyn AddressingScheme>) -> Self {
        Self::with_counter(scheme, CorrelationCounter::new())
    }

    pub fn with_counter(scheme: Box<dyn AddressingScheme>, counter: CorrelationCounter) -> Self {
        Self { scheme, counter }
    }

    pub fn mode(&self) -> PortMode {
        self.scheme.mode()
    }

    pub fn scheme(&self) -> &dyn AddressingScheme {
        self.scheme.as_ref()
    }

    /// Tag the next command will carry
    pub fn next_tag(&self) -> u64 {
        self.counter.peek()
    }

    pub fn render(&mut self, command: &FiberCommand) -> Tl1Command {
        Tl1Command::new(command, &mut self.counter)
    }

    pub fn connect_unidirectional(&mut self, src: &str, dst: &str) -> Result<Tl1Command> {
        let command = self.scheme.connect(src, dst)?;
        Ok(self.render(&command))
    }

    pub fn connect_bidirectional(
        &mut self,
        src: &str,
        dst: &str,
        group: &str,
    ) -> Result<Tl1Command> {
        tracing::debug!("Bidirectional mapping {} <-> {} in group '{}'", src, dst, group);
        let command = self.scheme.connect_bidirectional(src, dst)?;
        Ok(self.render(&command))
    }

    pub fn disconnect(&mut self, src: &str, _dst: &str) -> Result<Tl1Command> {
        let command = self.scheme.disconnect(src)?;
        Ok(self.render(&command))
    }

    pub fn disconnect_bidirectional(&mut self, src: &str, dst: &str) -> Result<Tl1Command> {
        let command = self.scheme.disconnect_bidirectional(src, dst)?;
        Ok(self.render(&command))
    }
}
