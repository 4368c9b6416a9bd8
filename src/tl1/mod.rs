//! TL1 command vocabulary used against the Glimmerglass fabric
//! Commands are built as values and rendered with a correlation tag at send time.

pub mod parser;
pub mod transport;

pub use parser::{ConnectionRecord, PortName, PortRecord, SwitchInfo};
pub use transport::{ReplayTransport, Tl1Transport};

use std::fmt;
use serde::Serialize;

/// A TL1 command without its correlation tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiberCommand {
    RetrieveSystemInfo,
    RetrievePorts,
    RetrieveCrossConnects,
    /// ent-crs-fiber: ingress and egress lists are joined with '&'
    EnterCrossConnect { ingress: Vec<u32>, egress: Vec<u32> },
    /// dlt-crs-fiber: connections are deleted by ingress port
    DeleteCrossConnect { ingress: Vec<u32> },
}

impl FiberCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            FiberCommand::RetrieveSystemInfo => "rtrv-system-info",
            FiberCommand::RetrievePorts => "rtrv-cfg-fiber",
            FiberCommand::RetrieveCrossConnects => "rtrv-crs-fiber",
            FiberCommand::EnterCrossConnect { .. } => "ent-crs-fiber",
            FiberCommand::DeleteCrossConnect { .. } => "dlt-crs-fiber",
        }
    }

    pub fn render(&self, tag: u64) -> String {
        match self {
            FiberCommand::RetrieveSystemInfo => format!("{}:::{};", self.verb(), tag),
            FiberCommand::RetrievePorts | FiberCommand::RetrieveCrossConnects => {
                format!("{}::all:{};", self.verb(), tag)
            }
            FiberCommand::EnterCrossConnect { ingress, egress } => format!(
                "{}::{},{}:{};",
                self.verb(),
                join_ports(ingress),
                join_ports(egress),
                tag
            ),
            FiberCommand::DeleteCrossConnect { ingress } => {
                format!("{}::{}:{};", self.verb(), join_ports(ingress), tag)
            }
        }
    }
}

fn join_ports(ports: &[u32]) -> String {
    ports
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("&")
}

/// Monotonic correlation tag source, owned by one driver session
#[derive(Debug, Clone)]
pub struct CorrelationCounter {
    next: u64,
}

impl CorrelationCounter {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Hand out the next tag. Tags are never reused.
    pub fn advance(&mut self) -> u64 {
        let tag = self.next;
        self.next += 1;
        tag
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for CorrelationCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A rendered command together with the tag embedded in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tl1Command {
    pub tag: u64,
    pub text: String,
}

impl Tl1Command {
    pub fn new(command: &FiberCommand, counter: &mut CorrelationCounter) -> Self {
        let tag = counter.advance();
        Self {
            tag,
            text: command.render(tag),
        }
    }
}

impl fmt::Display for Tl1Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reads() {
        assert_eq!(FiberCommand::RetrieveSystemInfo.render(1), "rtrv-system-info:::1;");
        assert_eq!(FiberCommand::RetrievePorts.render(2), "rtrv-cfg-fiber::all:2;");
        assert_eq!(FiberCommand::RetrieveCrossConnects.render(3), "rtrv-crs-fiber::all:3;");
    }

    #[test]
    fn test_render_bidirectional_enter() {
        let cmd = FiberCommand::EnterCrossConnect {
            ingress: vec![10002, 10004],
            egress: vec![20004, 20002],
        };
        assert_eq!(cmd.render(9), "ent-crs-fiber::10002&10004,20004&20002:9;");
    }

    #[test]
    fn test_counter_is_monotonic() {
        let mut counter = CorrelationCounter::starting_at(41);
        let cmd = FiberCommand::DeleteCrossConnect { ingress: vec![3] };
        let first = Tl1Command::new(&cmd, &mut counter);
        let second = Tl1Command::new(&cmd, &mut counter);
        assert_eq!(first.text, "dlt-crs-fiber::3:41;");
        assert_eq!(second.text, "dlt-crs-fiber::3:42;");
        assert_eq!(counter.peek(), 43);
    }
}
