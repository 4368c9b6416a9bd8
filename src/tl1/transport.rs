//! Transport seam
//! Session handling lives outside this crate; the driver only needs "send a command,
//! get the response text". ReplayTransport answers from captured responses.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub trait Tl1Transport {
    /// Send one fully rendered TL1 command and block until its response arrives.
    fn send(&mut self, command: &str) -> Result<String>;
}

impl<T: Tl1Transport + ?Sized> Tl1Transport for Box<T> {
    fn send(&mut self, command: &str) -> Result<String> {
        (**self).send(command)
    }
}

/// Capture file names per retrieval verb
pub const CAPTURE_FILES: [(&str, &str); 3] = [
    ("rtrv-system-info", "system-info.txt"),
    ("rtrv-cfg-fiber", "cfg-fiber.txt"),
    ("rtrv-crs-fiber", "crs-fiber.txt"),
];

/// Offline transport: retrieval verbs are answered from captured responses,
/// mutations are acknowledged with COMPLD. Every command sent is recorded.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    responses: HashMap<String, String>,
    sent: Vec<String>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load system-info.txt, cfg-fiber.txt and crs-fiber.txt from a directory.
    /// Missing files are not an error here; sending that verb fails later.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut transport = Self::new();
        for (verb, file) in CAPTURE_FILES {
            let path = dir.join(file);
            if path.exists() {
                transport.responses.insert(verb.to_string(), fs::read_to_string(&path)?);
            } else {
                tracing::warn!("No captured response for {} at {:?}", verb, path);
            }
        }
        Ok(transport)
    }

    pub fn with_response(mut self, verb: &str, response: &str) -> Self {
        self.responses.insert(verb.to_ascii_lowercase(), response.to_string());
        self
    }

    /// Commands sent so far, in order
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl Tl1Transport for ReplayTransport {
    fn send(&mut self, command: &str) -> Result<String> {
        self.sent.push(command.to_string());

        let verb = command
            .split(':')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let tag = command
            .trim_end_matches(';')
            .rsplit(':')
            .next()
            .unwrap_or_default();

        if let Some(response) = self.responses.get(&verb) {
            return Ok(response.clone());
        }

        if verb.starts_with("rtrv-") {
            return Err(Error::Transport(format!("no captured response for '{}'", verb)));
        }

        Ok(format!("   REPLAY\nM  {} COMPLD\n;", tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_answers_and_records() {
        let mut transport = ReplayTransport::new().with_response("rtrv-cfg-fiber", "\"PORTID=1\"");
        assert_eq!(transport.send("rtrv-cfg-fiber::all:1;").unwrap(), "\"PORTID=1\"");

        let ack = transport.send("ent-crs-fiber::3,7:2;").unwrap();
        assert!(ack.contains("M  2 COMPLD"));
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn test_replay_from_dir() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/captures");
        let mut transport = ReplayTransport::from_dir(&dir).unwrap();

        let info = transport.send("rtrv-system-info:::1;").unwrap();
        assert!(info.contains("LicensedPortMatrix=4x4"));
        let ports = transport.send("RTRV-CFG-FIBER::all:2;").unwrap();
        assert!(ports.contains("PORTNAME=OUT4"));
        assert!(transport.send("rtrv-crs-fiber::all:3;").is_ok());
    }

    #[test]
    fn test_replay_from_dir_with_missing_file() {
        let dir = std::env::temp_dir().join(format!("glimmerglass-replay-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("system-info.txt"), "\"LicensedPortMatrix=2x2\"").unwrap();

        let transport = ReplayTransport::from_dir(&dir);
        fs::remove_dir_all(&dir).unwrap();
        let mut transport = transport.unwrap();

        assert!(transport.send("rtrv-system-info:::1;").is_ok());
        assert!(matches!(
            transport.send("rtrv-cfg-fiber::all:2;"),
            Err(Error::Transport(_))
        ));
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn test_replay_missing_capture() {
        let mut transport = ReplayTransport::new();
        assert!(matches!(
            transport.send("rtrv-system-info:::1;"),
            Err(Error::Transport(_))
        ));
    }
}
