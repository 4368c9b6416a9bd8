use thiserror::Error;

/// Required record could not be extracted from a response block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("can't find port matrix size in system info")]
    SystemInfoMalformed,
    #[error("can't parse model info from system info")]
    ModelInfoMalformed,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid port address '{address}': {reason}")]
    InvalidPortAddress { address: String, reason: String },

    #[error("unsupported port mode '{0}'")]
    UnsupportedMode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPortAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
