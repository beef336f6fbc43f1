use thiserror::Error;

use crate::stp::PortNo;

pub type Result<T> = std::result::Result<T, StpError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StpError {
    /// Frame or BPDU shorter than its fixed layout
    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("not an 802.1D LLC header: dsap={dsap:#04x} ssap={ssap:#04x} control={control:#04x}")]
    InvalidLlc { dsap: u8, ssap: u8, control: u8 },

    #[error("ethertype {0:#06x} frame carries no LLC header")]
    NotLlc(u16),

    #[error("unknown protocol id {0:#06x}")]
    UnknownProtocol(u16),

    #[error("unknown BPDU message type {0:#04x}")]
    UnknownMessageType(u8),

    #[error("port {0} is not enrolled in the bridge")]
    PortNotFound(PortNo),

    #[error("port {0} is already enrolled in the bridge")]
    PortExists(PortNo),

    /// Port arena is full
    #[error("bridge cannot hold more than {max} ports")]
    PortCapacity { max: usize },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl StpError {
    pub(crate) fn invalid<S: Into<String>>(name: &'static str, reason: S) -> Self {
        StpError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for errors raised while decoding a received frame.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            StpError::Truncated { .. }
                | StpError::InvalidLlc { .. }
                | StpError::NotLlc(_)
                | StpError::UnknownProtocol(_)
                | StpError::UnknownMessageType(_)
        )
    }
}

impl From<toml::de::Error> for StpError {
    fn from(err: toml::de::Error) -> Self {
        StpError::Config(err.to_string())
    }
}
