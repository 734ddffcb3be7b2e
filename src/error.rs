//! Error types for the tunnel.
//!
//! Every variant carries the protocol error code the client receives in an
//! echo header or result-set header.

use thiserror::Error;

use crate::protocol::ERR_INVALID_REQUEST;

/// Fallback code when a connection fails without a server error code.
pub const ERR_CONNECTION_UNKNOWN: u32 = 2000;

/// The database host could not be reached.
pub const ERR_CONNECTION_REFUSED: u32 = 2003;

/// Fallback code when a statement fails without a server error code.
pub const ERR_STATEMENT_UNKNOWN: u32 = 1000;

#[derive(Error, Debug)]
pub enum TunnelError {
    /// One of `actn`, `host`, `port`, `login` is absent.
    #[error("invalid parameters")]
    MissingParameters,

    #[error("invalid parameters: {0}")]
    InvalidParameter(String),

    #[error("invalid action")]
    InvalidAction(String),

    #[error("{message}")]
    Connection { code: u32, message: String },

    #[error("{message}")]
    Statement { code: u32, message: String },
}

impl TunnelError {
    pub fn code(&self) -> u32 {
        match self {
            TunnelError::MissingParameters
            | TunnelError::InvalidParameter(_)
            | TunnelError::InvalidAction(_) => ERR_INVALID_REQUEST,
            TunnelError::Connection { code, .. } | TunnelError::Statement { code, .. } => *code,
        }
    }
}

pub type Result<T> = std::result::Result<T, TunnelError>;
