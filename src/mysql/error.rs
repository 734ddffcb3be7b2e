//! Error types for the MySQL engine.

use std::fmt;

use crate::error::{ERR_CONNECTION_REFUSED, ERR_CONNECTION_UNKNOWN, ERR_STATEMENT_UNKNOWN};

/// Result type for MySQL operations.
pub type MySqlResult<T> = Result<T, MySqlError>;

/// Errors that can occur during MySQL operations.
#[derive(Debug)]
pub enum MySqlError {
    /// Error reported by the driver or the server.
    Driver(::mysql::Error),

    /// The blocking worker running the driver call failed.
    Worker(String),

    /// Connection is closed or was lost by a failed worker.
    ConnectionClosed,
}

impl MySqlError {
    /// Error code the server sent, if any.
    pub fn server_code(&self) -> Option<u32> {
        match self {
            MySqlError::Driver(::mysql::Error::MySqlError(e)) => Some(u32::from(e.code)),
            _ => None,
        }
    }

    fn is_unreachable(&self) -> bool {
        matches!(
            self,
            MySqlError::Driver(::mysql::Error::IoError(_))
                | MySqlError::Driver(::mysql::Error::DriverError(
                    ::mysql::DriverError::CouldNotConnect(_)
                ))
        )
    }

    /// Code for the echo header when connecting failed.
    pub fn connect_code(&self) -> u32 {
        match self.server_code() {
            Some(code) => code,
            None if self.is_unreachable() => ERR_CONNECTION_REFUSED,
            None => ERR_CONNECTION_UNKNOWN,
        }
    }

    /// Code for the result-set header when a statement failed.
    pub fn statement_code(&self) -> u32 {
        self.server_code().unwrap_or(ERR_STATEMENT_UNKNOWN)
    }

    /// Message shown to the client. Server errors carry only the server's
    /// text, matching what native clients display.
    pub fn client_message(&self) -> String {
        match self {
            MySqlError::Driver(::mysql::Error::MySqlError(e)) => e.message.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for MySqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MySqlError::Driver(e) => write!(f, "{}", e),
            MySqlError::Worker(msg) => write!(f, "Worker error: {}", msg),
            MySqlError::ConnectionClosed => write!(f, "Connection is closed"),
        }
    }
}

impl std::error::Error for MySqlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MySqlError::Driver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<::mysql::Error> for MySqlError {
    fn from(e: ::mysql::Error) -> Self {
        MySqlError::Driver(e)
    }
}
