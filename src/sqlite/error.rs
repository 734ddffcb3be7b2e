//! SQLite error types.

use std::io;

pub type SqliteResult<T> = Result<T, SqliteError>;

/// SQLite-specific errors.
#[derive(Debug)]
pub enum SqliteError {
    /// I/O error
    Io(io::Error),
    /// SQLite error from rusqlite
    Sqlite(rusqlite::Error),
    /// Database path escapes the configured root
    InvalidPath(String),
    /// Background connection thread failure
    Worker(String),
    /// Connection closed
    ConnectionClosed,
    /// The SQL text held no statement, only whitespace or comments
    EmptyQuery,
}

impl SqliteError {
    /// SQLite extended result code, when the library reported one.
    pub fn sqlite_code(&self) -> Option<u32> {
        match self {
            SqliteError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                u32::try_from(err.extended_code).ok()
            }
            _ => None,
        }
    }

    /// Message shown to the client, without the Rust-side prefix.
    pub fn client_message(&self) -> String {
        match self {
            SqliteError::Sqlite(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for SqliteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqliteError::Io(e) => write!(f, "I/O error: {}", e),
            SqliteError::Sqlite(e) => write!(f, "SQLite error: {}", e),
            SqliteError::InvalidPath(p) => write!(f, "Invalid database path: {}", p),
            SqliteError::Worker(e) => write!(f, "Connection worker error: {}", e),
            SqliteError::ConnectionClosed => write!(f, "Connection closed"),
            SqliteError::EmptyQuery => write!(f, "Query was empty"),
        }
    }
}

impl std::error::Error for SqliteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SqliteError::Io(e) => Some(e),
            SqliteError::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SqliteError {
    fn from(e: io::Error) -> Self {
        SqliteError::Io(e)
    }
}

impl From<rusqlite::Error> for SqliteError {
    fn from(e: rusqlite::Error) -> Self {
        SqliteError::Sqlite(e)
    }
}

impl From<tokio_rusqlite::Error> for SqliteError {
    fn from(e: tokio_rusqlite::Error) -> Self {
        match e {
            tokio_rusqlite::Error::Rusqlite(e) => SqliteError::Sqlite(e),
            tokio_rusqlite::Error::ConnectionClosed => SqliteError::ConnectionClosed,
            other => SqliteError::Worker(other.to_string()),
        }
    }
}
