//! MySQL engine.
//!
//! Architecture:
//! - `connection`: connect, run statements, connection info
//! - `types`: driver values and field packets to protocol values
//! - `error`: error classification into protocol error codes

pub mod connection;
pub mod error;
pub mod types;

pub use connection::{MySqlConnectOptions, MySqlConnection, DEFAULT_PORT};
pub use error::{MySqlError, MySqlResult};
