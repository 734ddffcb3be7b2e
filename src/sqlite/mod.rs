//! SQLite engine.
//!
//! This module drives SQLite through rusqlite, with tokio-rusqlite keeping
//! the blocking library calls off the async runtime.

pub mod connection;
pub mod error;
pub mod types;


pub use connection::SqliteConnection;
pub use error::{SqliteError, SqliteResult};
