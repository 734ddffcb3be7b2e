//! ntunnel - HTTP tunnel speaking the Navicat binary result protocol.
//!
//! Architecture:
//! - `protocol`: wire encoding (blocks, headers, field and row frames)
//! - `mysql`, `sqlite`: engine drivers
//! - `session`: engine dispatch for one request
//! - `request`: form fields to typed requests
//! - `tunnel`: per-request orchestration
//! - `server`: axum router and diagnostic page

pub mod config;
pub mod error;
pub mod mysql;
pub mod protocol;
pub mod request;
pub mod server;
pub mod session;
pub mod sqlite;
pub mod telemetry;
pub mod tunnel;

pub use config::{Engine, TunnelConfig};
pub use error::{Result, TunnelError};
pub use request::{Action, ConnectParams, TunnelRequest};
pub use tunnel::Tunnel;
