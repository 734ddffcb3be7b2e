//! Navicat tunnel binary response protocol.
//!
//! Every response body is a concatenation of length-prefixed frames that the
//! client walks with fixed-offset arithmetic. There is no resynchronization:
//! the counts declared in a header must match the frames that follow.
//!
//! Architecture:
//! - `block`: length-prefixed byte strings (short and escaped long form)
//! - `scalar`: big-endian integers and zero padding
//! - `types`: driver column type tables to protocol type codes
//! - `frame`: the frame kinds and per-statement framing
//! - `reader`: decoding counterpart of the primitives above

pub mod block;
pub mod frame;
pub mod reader;
pub mod scalar;
pub mod types;

#[cfg(test)]
mod tests;

pub use block::{decode_block, encode_block, NULL_MARKER};
pub use frame::{
    error_response, ColumnDescriptor, ConnectionInfo, DiagnosticMessage, EchoHeader,
    FieldDescriptors, Frame, ResponseBuilder, ResultSetHeader, Row, RowData, Scalar,
    StatementOutcome, StatementResult, StatementSeparator,
};
pub use reader::{FrameReader, ProtocolError};
pub use types::{map_type, DriverType, ProtocolType};

/// Magic constant opening every echo header.
pub const MAGIC: u32 = 1111;

/// Protocol version carried in the echo header.
pub const PROTOCOL_VERSION: u16 = 202;

/// Error code for malformed requests and unknown actions.
pub const ERR_INVALID_REQUEST: u32 = 202;
