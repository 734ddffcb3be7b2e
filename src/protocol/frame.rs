//! Response frames.
//!
//! Layouts (all integers big-endian u32 unless noted):
//!
//! ```text
//! EchoHeader       magic(1111) version:u16(202) error_code  pad[6]          16 bytes
//! ConnectionInfo   block(host_info) block(protocol_version) block(server_version)
//! ResultSetHeader  error_code affected_rows insert_id field_count row_count pad[12]  32 bytes
//! FieldDescriptor  block(name) block(table) type_code flags(0) declared_length
//! RowData          per value: 0xFF (NULL) or block(text)
//! Separator        0x01 (more statements follow) or 0x00 (last)
//! ```

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

use super::block::{put_block, NULL_MARKER};
use super::scalar::{put_zero_pad, saturating_u32};
use super::types::{map_type, DriverType};
use super::{MAGIC, PROTOCOL_VERSION};

/// Trait for encoding response frames.
pub trait Frame {
    fn encode_to(&self, buf: &mut BytesMut);

    fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        self.encode_to(&mut buf);
        buf
    }
}

// ============================================================================
// Connection frames
// ============================================================================

/// Header opening every connection test and query batch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoHeader {
    pub error_code: u32,
}

impl EchoHeader {
    pub const LEN: usize = 16;

    pub fn new(error_code: u32) -> Self {
        Self { error_code }
    }

    pub fn ok() -> Self {
        Self::new(0)
    }
}

impl Frame for EchoHeader {
    fn encode_to(&self, buf: &mut BytesMut) {
        buf.reserve(Self::LEN);
        buf.put_u32(MAGIC);
        buf.put_u16(PROTOCOL_VERSION);
        buf.put_u32(self.error_code);
        put_zero_pad(buf, 6);
    }
}

/// Server description sent after a successful connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub host_info: String,
    pub protocol_version: String,
    pub server_version: String,
}

impl Frame for ConnectionInfo {
    fn encode_to(&self, buf: &mut BytesMut) {
        put_block(buf, self.host_info.as_bytes());
        put_block(buf, self.protocol_version.as_bytes());
        put_block(buf, self.server_version.as_bytes());
    }
}

/// A single text block: error messages and "rows matched" info.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMessage<'a> {
    pub text: &'a str,
}

impl<'a> DiagnosticMessage<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl Frame for DiagnosticMessage<'_> {
    fn encode_to(&self, buf: &mut BytesMut) {
        put_block(buf, self.text.as_bytes());
    }
}

// ============================================================================
// Statement frames
// ============================================================================

/// Outcome header for one executed statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultSetHeader {
    pub error_code: u32,
    pub affected_rows: u32,
    pub insert_id: u32,
    pub field_count: u32,
    pub row_count: u32,
}

impl ResultSetHeader {
    pub const LEN: usize = 32;

    /// Header for a statement that failed with `error_code`.
    pub fn failed(error_code: u32) -> Self {
        Self {
            error_code,
            ..Self::default()
        }
    }
}

impl Frame for ResultSetHeader {
    fn encode_to(&self, buf: &mut BytesMut) {
        buf.reserve(Self::LEN);
        buf.put_u32(self.error_code);
        buf.put_u32(self.affected_rows);
        buf.put_u32(self.insert_id);
        buf.put_u32(self.field_count);
        buf.put_u32(self.row_count);
        put_zero_pad(buf, 12);
    }
}

/// Column metadata as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Originating table, empty when unknown or computed.
    pub table: String,
    pub driver_type: DriverType,
    pub declared_length: u32,
}

/// Column flags are not tracked.
const FIELD_FLAGS: u32 = 0;

/// One field descriptor per column, in result order.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptors<'a> {
    pub columns: &'a [ColumnDescriptor],
}

impl<'a> FieldDescriptors<'a> {
    pub fn new(columns: &'a [ColumnDescriptor]) -> Self {
        Self { columns }
    }
}

impl Frame for FieldDescriptors<'_> {
    fn encode_to(&self, buf: &mut BytesMut) {
        for column in self.columns {
            put_block(buf, column.name.as_bytes());
            put_block(buf, column.table.as_bytes());
            buf.put_u32(map_type(&column.driver_type).code());
            buf.put_u32(FIELD_FLAGS);
            buf.put_u32(column.declared_length);
        }
    }
}

/// A non-NULL column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Scalar {
    /// The text the client displays for this value.
    pub fn to_text(&self) -> Cow<'_, [u8]> {
        match self {
            Scalar::Int(i) => Cow::Owned(i.to_string().into_bytes()),
            Scalar::UInt(u) => Cow::Owned(u.to_string().into_bytes()),
            Scalar::Float(f) => Cow::Owned(f.to_string().into_bytes()),
            Scalar::Double(d) => Cow::Owned(d.to_string().into_bytes()),
            Scalar::Text(s) => Cow::Borrowed(s.as_bytes()),
            Scalar::Bytes(b) => Cow::Borrowed(b),
        }
    }
}

/// A result row; `None` is SQL NULL.
pub type Row = Vec<Option<Scalar>>;

/// Row values, row-major, with no row delimiter.
///
/// Exactly `field_count` values are written per row so the stream stays in
/// step with the header; short rows are padded with NULL.
#[derive(Debug, Clone, Copy)]
pub struct RowData<'a> {
    pub rows: &'a [Row],
    pub field_count: usize,
}

impl<'a> RowData<'a> {
    pub fn new(rows: &'a [Row], field_count: usize) -> Self {
        Self { rows, field_count }
    }
}

impl Frame for RowData<'_> {
    fn encode_to(&self, buf: &mut BytesMut) {
        for row in self.rows {
            debug_assert_eq!(row.len(), self.field_count, "row width differs from field count");
            for i in 0..self.field_count {
                match row.get(i).and_then(Option::as_ref) {
                    Some(value) => put_block(buf, &value.to_text()),
                    None => buf.put_u8(NULL_MARKER),
                }
            }
        }
    }
}

/// Byte following each statement's frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementSeparator {
    pub is_last: bool,
}

impl StatementSeparator {
    pub const MORE: u8 = 0x01;
    pub const LAST: u8 = 0x00;

    pub fn new(is_last: bool) -> Self {
        Self { is_last }
    }
}

impl Frame for StatementSeparator {
    fn encode_to(&self, buf: &mut BytesMut) {
        buf.put_u8(if self.is_last { Self::LAST } else { Self::MORE });
    }
}

// ============================================================================
// Per-statement framing
// ============================================================================

/// What a successfully executed statement produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    pub affected_rows: u64,
    pub insert_id: u64,
    /// Empty for statements that return no rows.
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
}

impl StatementResult {
    /// Result of a statement that modified rows but returned none.
    pub fn modified(affected_rows: u64, insert_id: u64) -> Self {
        Self {
            affected_rows,
            insert_id,
            ..Self::default()
        }
    }

    #[inline]
    pub fn returns_rows(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn header(&self) -> ResultSetHeader {
        let (field_count, row_count) = if self.returns_rows() {
            (self.columns.len() as u64, self.rows.len() as u64)
        } else {
            (0, 0)
        };
        ResultSetHeader {
            error_code: 0,
            affected_rows: saturating_u32(self.affected_rows),
            insert_id: saturating_u32(self.insert_id),
            field_count: saturating_u32(field_count),
            row_count: saturating_u32(row_count),
        }
    }
}

/// Result of one statement in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    Succeeded(StatementResult),
    Failed { code: u32, message: String },
}

impl Frame for StatementOutcome {
    fn encode_to(&self, buf: &mut BytesMut) {
        match self {
            StatementOutcome::Failed { code, message } => {
                ResultSetHeader::failed(*code).encode_to(buf);
                DiagnosticMessage::new(message).encode_to(buf);
            }
            StatementOutcome::Succeeded(result) if result.returns_rows() => {
                result.header().encode_to(buf);
                FieldDescriptors::new(&result.columns).encode_to(buf);
                RowData::new(&result.rows, result.columns.len()).encode_to(buf);
            }
            StatementOutcome::Succeeded(result) => {
                result.header().encode_to(buf);
                let info = format!("Rows matched: {}", result.affected_rows);
                DiagnosticMessage::new(&info).encode_to(buf);
            }
        }
    }
}

// ============================================================================
// Response assembly
// ============================================================================

/// Accumulates frames into one response body.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    buf: BytesMut,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: &impl Frame) -> &mut Self {
        frame.encode_to(&mut self.buf);
        self
    }

    /// Append a statement's frames followed by its separator.
    pub fn push_statement(&mut self, outcome: &StatementOutcome, is_last: bool) -> &mut Self {
        self.push(outcome).push(&StatementSeparator::new(is_last))
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

/// EchoHeader plus diagnostic: the whole response for a request that never
/// reaches statement execution.
pub fn error_response(error_code: u32, message: &str) -> Bytes {
    let mut response = ResponseBuilder::new();
    response
        .push(&EchoHeader::new(error_code))
        .push(&DiagnosticMessage::new(message));
    response.finish()
}
