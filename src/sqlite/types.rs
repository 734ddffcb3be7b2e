//! SQLite value and column conversion.

use rusqlite::types::ValueRef;

use crate::protocol::{ColumnDescriptor, DriverType, Scalar};

/// Convert a rusqlite value; `None` is SQL NULL.
pub fn scalar_from_value_ref(value: ValueRef<'_>) -> Option<Scalar> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(Scalar::Int(i)),
        ValueRef::Real(f) => Some(Scalar::Double(f)),
        ValueRef::Text(s) => Some(match std::str::from_utf8(s) {
            Ok(s) => Scalar::Text(s.to_owned()),
            Err(_) => Scalar::Bytes(s.to_vec()),
        }),
        ValueRef::Blob(b) => Some(Scalar::Bytes(b.to_vec())),
    }
}

/// Describe a result column. SQLite reports neither the originating table
/// nor a display length.
pub fn describe_column(name: &str, decl_type: Option<&str>) -> ColumnDescriptor {
    ColumnDescriptor {
        name: name.to_string(),
        table: String::new(),
        driver_type: DriverType::Sqlite(decl_type.map(str::to_string)),
        declared_length: 0,
    }
}
