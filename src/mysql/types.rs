//! MySQL value and column conversion.

use ::mysql::{Column, Value};

use crate::protocol::{ColumnDescriptor, DriverType, Scalar};

/// Describe a result column from the driver's field packet.
pub fn describe_column(column: &Column) -> ColumnDescriptor {
    ColumnDescriptor {
        name: column.name_str().into_owned(),
        table: column.table_str().into_owned(),
        driver_type: DriverType::MySql(column.column_type() as u8),
        declared_length: column.column_length(),
    }
}

/// Convert a driver value; `None` is SQL NULL.
///
/// The text protocol delivers everything as bytes. The typed variants only
/// appear for binary-protocol results and are rendered the way the server
/// would render them as text.
pub fn scalar_from_value(value: Value) -> Option<Scalar> {
    match value {
        Value::NULL => None,
        Value::Bytes(b) => Some(Scalar::Bytes(b)),
        Value::Int(i) => Some(Scalar::Int(i)),
        Value::UInt(u) => Some(Scalar::UInt(u)),
        Value::Float(f) => Some(Scalar::Float(f)),
        Value::Double(d) => Some(Scalar::Double(d)),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let mut text = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            push_micros(&mut text, micros);
            Some(Scalar::Text(text))
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let total_hours = u64::from(days) * 24 + u64::from(hours);
            let sign = if negative { "-" } else { "" };
            let mut text = format!("{}{:02}:{:02}:{:02}", sign, total_hours, minutes, seconds);
            push_micros(&mut text, micros);
            Some(Scalar::Text(text))
        }
    }
}

fn push_micros(text: &mut String, micros: u32) {
    if micros > 0 {
        text.push_str(&format!(".{:06}", micros));
    }
}
