//! Protocol type codes and per-engine mapping tables.
//!
//! The client renders values as text, so typing is approximate: anything a
//! table does not know maps to [`ProtocolType::VarChar`].

/// Column type codes understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ProtocolType {
    TinyInt = 1,
    SmallInt = 2,
    Int = 3,
    Float = 4,
    Double = 5,
    Null = 6,
    Timestamp = 7,
    BigInt = 8,
    MediumInt = 9,
    Date = 10,
    Time = 11,
    DateTime = 12,
    Year = 13,
    VarChar = 253,
    Char = 254,
}

impl ProtocolType {
    /// Wire value of this type.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// A column type as reported by an engine driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverType {
    /// MySQL native field type id (`MYSQL_TYPE_*`).
    MySql(u8),
    /// SQLite declared column type; `None` for expressions.
    Sqlite(Option<String>),
}

/// Map a driver column type to its protocol type code.
pub fn map_type(driver_type: &DriverType) -> ProtocolType {
    match driver_type {
        DriverType::MySql(id) => map_mysql_type(*id),
        DriverType::Sqlite(decl) => decl
            .as_deref()
            .map(map_sqlite_decltype)
            .unwrap_or(ProtocolType::VarChar),
    }
}

/// MySQL field type ids.
pub mod mysql_type {
    pub const TINY: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const LONG: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const DOUBLE: u8 = 5;
    pub const NULL: u8 = 6;
    pub const TIMESTAMP: u8 = 7;
    pub const LONGLONG: u8 = 8;
    pub const INT24: u8 = 9;
    pub const DATE: u8 = 10;
    pub const TIME: u8 = 11;
    pub const DATETIME: u8 = 12;
    pub const YEAR: u8 = 13;
    pub const VARCHAR: u8 = 15;
    pub const VAR_STRING: u8 = 253;
    pub const STRING: u8 = 254;
}

fn map_mysql_type(id: u8) -> ProtocolType {
    use mysql_type::*;

    match id {
        TINY => ProtocolType::TinyInt,
        SHORT => ProtocolType::SmallInt,
        LONG => ProtocolType::Int,
        FLOAT => ProtocolType::Float,
        DOUBLE => ProtocolType::Double,
        NULL => ProtocolType::Null,
        TIMESTAMP => ProtocolType::Timestamp,
        LONGLONG => ProtocolType::BigInt,
        INT24 => ProtocolType::MediumInt,
        DATE => ProtocolType::Date,
        TIME => ProtocolType::Time,
        DATETIME => ProtocolType::DateTime,
        YEAR => ProtocolType::Year,
        VARCHAR | VAR_STRING => ProtocolType::VarChar,
        STRING => ProtocolType::Char,
        _ => ProtocolType::VarChar,
    }
}

/// Declared-type substrings, checked in order. More specific names come
/// before the names they contain (BIGINT before INT, DATETIME before DATE).
const SQLITE_DECLTYPE_TABLE: &[(&str, ProtocolType)] = &[
    ("TINYINT", ProtocolType::TinyInt),
    ("SMALLINT", ProtocolType::SmallInt),
    ("MEDIUMINT", ProtocolType::MediumInt),
    ("BIGINT", ProtocolType::BigInt),
    ("INT", ProtocolType::Int),
    ("DOUBLE", ProtocolType::Double),
    ("REAL", ProtocolType::Double),
    ("FLOAT", ProtocolType::Float),
    ("DATETIME", ProtocolType::DateTime),
    ("TIMESTAMP", ProtocolType::Timestamp),
    ("DATE", ProtocolType::Date),
    ("TIME", ProtocolType::Time),
    ("YEAR", ProtocolType::Year),
    ("VARCHAR", ProtocolType::VarChar),
    ("TEXT", ProtocolType::VarChar),
    ("CLOB", ProtocolType::VarChar),
    ("CHAR", ProtocolType::Char),
];

fn map_sqlite_decltype(decl: &str) -> ProtocolType {
    let decl = decl.to_ascii_uppercase();
    SQLITE_DECLTYPE_TABLE
        .iter()
        .find(|(needle, _)| decl.contains(needle))
        .map(|(_, ty)| *ty)
        .unwrap_or(ProtocolType::VarChar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite(decl: &str) -> u32 {
        map_type(&DriverType::Sqlite(Some(decl.to_string()))).code()
    }

    #[test]
    fn test_mysql_table() {
        let expected = [
            (1u8, 1u32),
            (2, 2),
            (3, 3),
            (4, 4),
            (5, 5),
            (6, 6),
            (7, 7),
            (8, 8),
            (9, 9),
            (10, 10),
            (11, 11),
            (12, 12),
            (13, 13),
            (15, 253),
            (253, 253),
            (254, 254),
        ];
        for (id, code) in expected {
            assert_eq!(map_type(&DriverType::MySql(id)).code(), code, "mysql type {id}");
        }
    }

    #[test]
    fn test_unmapped_mysql_types_are_varchar() {
        // DECIMAL, NEWDATE, BIT, JSON, NEWDECIMAL, BLOB, GEOMETRY
        for id in [0u8, 14, 16, 245, 246, 252, 255] {
            assert_eq!(map_type(&DriverType::MySql(id)), ProtocolType::VarChar);
        }
    }

    #[test]
    fn test_sqlite_decltypes() {
        assert_eq!(sqlite("INTEGER"), 3);
        assert_eq!(sqlite("bigint"), 8);
        assert_eq!(sqlite("TINYINT(1)"), 1);
        assert_eq!(sqlite("REAL"), 5);
        assert_eq!(sqlite("FLOAT"), 4);
        assert_eq!(sqlite("DATETIME"), 12);
        assert_eq!(sqlite("DATE"), 10);
        assert_eq!(sqlite("TIME"), 11);
        assert_eq!(sqlite("VARCHAR(20)"), 253);
        assert_eq!(sqlite("CHAR(2)"), 254);
        assert_eq!(sqlite("TEXT"), 253);
        assert_eq!(sqlite("BLOB"), 253);
    }

    #[test]
    fn test_sqlite_expression_column() {
        assert_eq!(map_type(&DriverType::Sqlite(None)), ProtocolType::VarChar);
    }
}
