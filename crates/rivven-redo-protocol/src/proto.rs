//! Protobuf wire types
//!
//! Written in the shape prost-build generates from `proto/redo.proto`, so no
//! `protoc` is needed at build time. The schema file is the reviewable wire
//! contract; the tests below keep the enum values of both in step.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Redo {
    #[prost(uint64, optional, tag = "1")]
    pub scn: ::core::option::Option<u64>,
    #[prost(string, optional, tag = "2")]
    pub scns: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(uint64, optional, tag = "3")]
    pub tm: ::core::option::Option<u64>,
    #[prost(string, optional, tag = "4")]
    pub tms: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "5")]
    pub xid: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(uint64, optional, tag = "6")]
    pub xidn: ::core::option::Option<u64>,
    #[prost(message, repeated, tag = "7")]
    pub payload: ::prost::alloc::vec::Vec<Payload>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Payload {
    #[prost(enumeration = "Op", tag = "1")]
    pub op: i32,
    #[prost(message, optional, tag = "2")]
    pub schema: ::core::option::Option<Schema>,
    #[prost(string, optional, tag = "3")]
    pub rid: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "4")]
    pub before: ::prost::alloc::vec::Vec<Value>,
    #[prost(message, repeated, tag = "5")]
    pub after: ::prost::alloc::vec::Vec<Value>,
    #[prost(string, optional, tag = "6")]
    pub ddl: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(uint64, optional, tag = "7")]
    pub scn: ::core::option::Option<u64>,
    #[prost(string, optional, tag = "8")]
    pub scns: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(uint64, optional, tag = "9")]
    pub tm: ::core::option::Option<u64>,
    #[prost(string, optional, tag = "10")]
    pub tms: ::core::option::Option<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Schema {
    #[prost(string, tag = "1")]
    pub owner: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(uint32, optional, tag = "3")]
    pub obj: ::core::option::Option<u32>,
    #[prost(message, repeated, tag = "4")]
    pub column: ::prost::alloc::vec::Vec<Column>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Column {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(enumeration = "ColumnType", tag = "2")]
    pub r#type: i32,
    #[prost(uint64, optional, tag = "3")]
    pub length: ::core::option::Option<u64>,
    #[prost(int64, optional, tag = "4")]
    pub precision: ::core::option::Option<i64>,
    #[prost(int64, optional, tag = "5")]
    pub scale: ::core::option::Option<i64>,
    #[prost(bool, tag = "6")]
    pub nullable: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Value {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(oneof = "value::Datum", tags = "2, 3, 4, 5, 6")]
    pub datum: ::core::option::Option<value::Datum>,
}

/// Nested message and enum types in `Value`.
pub mod value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Datum {
        #[prost(int64, tag = "2")]
        ValueInt(i64),
        #[prost(float, tag = "3")]
        ValueFloat(f32),
        #[prost(double, tag = "4")]
        ValueDouble(f64),
        #[prost(string, tag = "5")]
        ValueString(::prost::alloc::string::String),
        #[prost(bytes = "vec", tag = "6")]
        ValueBytes(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Op {
    Begin = 0,
    Commit = 1,
    Insert = 2,
    Update = 3,
    Delete = 4,
    Ddl = 5,
}

impl Op {
    /// Value name as it appears in `proto/redo.proto`
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Ddl => "DDL",
        }
    }

    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "BEGIN" => Some(Self::Begin),
            "COMMIT" => Some(Self::Commit),
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "DDL" => Some(Self::Ddl),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ColumnType {
    Unknown = 0,
    Varchar2 = 1,
    Number = 2,
    Long = 3,
    Date = 4,
    Raw = 5,
    LongRaw = 6,
    Rowid = 7,
    Char = 8,
    BinaryFloat = 9,
    BinaryDouble = 10,
    Clob = 11,
    Blob = 12,
    Timestamp = 13,
    TimestampWithTz = 14,
    IntervalYearToMonth = 15,
    IntervalDayToSecond = 16,
    Urowid = 17,
    TimestampWithLocalTz = 18,
}

impl ColumnType {
    /// Value name as it appears in `proto/redo.proto`
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Varchar2 => "VARCHAR2",
            Self::Number => "NUMBER",
            Self::Long => "LONG",
            Self::Date => "DATE",
            Self::Raw => "RAW",
            Self::LongRaw => "LONG_RAW",
            Self::Rowid => "ROWID",
            Self::Char => "CHAR",
            Self::BinaryFloat => "BINARY_FLOAT",
            Self::BinaryDouble => "BINARY_DOUBLE",
            Self::Clob => "CLOB",
            Self::Blob => "BLOB",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampWithTz => "TIMESTAMP_WITH_TZ",
            Self::IntervalYearToMonth => "INTERVAL_YEAR_TO_MONTH",
            Self::IntervalDayToSecond => "INTERVAL_DAY_TO_SECOND",
            Self::Urowid => "UROWID",
            Self::TimestampWithLocalTz => "TIMESTAMP_WITH_LOCAL_TZ",
        }
    }

    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "UNKNOWN" => Some(Self::Unknown),
            "VARCHAR2" => Some(Self::Varchar2),
            "NUMBER" => Some(Self::Number),
            "LONG" => Some(Self::Long),
            "DATE" => Some(Self::Date),
            "RAW" => Some(Self::Raw),
            "LONG_RAW" => Some(Self::LongRaw),
            "ROWID" => Some(Self::Rowid),
            "CHAR" => Some(Self::Char),
            "BINARY_FLOAT" => Some(Self::BinaryFloat),
            "BINARY_DOUBLE" => Some(Self::BinaryDouble),
            "CLOB" => Some(Self::Clob),
            "BLOB" => Some(Self::Blob),
            "TIMESTAMP" => Some(Self::Timestamp),
            "TIMESTAMP_WITH_TZ" => Some(Self::TimestampWithTz),
            "INTERVAL_YEAR_TO_MONTH" => Some(Self::IntervalYearToMonth),
            "INTERVAL_DAY_TO_SECOND" => Some(Self::IntervalDayToSecond),
            "UROWID" => Some(Self::Urowid),
            "TIMESTAMP_WITH_LOCAL_TZ" => Some(Self::TimestampWithLocalTz),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = include_str!("../proto/redo.proto");

    /// `NAME = value;` entries of one enum block in the schema file
    fn schema_enum(name: &str) -> Vec<(String, i32)> {
        let header = format!("enum {} {{", name);
        SCHEMA
            .lines()
            .skip_while(|line| line.trim() != header)
            .skip(1)
            .take_while(|line| line.trim() != "}")
            .filter_map(|line| {
                let (key, value) = line.trim().trim_end_matches(';').split_once(" = ")?;
                Some((key.to_string(), value.parse().ok()?))
            })
            .collect()
    }

    #[test]
    fn test_op_matches_schema() {
        let entries = schema_enum("Op");
        assert_eq!(entries.len(), 6);
        for (key, value) in entries {
            let op = Op::try_from(value).unwrap();
            assert_eq!(op.as_str_name(), key);
            assert_eq!(Op::from_str_name(&key), Some(op));
        }
    }

    #[test]
    fn test_column_type_matches_schema() {
        let entries = schema_enum("ColumnType");
        assert_eq!(entries.len(), 19);
        for (key, value) in entries {
            let column_type = ColumnType::try_from(value).unwrap();
            assert_eq!(column_type.as_str_name(), key);
        }
    }

    #[test]
    fn test_schema_declares_every_message() {
        for message in ["Redo", "Payload", "Schema", "Column", "Value"] {
            assert!(SCHEMA.contains(&format!("message {} {{", message)), "{}", message);
        }
    }
}
