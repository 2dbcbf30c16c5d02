//! Native output message tree
//!
//! A [`RedoMessage`] is one unit handed to a byte sink: a header (SCN,
//! timestamp, transaction id) followed by ordered [`Payload`] entries.
//! Header fields come in pairs (`scn`/`scns`, `tm`/`tms`, `xid`/`xidn`) and at
//! most one of each pair is set, depending on the configured format.

use bytes::Bytes;
use serde::Serialize;

/// Operation carried by a payload entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Transaction start marker
    Begin,
    /// Transaction end marker
    Commit,
    /// Row inserted
    Insert,
    /// Row updated
    Update,
    /// Row deleted
    Delete,
    /// Schema change statement
    Ddl,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Begin => "BEGIN",
            Op::Commit => "COMMIT",
            Op::Insert => "INSERT",
            Op::Update => "UPDATE",
            Op::Delete => "DELETE",
            Op::Ddl => "DDL",
        }
    }

    /// Check if this is a row-level data change (INSERT/UPDATE/DELETE)
    pub fn is_dml(&self) -> bool {
        matches!(self, Op::Insert | Op::Update | Op::Delete)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column type tag emitted in schema descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    Unknown,
    Varchar2,
    Number,
    Long,
    Date,
    Raw,
    LongRaw,
    Rowid,
    Char,
    BinaryFloat,
    BinaryDouble,
    Clob,
    Blob,
    Timestamp,
    TimestampWithTz,
    IntervalYearToMonth,
    IntervalDayToSecond,
    Urowid,
    TimestampWithLocalTz,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Unknown => "UNKNOWN",
            ColumnType::Varchar2 => "VARCHAR2",
            ColumnType::Number => "NUMBER",
            ColumnType::Long => "LONG",
            ColumnType::Date => "DATE",
            ColumnType::Raw => "RAW",
            ColumnType::LongRaw => "LONG_RAW",
            ColumnType::Rowid => "ROWID",
            ColumnType::Char => "CHAR",
            ColumnType::BinaryFloat => "BINARY_FLOAT",
            ColumnType::BinaryDouble => "BINARY_DOUBLE",
            ColumnType::Clob => "CLOB",
            ColumnType::Blob => "BLOB",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::TimestampWithTz => "TIMESTAMP_WITH_TZ",
            ColumnType::IntervalYearToMonth => "INTERVAL_YEAR_TO_MONTH",
            ColumnType::IntervalDayToSecond => "INTERVAL_DAY_TO_SECOND",
            ColumnType::Urowid => "UROWID",
            ColumnType::TimestampWithLocalTz => "TIMESTAMP_WITH_LOCAL_TZ",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed column value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Raw bytes; rendered as lowercase hex in JSON
    Bytes(#[serde(with = "crate::serde_utils::hex_bytes")] Bytes),
}

/// One entry of a before/after value list.
///
/// `value == None` is the null marker: the column exists in the image but no
/// value was captured for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnValue {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ScalarValue>,
}

impl ColumnValue {
    /// Null marker carrying only the column name
    pub fn null(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn new(name: impl Into<String>, value: ScalarValue) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

/// Column descriptor inside a schema snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    pub nullable: bool,
}

/// Table schema snapshot attached to a payload entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SchemaInfo {
    pub owner: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obj: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnInfo>,
}

/// One operation inside a message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub op: Op,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scn: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tm: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<ColumnValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<ColumnValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddl: Option<String>,
}

impl Payload {
    /// Empty payload entry for the given operation
    pub fn new(op: Op) -> Self {
        Self {
            op,
            scn: None,
            scns: None,
            tm: None,
            tms: None,
            schema: None,
            rid: None,
            before: Vec::new(),
            after: Vec::new(),
            ddl: None,
        }
    }
}

/// A complete output message
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RedoMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scn: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tm: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xidn: Option<u64>,
    pub payload: Vec<Payload>,
}

impl RedoMessage {
    /// Serialize as a JSON document
    pub fn to_json_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Operations of all payload entries, in order
    pub fn ops(&self) -> Vec<Op> {
        self.payload.iter().map(|p| p.op).collect()
    }
}
