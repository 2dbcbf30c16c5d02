//! Table and column catalog descriptors
//!
//! Loaded by an external catalog reader and handed to the output buffer by
//! reference. The output stage never mutates them.

use serde::{Deserialize, Serialize};

/// Oracle internal data type numbers as found in the dictionary.
pub mod type_code {
    pub const VARCHAR2: u16 = 1;
    pub const NUMBER: u16 = 2;
    pub const LONG: u16 = 8;
    pub const DATE: u16 = 12;
    pub const RAW: u16 = 23;
    pub const LONG_RAW: u16 = 24;
    pub const ROWID: u16 = 69;
    pub const CHAR: u16 = 96;
    pub const BINARY_FLOAT: u16 = 100;
    pub const BINARY_DOUBLE: u16 = 101;
    pub const CLOB: u16 = 112;
    pub const BLOB: u16 = 113;
    pub const TIMESTAMP: u16 = 180;
    pub const TIMESTAMP_WITH_TZ: u16 = 181;
    pub const INTERVAL_YEAR_TO_MONTH: u16 = 182;
    pub const INTERVAL_DAY_TO_SECOND: u16 = 183;
    pub const UROWID: u16 = 208;
    pub const TIMESTAMP_WITH_LOCAL_TZ: u16 = 231;
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Dictionary type number (see [`type_code`])
    pub type_code: u16,
    /// Declared length in bytes
    #[serde(default)]
    pub length: u64,
    /// Declared precision; negative when unspecified
    #[serde(default = "default_unspecified")]
    pub precision: i64,
    /// Declared scale; negative scales are legal for NUMBER
    #[serde(default)]
    pub scale: i64,
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Number of primary key constraints the column takes part in
    #[serde(default)]
    pub num_pk: u32,
    /// Character set id of the source column
    #[serde(default)]
    pub charset_id: u16,
}

fn default_unspecified() -> i64 {
    -1
}

fn default_true() -> bool {
    true
}

impl ColumnDescriptor {
    /// Create a nullable column with no length, precision or scale.
    pub fn new(name: impl Into<String>, type_code: u16) -> Self {
        Self {
            name: name.into(),
            type_code,
            length: 0,
            precision: -1,
            scale: 0,
            nullable: true,
            num_pk: 0,
            charset_id: 0,
        }
    }

    /// NUMBER(precision, scale)
    pub fn number(name: impl Into<String>, precision: i64, scale: i64) -> Self {
        Self {
            precision,
            scale,
            ..Self::new(name, type_code::NUMBER)
        }
    }

    /// VARCHAR2(length)
    pub fn varchar2(name: impl Into<String>, length: u64) -> Self {
        Self::new(name, type_code::VARCHAR2).with_length(length)
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark the column as a primary key member (implies NOT NULL).
    pub fn with_primary_key(mut self) -> Self {
        self.num_pk += 1;
        self.nullable = false;
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.num_pk > 0
    }
}

/// Table metadata with columns laid out by segment column slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub owner: String,
    pub name: String,
    /// Dictionary object number; stable identity of the table
    pub obj: u32,
    /// Data object number of the segment holding the rows
    pub data_obj: u32,
    /// Columns by segment column slot; `None` marks a dropped column
    #[serde(default)]
    pub columns: Vec<Option<ColumnDescriptor>>,
}

impl TableDescriptor {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, obj: u32, data_obj: u32) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            obj,
            data_obj,
            columns: Vec::new(),
        }
    }

    /// Append a column in the next slot.
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(Some(column));
        self
    }

    /// Append an empty slot left behind by a dropped column.
    pub fn with_dropped_column(mut self) -> Self {
        self.columns.push(None);
        self
    }

    /// Number of segment column slots, including empty ones.
    pub fn max_seg_col(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, slot: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(slot).and_then(Option::as_ref)
    }

    /// Present columns with their slot numbers, in slot order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &ColumnDescriptor)> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(slot, column)| column.as_ref().map(|c| (slot, c)))
    }

    /// `OWNER.NAME`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }
}
