//! Table schema snapshots for row payloads
//!
//! Column lists can be large, so with [`SchemaMode::Full`] they are sent only
//! the first time a table shows up in the session. The [`SchemaCache`]
//! remembers which table object numbers have been described; entries are
//! never evicted for the lifetime of the session.

use crate::common::{type_code, ColumnDescriptor, SchemaFormat, SchemaMode, TableDescriptor};
use rivven_redo_protocol::{ColumnInfo, ColumnType, SchemaInfo};
use std::collections::HashSet;
use tracing::trace;

/// Set of table object numbers whose column list was already emitted.
#[derive(Debug, Default)]
pub struct SchemaCache {
    seen: HashSet<u32>,
    hits: u64,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `obj` as described. Returns true on first sight.
    fn insert(&mut self, obj: u32) -> bool {
        let inserted = self.seen.insert(obj);
        if inserted {
            metrics::gauge!("rivven_redo_schema_cache_size").set(self.seen.len() as f64);
        } else {
            self.hits += 1;
            metrics::counter!("rivven_redo_schema_dedup_hits_total").increment(1);
        }
        inserted
    }

    pub fn contains(&self, obj: u32) -> bool {
        self.seen.contains(&obj)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Column lists skipped because the table was already described
    pub fn hits(&self) -> u64 {
        self.hits
    }
}

/// Builds [`SchemaInfo`] objects and owns the dedup cache.
#[derive(Debug, Default)]
pub struct SchemaEncoder {
    cache: SchemaCache,
}

impl SchemaEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Owner and name only, for payloads that describe the table itself.
    pub fn encode_header(&self, table: &TableDescriptor, format: &SchemaFormat) -> Option<SchemaInfo> {
        if format.mode == SchemaMode::Omit {
            return None;
        }
        Some(SchemaInfo {
            owner: table.owner.clone(),
            name: table.name.clone(),
            obj: format.include_obj.then_some(table.obj),
            columns: Vec::new(),
        })
    }

    /// Schema object for one payload, or `None` when schemas are omitted.
    pub fn encode(&mut self, table: &TableDescriptor, format: &SchemaFormat) -> Option<SchemaInfo> {
        let with_columns = match format.mode {
            SchemaMode::Omit => return None,
            SchemaMode::OwnerName => false,
            SchemaMode::Full => self.cache.insert(table.obj),
            SchemaMode::FullRepeated => true,
        };

        if format.mode == SchemaMode::Full && !with_columns {
            trace!(table = %table.qualified_name(), obj = table.obj, "Schema already sent, columns skipped");
        }

        Some(SchemaInfo {
            owner: table.owner.clone(),
            name: table.name.clone(),
            obj: format.include_obj.then_some(table.obj),
            columns: if with_columns {
                table.slots().map(|(_, column)| column_info(column)).collect()
            } else {
                Vec::new()
            },
        })
    }
}

/// Map one catalog column to its schema descriptor.
pub fn column_info(column: &ColumnDescriptor) -> ColumnInfo {
    let (column_type, sized) = match column.type_code {
        type_code::VARCHAR2 => (ColumnType::Varchar2, true),
        type_code::NUMBER => {
            return ColumnInfo {
                name: column.name.clone(),
                column_type: ColumnType::Number,
                length: None,
                precision: Some(column.precision),
                scale: Some(column.scale),
                nullable: column.nullable,
            }
        }
        type_code::LONG => (ColumnType::Long, false),
        type_code::DATE => (ColumnType::Date, false),
        type_code::RAW => (ColumnType::Raw, true),
        type_code::LONG_RAW => (ColumnType::LongRaw, false),
        type_code::ROWID => (ColumnType::Rowid, false),
        type_code::CHAR => (ColumnType::Char, true),
        type_code::BINARY_FLOAT => (ColumnType::BinaryFloat, false),
        type_code::BINARY_DOUBLE => (ColumnType::BinaryDouble, false),
        type_code::CLOB => (ColumnType::Clob, false),
        type_code::BLOB => (ColumnType::Blob, false),
        type_code::TIMESTAMP => (ColumnType::Timestamp, true),
        type_code::TIMESTAMP_WITH_TZ => (ColumnType::TimestampWithTz, true),
        type_code::INTERVAL_YEAR_TO_MONTH => (ColumnType::IntervalYearToMonth, true),
        type_code::INTERVAL_DAY_TO_SECOND => (ColumnType::IntervalDayToSecond, true),
        type_code::UROWID => (ColumnType::Urowid, true),
        type_code::TIMESTAMP_WITH_LOCAL_TZ => (ColumnType::TimestampWithLocalTz, true),
        _ => (ColumnType::Unknown, false),
    };

    ColumnInfo {
        name: column.name.clone(),
        column_type,
        length: sized.then_some(column.length),
        precision: None,
        scale: None,
        nullable: column.nullable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableDescriptor {
        TableDescriptor::new("HR", "EMP", 501, 502)
            .with_column(ColumnDescriptor::number("ID", 10, 0).with_primary_key())
            .with_dropped_column()
            .with_column(ColumnDescriptor::varchar2("NAME", 30))
    }

    fn format(mode: SchemaMode, include_obj: bool) -> SchemaFormat {
        SchemaFormat { mode, include_obj }
    }

    #[test]
    fn test_omit() {
        let mut encoder = SchemaEncoder::new();
        assert!(encoder.encode(&table(), &format(SchemaMode::Omit, false)).is_none());
    }

    #[test]
    fn test_owner_name_only() {
        let mut encoder = SchemaEncoder::new();
        let schema = encoder.encode(&table(), &format(SchemaMode::OwnerName, false)).unwrap();
        assert_eq!(schema.owner, "HR");
        assert_eq!(schema.name, "EMP");
        assert_eq!(schema.obj, None);
        assert!(schema.columns.is_empty());
        assert!(encoder.cache().is_empty());
    }

    #[test]
    fn test_full_dedups_per_table() {
        let mut encoder = SchemaEncoder::new();
        let fmt = format(SchemaMode::Full, true);

        let first = encoder.encode(&table(), &fmt).unwrap();
        assert_eq!(first.obj, Some(501));
        assert_eq!(first.columns.len(), 2);

        let second = encoder.encode(&table(), &fmt).unwrap();
        assert_eq!(second.owner, "HR");
        assert_eq!(second.obj, Some(501));
        assert!(second.columns.is_empty());

        assert!(encoder.cache().contains(501));
        assert_eq!(encoder.cache().len(), 1);
        assert_eq!(encoder.cache().hits(), 1);
    }

    #[test]
    fn test_header_only() {
        let encoder = SchemaEncoder::new();
        let schema = encoder
            .encode_header(&table(), &format(SchemaMode::FullRepeated, true))
            .unwrap();
        assert_eq!(schema.obj, Some(501));
        assert!(schema.columns.is_empty());
        assert!(encoder.encode_header(&table(), &format(SchemaMode::Omit, false)).is_none());
    }

    #[test]
    fn test_full_repeated_always_has_columns() {
        let mut encoder = SchemaEncoder::new();
        let fmt = format(SchemaMode::FullRepeated, false);
        for _ in 0..3 {
            assert_eq!(encoder.encode(&table(), &fmt).unwrap().columns.len(), 2);
        }
        assert!(encoder.cache().is_empty());
    }

    #[test]
    fn test_column_mapping() {
        let id = column_info(&ColumnDescriptor::number("ID", 10, 0).with_primary_key());
        assert_eq!(id.column_type, ColumnType::Number);
        assert_eq!((id.length, id.precision, id.scale), (None, Some(10), Some(0)));
        assert!(!id.nullable);

        let name = column_info(&ColumnDescriptor::varchar2("NAME", 30));
        assert_eq!(name.column_type, ColumnType::Varchar2);
        assert_eq!((name.length, name.precision), (Some(30), None));
        assert!(name.nullable);

        let ts = column_info(&ColumnDescriptor::new("TS", type_code::TIMESTAMP).with_length(11));
        assert_eq!(ts.column_type, ColumnType::Timestamp);
        assert_eq!(ts.length, Some(11));

        let blob = column_info(&ColumnDescriptor::new("DOC", type_code::BLOB).with_length(4000));
        assert_eq!(blob.column_type, ColumnType::Blob);
        assert_eq!(blob.length, None);

        let other = column_info(&ColumnDescriptor::new("X", 58));
        assert_eq!(other.column_type, ColumnType::Unknown);
    }
}
