//! Update image compaction
//!
//! Redo records for an UPDATE often carry supplemental images of columns
//! that did not change. An [`UpdateCompactor`] prunes those slots before the
//! payload is built, so the before/after lists only describe the change.
//!
//! ```rust
//! use rivven_redo::common::{ColumnDescriptor, RowAddress, RowChange, TableDescriptor};
//! use rivven_redo::oracle::{ChangedColumnsCompactor, UpdateCompactor};
//!
//! let table = TableDescriptor::new("HR", "EMP", 1, 1)
//!     .with_column(ColumnDescriptor::varchar2("NAME", 30))
//!     .with_column(ColumnDescriptor::varchar2("CITY", 30));
//! let mut change = RowChange::new(RowAddress::default())
//!     .with_before(0, "Ann").with_after(0, "Anne")
//!     .with_before(1, "Oslo").with_after(1, "Oslo");
//!
//! ChangedColumnsCompactor.compact(&table, &mut change);
//! assert!(change.after(0).is_some());
//! assert!(change.after(1).is_none());
//! ```

use crate::common::{RowChange, TableDescriptor};

/// Prunes row images of an UPDATE before encoding
pub trait UpdateCompactor: Send + Sync {
    fn name(&self) -> &'static str;

    fn compact(&self, table: &TableDescriptor, change: &mut RowChange);
}

/// Drops slots whose before and after images are byte-equal.
///
/// Primary key columns are kept so the row stays identifiable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangedColumnsCompactor;

impl UpdateCompactor for ChangedColumnsCompactor {
    fn name(&self) -> &'static str {
        "changed_columns"
    }

    fn compact(&self, table: &TableDescriptor, change: &mut RowChange) {
        for (slot, column) in table.slots() {
            if column.is_primary_key() {
                continue;
            }
            let unchanged = match (change.before(slot), change.after(slot)) {
                (Some(before), Some(after)) => before == after,
                _ => false,
            };
            if unchanged {
                change.clear_slot(slot);
            }
        }
    }
}

/// Leaves images untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompactor;

impl UpdateCompactor for NoopCompactor {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn compact(&self, _table: &TableDescriptor, _change: &mut RowChange) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ColumnDescriptor, RowAddress};

    fn table() -> TableDescriptor {
        TableDescriptor::new("HR", "EMP", 1, 1)
            .with_column(ColumnDescriptor::number("ID", 10, 0).with_primary_key())
            .with_column(ColumnDescriptor::varchar2("NAME", 30))
            .with_column(ColumnDescriptor::varchar2("CITY", 30))
    }

    #[test]
    fn test_changed_columns_keeps_pk_and_changes() {
        let mut change = RowChange::new(RowAddress::default())
            .with_before(0, "1")
            .with_after(0, "1")
            .with_before(1, "a")
            .with_after(1, "b")
            .with_before(2, "x")
            .with_after(2, "x");

        ChangedColumnsCompactor.compact(&table(), &mut change);

        assert!(change.before(0).is_some() && change.after(0).is_some());
        assert!(change.before(1).is_some() && change.after(1).is_some());
        assert!(change.before(2).is_none() && change.after(2).is_none());
    }

    #[test]
    fn test_one_sided_images_are_kept() {
        let mut change = RowChange::new(RowAddress::default())
            .with_before(1, "a")
            .with_after(2, "x");

        ChangedColumnsCompactor.compact(&table(), &mut change);

        assert!(change.before(1).is_some());
        assert!(change.after(2).is_some());
    }

    #[test]
    fn test_noop() {
        let original = RowChange::new(RowAddress::default())
            .with_before(2, "x")
            .with_after(2, "x");
        let mut change = original.clone();
        NoopCompactor.compact(&table(), &mut change);
        assert_eq!(change, original);
        assert_eq!(NoopCompactor.name(), "noop");
    }
}
