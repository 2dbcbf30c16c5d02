//! Captured change events
//!
//! Inputs handed over by the upstream capture pipeline: transaction
//! envelopes for begin/commit, per-slot row images for DML, and DDL text.
//!
//! ## Row images
//!
//! A slot image is `None` when no value was captured for the column and
//! `Some(bytes)` otherwise. A captured zero-length image is distinct from an
//! absent one:
//!
//! ```ignore
//! change.after(0) == None              // column not captured
//! change.after(0) == Some(&Bytes::new()) // captured, empty
//! ```

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Transaction id: undo segment number, slot, sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Xid {
    pub usn: u16,
    pub slt: u16,
    pub sqn: u32,
}

impl Xid {
    pub fn new(usn: u16, slt: u16, sqn: u32) -> Self {
        Self { usn, slt, sqn }
    }

    /// Combined numeric form: `usn << 48 | slt << 32 | sqn`
    pub fn to_u64(&self) -> u64 {
        ((self.usn as u64) << 48) | ((self.slt as u64) << 32) | self.sqn as u64
    }

    pub fn from_u64(value: u64) -> Self {
        Self {
            usn: (value >> 48) as u16,
            slt: ((value >> 32) & 0xFFFF) as u16,
            sqn: (value & 0xFFFF_FFFF) as u32,
        }
    }
}

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.usn, self.slt, self.sqn)
    }
}

/// Transaction boundary values carried into message headers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// System change number
    pub scn: u64,
    /// Wall-clock time of the change, sub-second precision
    pub timestamp: DateTime<Utc>,
    pub xid: Xid,
}

impl TransactionEnvelope {
    pub fn new(scn: u64, timestamp: DateTime<Utc>, xid: Xid) -> Self {
        Self {
            scn,
            timestamp,
            xid,
        }
    }

    /// ISO-8601 UTC, fractional seconds only when present
    pub fn timestamp_iso8601(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Milliseconds since the Unix epoch; pre-epoch times clamp to 0
    pub fn timestamp_millis(&self) -> u64 {
        self.timestamp.timestamp_millis().max(0) as u64
    }
}

/// Physical address of a row within its table's segment.
///
/// The segment itself is identified by [`TableDescriptor::data_obj`].
///
/// [`TableDescriptor::data_obj`]: crate::common::TableDescriptor::data_obj
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RowAddress {
    /// Block address: 10-bit file number over a 22-bit block number
    pub dba: u32,
    /// Row slot within the block
    pub slot: u16,
}

impl RowAddress {
    pub fn new(dba: u32, slot: u16) -> Self {
        Self { dba, slot }
    }
}

/// Before/after images of one changed row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowChange {
    pub address: RowAddress,
    pub before: Vec<Option<Bytes>>,
    pub after: Vec<Option<Bytes>>,
}

impl RowChange {
    pub fn new(address: RowAddress) -> Self {
        Self {
            address,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Set the before image of `slot`.
    pub fn with_before(mut self, slot: usize, data: impl Into<Bytes>) -> Self {
        set_slot(&mut self.before, slot, Some(data.into()));
        self
    }

    /// Set the after image of `slot`.
    pub fn with_after(mut self, slot: usize, data: impl Into<Bytes>) -> Self {
        set_slot(&mut self.after, slot, Some(data.into()));
        self
    }

    pub fn before(&self, slot: usize) -> Option<&Bytes> {
        self.before.get(slot).and_then(Option::as_ref)
    }

    pub fn after(&self, slot: usize) -> Option<&Bytes> {
        self.after.get(slot).and_then(Option::as_ref)
    }

    /// Drop the images of `slot` on both sides.
    pub fn clear_slot(&mut self, slot: usize) {
        if let Some(image) = self.before.get_mut(slot) {
            *image = None;
        }
        if let Some(image) = self.after.get_mut(slot) {
            *image = None;
        }
    }

    /// Highest slot count across both images.
    pub fn slot_count(&self) -> usize {
        self.before.len().max(self.after.len())
    }
}

fn set_slot(images: &mut Vec<Option<Bytes>>, slot: usize, data: Option<Bytes>) {
    if images.len() <= slot {
        images.resize(slot + 1, None);
    }
    images[slot] = data;
}

/// A DDL statement captured for a table.
///
/// The affected table is passed alongside the event, so only the statement
/// and its classification travel here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdlEvent {
    /// Dictionary DDL type code
    pub ddl_type: u16,
    /// Operation keyword (e.g. "ALTER TABLE")
    pub operation: String,
    /// Statement text, verbatim
    pub sql: String,
}

impl DdlEvent {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            ddl_type: 0,
            operation: String::new(),
            sql: sql.into(),
        }
    }

    pub fn with_operation(mut self, ddl_type: u16, operation: impl Into<String>) -> Self {
        self.ddl_type = ddl_type;
        self.operation = operation.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_xid_text_and_numeric() {
        let xid = Xid::new(10, 3, 4_711);
        assert_eq!(xid.to_string(), "10.3.4711");
        assert_eq!(xid.to_u64(), (10u64 << 48) | (3u64 << 32) | 4_711);
        assert_eq!(Xid::from_u64(xid.to_u64()), xid);
    }

    #[test]
    fn test_envelope_timestamp_forms() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let envelope = TransactionEnvelope::new(1, ts, Xid::default());
        assert_eq!(envelope.timestamp_iso8601(), "2024-01-15T10:30:00Z");
        assert_eq!(envelope.timestamp_millis(), 1_705_314_600_000);

        let with_fraction = TransactionEnvelope::new(
            1,
            ts + chrono::Duration::milliseconds(250),
            Xid::default(),
        );
        assert_eq!(with_fraction.timestamp_iso8601(), "2024-01-15T10:30:00.250Z");
        assert_eq!(with_fraction.timestamp_millis(), 1_705_314_600_250);
    }

    #[test]
    fn test_absent_and_empty_images_differ() {
        let change = RowChange::new(RowAddress::default())
            .with_after(0, Bytes::new())
            .with_after(2, "x");

        assert_eq!(change.after(0), Some(&Bytes::new()));
        assert_eq!(change.after(1), None);
        assert_eq!(change.after(2), Some(&Bytes::from_static(b"x")));
        assert_eq!(change.after(9), None);
        assert_eq!(change.slot_count(), 3);
    }

    #[test]
    fn test_clear_slot() {
        let mut change = RowChange::new(RowAddress::default())
            .with_before(1, "a")
            .with_after(1, "a");
        change.clear_slot(1);
        change.clear_slot(5);
        assert!(change.before(1).is_none());
        assert!(change.after(1).is_none());
    }
}
