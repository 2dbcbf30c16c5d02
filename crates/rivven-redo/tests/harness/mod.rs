//! Shared fixtures for redo output integration tests

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use rivven_redo::common::{
    ByteSink, ColumnDescriptor, FormatPolicy, JsonSerializer, MemorySink, RedoError, RowAddress,
    RowChange, SerializerBackend, TableDescriptor, TransactionEnvelope, Xid,
};
use rivven_redo::{RedoBuffer, RedoMessage};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test logging (call once per test)
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("rivven_redo=trace".parse().unwrap()),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// `APP.T(ID NUMBER(10) primary key, NAME VARCHAR2(20))`
pub fn table_t() -> TableDescriptor {
    TableDescriptor::new("APP", "T", 100, 100)
        .with_column(ColumnDescriptor::number("ID", 10, 0).with_primary_key())
        .with_column(ColumnDescriptor::varchar2("NAME", 20))
}

pub const T_DBA: u32 = (4 << 22) | 131;

pub fn row(slot: u16) -> RowChange {
    RowChange::new(RowAddress::new(T_DBA, slot))
}

pub fn envelope(scn: u64) -> TransactionEnvelope {
    TransactionEnvelope::new(
        scn,
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        Xid::new(10, 3, 4_711),
    )
}

pub fn json_buffer(policy: FormatPolicy) -> RedoBuffer<MemorySink> {
    init_test_logging();
    RedoBuffer::new(policy, Box::new(JsonSerializer::new()), MemorySink::new())
}

/// Committed messages of a JSON buffer, parsed
pub fn json_messages(buffer: &RedoBuffer<MemorySink>) -> Vec<serde_json::Value> {
    buffer
        .sink()
        .messages()
        .iter()
        .map(|m| serde_json::from_slice(m).unwrap())
        .collect()
}

/// Backend that rejects every message
pub struct FailingSerializer;

impl SerializerBackend for FailingSerializer {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn content_type(&self) -> &'static str {
        "application/octet-stream"
    }

    fn serialize(&self, _message: &RedoMessage) -> Result<Vec<u8>, RedoError> {
        Err(RedoError::serialization("backend unavailable"))
    }
}

/// Sink that accepts appends but fails every commit
#[derive(Debug, Default)]
pub struct RejectingSink {
    pub inner: MemorySink,
    pub aborts: usize,
}

impl ByteSink for RejectingSink {
    fn append(&mut self, data: &[u8]) -> Result<(), RedoError> {
        self.inner.append(data)
    }

    fn commit(&mut self) -> Result<(), RedoError> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "downstream closed").into())
    }

    fn abort(&mut self) {
        self.aborts += 1;
        self.inner.abort();
    }
}

/// Split a length-prefixed stream into message bodies
pub fn split_length_prefixed(mut data: &[u8]) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    while data.len() >= 4 {
        let len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        frames.push(data[4..4 + len].to_vec());
        data = &data[4 + len..];
    }
    assert!(data.is_empty(), "trailing bytes in stream");
    frames
}
