//! # rivven-redo - Redo Log Output Encoding for Rivven
//!
//! Output stage of an Oracle redo-log change capture pipeline. Decoded
//! transaction events (begin, commit, row changes, DDL) are framed into
//! messages, serialized with a pluggable backend and delivered to a byte
//! sink.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Redo reader / transaction buffer               │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ begin / insert / update /
//!                                │ delete / ddl / commit
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        RedoBuffer                           │
//! │   FormatPolicy · SchemaEncoder · ValueEncoder · RowId       │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ RedoMessage
//!                                ▼
//! ┌───────────────────────┐          ┌──────────────────────────┐
//! │  SerializerBackend    │ ───────▶ │        ByteSink          │
//! │  (protobuf / json)    │  bytes   │  append + commit         │
//! └───────────────────────┘          └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use rivven_redo::common::*;
//! use rivven_redo::RedoBuffer;
//!
//! let config: OutputConfig =
//!     serde_json::from_str(r#"{"format": "json", "policy": {"message": "short"}}"#)?;
//! let mut buffer = RedoBuffer::from_config(config, MemorySink::new())?;
//!
//! buffer.process_begin(&TransactionEnvelope::new(1, Utc::now(), Xid::new(1, 0, 7)))?;
//! buffer.process_commit()?;
//!
//! assert_eq!(buffer.sink().len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod common;
pub mod oracle;

pub use common::{
    ByteSink, ErrorCategory, FormatPolicy, OutputConfig, OutputFormat, RedoError, Result,
};
pub use oracle::{RedoBuffer, UpdateCompactor};
pub use rivven_redo_protocol::{Op, RedoMessage};
