//! Oracle redo output encoding
//!
//! Supports:
//! - Transaction framing per transaction (full) or per operation (short)
//! - NUMBER dispatch by declared precision/scale
//! - BINARY_FLOAT/BINARY_DOUBLE, DATE and TIMESTAMP storage formats
//! - Extended row identifiers
//! - Schema snapshots with per-session dedup
//! - Update image compaction
//!
//! # Architecture
//!
//! ```text
//! RowChange       → ValueEncoder  ─┐
//! TableDescriptor → SchemaEncoder ─┼→ MessageBuilder → SerializerBackend → ByteSink
//! RowAddress      → RowId         ─┘
//! ```

mod buffer;
mod compact;
mod message;
mod rowid;
mod schema;
mod value;

pub use buffer::*;
pub use compact::*;
pub use message::*;
pub use rowid::*;
pub use schema::*;
pub use value::*;
