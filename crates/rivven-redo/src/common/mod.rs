//! # Common Redo Output Types
//!
//! Database-agnostic building blocks of the output stage:
//!
//! - [`RedoError`] - Error taxonomy (consistency, serialization, sink, config)
//! - [`TableDescriptor`] / [`ColumnDescriptor`] - Catalog metadata
//! - [`TransactionEnvelope`] / [`RowChange`] / [`DdlEvent`] - Captured inputs
//! - [`FormatPolicy`] - Framing and representation settings
//! - [`SerializerBackend`] - Pluggable wire format
//! - [`ByteSink`] - Destination for serialized messages
//! - [`OutputStats`] - Output counters
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Common Module                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Catalog       ←─── Table/column descriptors (read-only)    │
//! │  Event         ←─── Envelopes, row images, DDL text         │
//! │  FormatPolicy  ←─── Framing, header, schema, column rules   │
//! │  Serializer    ←─── Protobuf / JSON backends                │
//! │  ByteSink      ←─── append + commit message boundary        │
//! │  OutputStats   ←─── Message and payload counters            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod error;
mod event;
mod policy;
mod serialization;
mod sink;
mod stats;

pub use catalog::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use policy::*;
pub use serialization::*;
pub use sink::*;
pub use stats::*;
