//! Rivven Redo Output Protocol
//!
//! This crate defines the output message tree produced by `rivven-redo` and
//! the wire encodings it can be rendered to.
//!
//! - [`RedoMessage`] / [`Payload`] / [`ColumnValue`] - native message tree
//! - [`proto`] - protobuf wire types (prost)
//! - [`lookup`] - fixed alphabets shared by the textual encodings
//!
//! # Protocol Stability
//!
//! Protobuf field tags and enum discriminants in [`proto`] are part of the wire
//! contract. Never renumber them; only append.
//!
//! # Example
//!
//! ```rust
//! use rivven_redo_protocol::{Op, Payload, RedoMessage};
//!
//! let mut message = RedoMessage::default();
//! message.scn = Some(42);
//! message.payload.push(Payload::new(Op::Begin));
//!
//! let bytes = message.to_proto_bytes().unwrap();
//! let decoded = RedoMessage::from_proto_bytes(&bytes).unwrap();
//! assert_eq!(decoded, message);
//! ```

mod error;
pub mod lookup;
pub mod proto;
mod proto_convert;
mod serde_utils;
mod types;

pub use error::{ProtocolError, Result};
pub use types::{ColumnInfo, ColumnType, ColumnValue, Op, Payload, RedoMessage, ScalarValue, SchemaInfo};

/// Maximum serialized message size (64 MiB)
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;
