//! Serializer backends for output messages
//!
//! A [`SerializerBackend`] turns a finished [`RedoMessage`] into bytes. The
//! output buffer only depends on the trait; the concrete backend is picked at
//! configuration time through [`OutputFormat`].
//!
//! | Format   | Backend                | Content type             |
//! |----------|------------------------|--------------------------|
//! | Protobuf | [`ProtobufSerializer`] | `application/x-protobuf` |
//! | JSON     | [`JsonSerializer`]     | `application/json`       |
//!
//! # Example
//!
//! ```rust
//! use rivven_redo::common::OutputFormat;
//!
//! let backend = OutputFormat::Json.create_serializer();
//! assert_eq!(backend.name(), "json");
//! ```

use crate::common::Result;
use rivven_redo_protocol::RedoMessage;
use serde::{Deserialize, Serialize};

/// Renders output messages to bytes
pub trait SerializerBackend: Send + Sync {
    /// Format name (e.g., "protobuf", "json")
    fn name(&self) -> &'static str;

    /// MIME type of the produced bytes
    fn content_type(&self) -> &'static str;

    /// Serialize one complete message
    fn serialize(&self, message: &RedoMessage) -> Result<Vec<u8>>;
}

/// Protocol Buffers backend (prost)
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufSerializer;

impl SerializerBackend for ProtobufSerializer {
    fn name(&self) -> &'static str {
        "protobuf"
    }

    fn content_type(&self) -> &'static str {
        "application/x-protobuf"
    }

    fn serialize(&self, message: &RedoMessage) -> Result<Vec<u8>> {
        Ok(message.to_proto_bytes()?)
    }
}

/// JSON backend (serde_json)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed output (for debugging)
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SerializerBackend for JsonSerializer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn serialize(&self, message: &RedoMessage) -> Result<Vec<u8>> {
        if self.pretty {
            Ok(serde_json::to_vec_pretty(message)?)
        } else {
            Ok(message.to_json_bytes()?)
        }
    }
}

/// Wire format selection for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Protocol Buffers
    #[default]
    Protobuf,
    /// JSON document per message
    Json,
}

impl OutputFormat {
    /// Create the serializer backend for this format
    pub fn create_serializer(&self) -> Box<dyn SerializerBackend> {
        match self {
            OutputFormat::Protobuf => Box::new(ProtobufSerializer),
            OutputFormat::Json => Box::new(JsonSerializer::new()),
        }
    }

    /// Check if this format produces binary output
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Protobuf)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protobuf => write!(f, "protobuf"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protobuf" | "proto" | "pb" => Ok(Self::Protobuf),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivven_redo_protocol::{Op, Payload};

    fn message() -> RedoMessage {
        RedoMessage {
            scn: Some(7),
            xid: Some("1.2.3".into()),
            payload: vec![Payload::new(Op::Begin)],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("PROTOBUF".parse::<OutputFormat>().unwrap(), OutputFormat::Protobuf);
        assert_eq!("pb".parse::<OutputFormat>().unwrap(), OutputFormat::Protobuf);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("avro".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_create_serializer() {
        let pb = OutputFormat::Protobuf.create_serializer();
        assert_eq!(pb.name(), "protobuf");
        assert_eq!(pb.content_type(), "application/x-protobuf");
        assert!(OutputFormat::Protobuf.is_binary());

        let json = OutputFormat::Json.create_serializer();
        assert_eq!(json.name(), "json");
        assert!(!OutputFormat::Json.is_binary());
    }

    #[test]
    fn test_protobuf_output_decodes() {
        let bytes = ProtobufSerializer.serialize(&message()).unwrap();
        assert_eq!(RedoMessage::from_proto_bytes(&bytes).unwrap(), message());
    }

    #[test]
    fn test_json_output() {
        let bytes = JsonSerializer::new().serialize(&message()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["scn"], 7);
        assert_eq!(value["xid"], "1.2.3");
        assert_eq!(value["payload"][0]["op"], "begin");

        let pretty = JsonSerializer::pretty().serialize(&message()).unwrap();
        assert!(pretty.contains(&b'\n'));
    }
}
