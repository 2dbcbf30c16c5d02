//! Serde utilities for bytes serialization
//!
//! Raw column values are rendered as lowercase hex strings in text formats.

use crate::lookup::hex_encode;
use bytes::Bytes;
use serde::Serializer;

/// Serde module for `Bytes` fields rendered as hex
pub mod hex_bytes {
    use super::*;

    pub fn serialize<S>(val: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex_encode(&val[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestMessage {
        #[serde(with = "hex_bytes")]
        data: Bytes,
    }

    #[test]
    fn test_hex_bytes_serialize() {
        let msg = TestMessage {
            data: Bytes::from_static(b"\x01\xab"),
        };
        assert_eq!(serde_json::to_string(&msg).unwrap(), r#"{"data":"01ab"}"#);
    }

    #[test]
    fn test_hex_bytes_empty() {
        let msg = TestMessage { data: Bytes::new() };
        assert_eq!(serde_json::to_string(&msg).unwrap(), r#"{"data":""}"#);
    }
}
