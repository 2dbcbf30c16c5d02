//! Protobuf conversion utilities
//!
//! Conversions between the native message tree and the prost wire types.

use crate::proto;
use crate::{
    ColumnInfo, ColumnType, ColumnValue, Op, Payload, ProtocolError, RedoMessage, ScalarValue,
    SchemaInfo, MAX_MESSAGE_SIZE,
};
use bytes::Bytes;
use prost::Message;

// ============================================================================
// Message Conversions
// ============================================================================

impl RedoMessage {
    /// Convert native message to protobuf bytes
    pub fn to_proto_bytes(&self) -> crate::Result<Vec<u8>> {
        let proto_redo = self.to_proto();
        let len = proto_redo.encoded_len();
        if len > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge(len, MAX_MESSAGE_SIZE));
        }
        Ok(proto_redo.encode_to_vec())
    }

    /// Parse protobuf bytes to native message
    pub fn from_proto_bytes(data: &[u8]) -> crate::Result<Self> {
        let proto_redo = proto::Redo::decode(data)?;
        Self::from_proto(&proto_redo)
    }

    fn to_proto(&self) -> proto::Redo {
        proto::Redo {
            scn: self.scn,
            scns: self.scns.clone(),
            tm: self.tm,
            tms: self.tms.clone(),
            xid: self.xid.clone(),
            xidn: self.xidn,
            payload: self.payload.iter().map(Payload::to_proto).collect(),
        }
    }

    fn from_proto(proto: &proto::Redo) -> crate::Result<Self> {
        Ok(Self {
            scn: proto.scn,
            scns: proto.scns.clone(),
            tm: proto.tm,
            tms: proto.tms.clone(),
            xid: proto.xid.clone(),
            xidn: proto.xidn,
            payload: proto
                .payload
                .iter()
                .map(Payload::from_proto)
                .collect::<crate::Result<Vec<_>>>()?,
        })
    }
}

impl Payload {
    fn to_proto(&self) -> proto::Payload {
        proto::Payload {
            op: proto::Op::from(self.op) as i32,
            schema: self.schema.as_ref().map(SchemaInfo::to_proto),
            rid: self.rid.clone(),
            before: self.before.iter().map(ColumnValue::to_proto).collect(),
            after: self.after.iter().map(ColumnValue::to_proto).collect(),
            ddl: self.ddl.clone(),
            scn: self.scn,
            scns: self.scns.clone(),
            tm: self.tm,
            tms: self.tms.clone(),
        }
    }

    fn from_proto(proto: &proto::Payload) -> crate::Result<Self> {
        let op = proto::Op::try_from(proto.op).map_err(|_| ProtocolError::UnknownEnumValue {
            field: "op",
            value: proto.op,
        })?;

        Ok(Self {
            op: op.into(),
            scn: proto.scn,
            scns: proto.scns.clone(),
            tm: proto.tm,
            tms: proto.tms.clone(),
            schema: proto
                .schema
                .as_ref()
                .map(SchemaInfo::from_proto)
                .transpose()?,
            rid: proto.rid.clone(),
            before: proto.before.iter().map(ColumnValue::from_proto).collect(),
            after: proto.after.iter().map(ColumnValue::from_proto).collect(),
            ddl: proto.ddl.clone(),
        })
    }
}

impl SchemaInfo {
    fn to_proto(&self) -> proto::Schema {
        proto::Schema {
            owner: self.owner.clone(),
            name: self.name.clone(),
            obj: self.obj,
            column: self.columns.iter().map(ColumnInfo::to_proto).collect(),
        }
    }

    fn from_proto(proto: &proto::Schema) -> crate::Result<Self> {
        Ok(Self {
            owner: proto.owner.clone(),
            name: proto.name.clone(),
            obj: proto.obj,
            columns: proto
                .column
                .iter()
                .map(ColumnInfo::from_proto)
                .collect::<crate::Result<Vec<_>>>()?,
        })
    }
}

impl ColumnInfo {
    fn to_proto(&self) -> proto::Column {
        proto::Column {
            name: self.name.clone(),
            r#type: proto::ColumnType::from(self.column_type) as i32,
            length: self.length,
            precision: self.precision,
            scale: self.scale,
            nullable: self.nullable,
        }
    }

    fn from_proto(proto: &proto::Column) -> crate::Result<Self> {
        let column_type = proto::ColumnType::try_from(proto.r#type).map_err(|_| {
            ProtocolError::UnknownEnumValue {
                field: "column type",
                value: proto.r#type,
            }
        })?;

        Ok(Self {
            name: proto.name.clone(),
            column_type: column_type.into(),
            length: proto.length,
            precision: proto.precision,
            scale: proto.scale,
            nullable: proto.nullable,
        })
    }
}

impl ColumnValue {
    fn to_proto(&self) -> proto::Value {
        use proto::value::Datum;

        let datum = self.value.as_ref().map(|value| match value {
            ScalarValue::Int(v) => Datum::ValueInt(*v),
            ScalarValue::Float(v) => Datum::ValueFloat(*v),
            ScalarValue::Double(v) => Datum::ValueDouble(*v),
            ScalarValue::String(v) => Datum::ValueString(v.clone()),
            ScalarValue::Bytes(v) => Datum::ValueBytes(v.to_vec()),
        });

        proto::Value {
            name: self.name.clone(),
            datum,
        }
    }

    fn from_proto(proto: &proto::Value) -> Self {
        use proto::value::Datum;

        let value = proto.datum.as_ref().map(|datum| match datum {
            Datum::ValueInt(v) => ScalarValue::Int(*v),
            Datum::ValueFloat(v) => ScalarValue::Float(*v),
            Datum::ValueDouble(v) => ScalarValue::Double(*v),
            Datum::ValueString(v) => ScalarValue::String(v.clone()),
            Datum::ValueBytes(v) => ScalarValue::Bytes(Bytes::copy_from_slice(v)),
        });

        Self {
            name: proto.name.clone(),
            value,
        }
    }
}

// ============================================================================
// Enum Conversions
// ============================================================================

impl From<Op> for proto::Op {
    fn from(op: Op) -> Self {
        match op {
            Op::Begin => proto::Op::Begin,
            Op::Commit => proto::Op::Commit,
            Op::Insert => proto::Op::Insert,
            Op::Update => proto::Op::Update,
            Op::Delete => proto::Op::Delete,
            Op::Ddl => proto::Op::Ddl,
        }
    }
}

impl From<proto::Op> for Op {
    fn from(op: proto::Op) -> Self {
        match op {
            proto::Op::Begin => Op::Begin,
            proto::Op::Commit => Op::Commit,
            proto::Op::Insert => Op::Insert,
            proto::Op::Update => Op::Update,
            proto::Op::Delete => Op::Delete,
            proto::Op::Ddl => Op::Ddl,
        }
    }
}

impl From<ColumnType> for proto::ColumnType {
    fn from(t: ColumnType) -> Self {
        match t {
            ColumnType::Unknown => proto::ColumnType::Unknown,
            ColumnType::Varchar2 => proto::ColumnType::Varchar2,
            ColumnType::Number => proto::ColumnType::Number,
            ColumnType::Long => proto::ColumnType::Long,
            ColumnType::Date => proto::ColumnType::Date,
            ColumnType::Raw => proto::ColumnType::Raw,
            ColumnType::LongRaw => proto::ColumnType::LongRaw,
            ColumnType::Rowid => proto::ColumnType::Rowid,
            ColumnType::Char => proto::ColumnType::Char,
            ColumnType::BinaryFloat => proto::ColumnType::BinaryFloat,
            ColumnType::BinaryDouble => proto::ColumnType::BinaryDouble,
            ColumnType::Clob => proto::ColumnType::Clob,
            ColumnType::Blob => proto::ColumnType::Blob,
            ColumnType::Timestamp => proto::ColumnType::Timestamp,
            ColumnType::TimestampWithTz => proto::ColumnType::TimestampWithTz,
            ColumnType::IntervalYearToMonth => proto::ColumnType::IntervalYearToMonth,
            ColumnType::IntervalDayToSecond => proto::ColumnType::IntervalDayToSecond,
            ColumnType::Urowid => proto::ColumnType::Urowid,
            ColumnType::TimestampWithLocalTz => proto::ColumnType::TimestampWithLocalTz,
        }
    }
}

impl From<proto::ColumnType> for ColumnType {
    fn from(t: proto::ColumnType) -> Self {
        match t {
            proto::ColumnType::Unknown => ColumnType::Unknown,
            proto::ColumnType::Varchar2 => ColumnType::Varchar2,
            proto::ColumnType::Number => ColumnType::Number,
            proto::ColumnType::Long => ColumnType::Long,
            proto::ColumnType::Date => ColumnType::Date,
            proto::ColumnType::Raw => ColumnType::Raw,
            proto::ColumnType::LongRaw => ColumnType::LongRaw,
            proto::ColumnType::Rowid => ColumnType::Rowid,
            proto::ColumnType::Char => ColumnType::Char,
            proto::ColumnType::BinaryFloat => ColumnType::BinaryFloat,
            proto::ColumnType::BinaryDouble => ColumnType::BinaryDouble,
            proto::ColumnType::Clob => ColumnType::Clob,
            proto::ColumnType::Blob => ColumnType::Blob,
            proto::ColumnType::Timestamp => ColumnType::Timestamp,
            proto::ColumnType::TimestampWithTz => ColumnType::TimestampWithTz,
            proto::ColumnType::IntervalYearToMonth => ColumnType::IntervalYearToMonth,
            proto::ColumnType::IntervalDayToSecond => ColumnType::IntervalDayToSecond,
            proto::ColumnType::Urowid => ColumnType::Urowid,
            proto::ColumnType::TimestampWithLocalTz => ColumnType::TimestampWithLocalTz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_message() -> RedoMessage {
        let mut insert = Payload::new(Op::Insert);
        insert.schema = Some(SchemaInfo {
            owner: "HR".into(),
            name: "EMP".into(),
            obj: Some(73_001),
            columns: vec![ColumnInfo {
                name: "ID".into(),
                column_type: ColumnType::Number,
                length: None,
                precision: Some(10),
                scale: Some(0),
                nullable: false,
            }],
        });
        insert.rid = Some("AAAR0pAAEAAAACHAAA".into());
        insert.after = vec![
            ColumnValue::new("ID", ScalarValue::Int(5)),
            ColumnValue::new("RATE", ScalarValue::Float(1.0)),
            ColumnValue::new("PAYLOAD", ScalarValue::Bytes(Bytes::from_static(b"\x00\x01"))),
            ColumnValue::null("NAME"),
        ];

        let mut ddl = Payload::new(Op::Ddl);
        ddl.ddl = Some("ALTER TABLE EMP ADD X NUMBER".into());
        ddl.scn = Some(43);

        RedoMessage {
            scn: Some(42),
            tms: Some("2024-01-15T10:30:00Z".into()),
            xidn: Some(0x0001_0002_0000_0003),
            payload: vec![Payload::new(Op::Begin), insert, ddl, Payload::new(Op::Commit)],
            ..Default::default()
        }
    }

    #[test]
    fn test_proto_roundtrip_preserves_tree() {
        let message = sample_message();
        let bytes = message.to_proto_bytes().unwrap();
        let decoded = RedoMessage::from_proto_bytes(&bytes).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_null_marker_survives_proto() {
        let message = sample_message();
        let decoded = RedoMessage::from_proto_bytes(&message.to_proto_bytes().unwrap()).unwrap();
        assert!(decoded.payload[1].after[3].is_null());
        assert_eq!(decoded.payload[1].after[3].name, "NAME");
    }

    #[test]
    fn test_unknown_op_rejected() {
        let raw = proto::Redo {
            payload: vec![proto::Payload {
                op: 99,
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = RedoMessage::from_proto_bytes(&raw.encode_to_vec()).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnknownEnumValue { field: "op", value: 99 }
        ));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = RedoMessage::from_proto_bytes(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, ProtocolError::Deserialization(_)));
    }

    #[test]
    fn test_empty_message_encodes() {
        let bytes = RedoMessage::default().to_proto_bytes().unwrap();
        assert!(bytes.is_empty());
        assert_eq!(RedoMessage::from_proto_bytes(&bytes).unwrap(), RedoMessage::default());
    }
}
