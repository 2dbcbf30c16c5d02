//! Message under construction
//!
//! Header values are rendered once, when the message opens, from the
//! transaction envelope and the policy. Payload entries then pick up the same
//! SCN / timestamp rendering when the policy scope asks for it.

use crate::common::{FieldScope, FormatPolicy, ScnRepr, TimestampRepr, TransactionEnvelope, XidFormat};
use rivven_redo_protocol::lookup::num_to_hex;
use rivven_redo_protocol::{Op, Payload, RedoMessage};

#[derive(Debug)]
pub struct MessageBuilder {
    message: RedoMessage,
    envelope: TransactionEnvelope,
    policy: FormatPolicy,
}

impl MessageBuilder {
    /// Open a message and write its header.
    pub fn open(envelope: &TransactionEnvelope, policy: FormatPolicy) -> Self {
        let mut message = RedoMessage::default();

        match policy.scn.repr {
            ScnRepr::Hex => message.scns = Some(num_to_hex(envelope.scn, 16)),
            ScnRepr::Decimal => message.scn = Some(envelope.scn),
        }
        match policy.timestamp.repr {
            TimestampRepr::Iso8601 => message.tms = Some(envelope.timestamp_iso8601()),
            TimestampRepr::UnixMillis => message.tm = Some(envelope.timestamp_millis()),
        }
        match policy.xid {
            XidFormat::Text => message.xid = Some(envelope.xid.to_string()),
            XidFormat::Numeric => message.xidn = Some(envelope.xid.to_u64()),
        }

        Self {
            message,
            envelope: envelope.clone(),
            policy,
        }
    }

    /// New payload entry carrying per-payload header fields if configured.
    pub fn payload(&self, op: Op) -> Payload {
        let mut payload = Payload::new(op);

        if self.policy.scn.scope == FieldScope::AllPayloads {
            payload.scn = self.message.scn;
            payload.scns = self.message.scns.clone();
        }
        if self.policy.timestamp.scope == FieldScope::AllPayloads {
            payload.tm = self.message.tm;
            payload.tms = self.message.tms.clone();
        }
        payload
    }

    pub fn push(&mut self, payload: Payload) {
        self.message.payload.push(payload);
    }

    pub fn payload_count(&self) -> usize {
        self.message.payload.len()
    }

    pub fn envelope(&self) -> &TransactionEnvelope {
        &self.envelope
    }

    pub fn finish(self) -> RedoMessage {
        self.message
    }
}
