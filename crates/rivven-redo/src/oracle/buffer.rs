//! # Redo Output Buffer
//!
//! Turns decoded transaction events into framed, serialized messages and
//! hands them to a [`ByteSink`].
//!
//! ## Framing
//!
//! | Mode  | Messages                         | Payloads per message      |
//! |-------|----------------------------------|---------------------------|
//! | Full  | one per transaction              | BEGIN, row ops, COMMIT    |
//! | Short | one per operation                | exactly one               |
//!
//! In full mode a message opens on BEGIN and is serialized on COMMIT; every
//! operation in between requires the open message. In short mode no message
//! may be open when an operation starts; each one opens, writes its payload
//! and flushes. Violations are reported as [`RedoError::InvalidState`].
//!
//! ## Value lists
//!
//! Columns are walked in slot order and dropped slots are skipped.
//!
//! - A captured, non-empty image is encoded to a value.
//! - INSERT/DELETE: otherwise a null marker is written when the column
//!   format is full or the column is part of the primary key.
//! - UPDATE: otherwise a null marker is written when either side of the
//!   column was captured.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use rivven_redo::common::*;
//! use rivven_redo::oracle::RedoBuffer;
//!
//! let table = TableDescriptor::new("APP", "T", 100, 100)
//!     .with_column(ColumnDescriptor::number("ID", 10, 0).with_primary_key())
//!     .with_column(ColumnDescriptor::varchar2("NAME", 20));
//!
//! let mut buffer = RedoBuffer::new(
//!     FormatPolicy::full(),
//!     OutputFormat::Json.create_serializer(),
//!     MemorySink::new(),
//! );
//!
//! let envelope = TransactionEnvelope::new(42, Utc::now(), Xid::new(1, 2, 3));
//! buffer.process_begin(&envelope)?;
//! buffer.process_insert(
//!     &table,
//!     &RowChange::new(RowAddress::new(1, 0)).with_after(0, "1"),
//! )?;
//! buffer.process_commit()?;
//!
//! assert_eq!(buffer.sink().len(), 1);
//! # Ok::<(), rivven_redo::common::RedoError>(())
//! ```

use crate::common::{
    ByteSink, ColumnFormat, DdlEvent, FormatPolicy, OutputConfig, OutputStats,
    OutputStatsSnapshot, RedoError, Result, RowChange, SerializerBackend, TableDescriptor,
    TransactionEnvelope,
};
use crate::oracle::{
    ChangedColumnsCompactor, MessageBuilder, SchemaCache, SchemaEncoder, UpdateCompactor,
    ValueEncoder,
};
use bytes::Bytes;
use rivven_redo_protocol::{ColumnValue, Op, Payload};
use tracing::{debug, trace, warn};

/// Stateful message framer for one output stream.
///
/// Single-threaded: events must be delivered in redo order by one caller.
pub struct RedoBuffer<S: ByteSink> {
    policy: FormatPolicy,
    serializer: Box<dyn SerializerBackend>,
    sink: S,
    schema: SchemaEncoder,
    compactor: Box<dyn UpdateCompactor>,
    current: Option<MessageBuilder>,
    last_envelope: TransactionEnvelope,
    stats: OutputStats,
}

impl<S: ByteSink> RedoBuffer<S> {
    pub fn new(policy: FormatPolicy, serializer: Box<dyn SerializerBackend>, sink: S) -> Self {
        let stats = OutputStats::new(serializer.name());
        Self {
            policy,
            serializer,
            sink,
            schema: SchemaEncoder::new(),
            compactor: Box::new(ChangedColumnsCompactor),
            current: None,
            last_envelope: TransactionEnvelope::default(),
            stats,
        }
    }

    /// Validate `config` and build a buffer with its serializer.
    pub fn from_config(config: OutputConfig, sink: S) -> Result<Self> {
        config.validate()?;
        debug!(
            format = %config.format,
            mode = %config.policy.message,
            "Creating redo output buffer"
        );
        Ok(Self::new(config.policy, config.format.create_serializer(), sink))
    }

    /// Replace the update compactor.
    pub fn with_compactor(mut self, compactor: impl UpdateCompactor + 'static) -> Self {
        self.compactor = Box::new(compactor);
        self
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Start a transaction.
    pub fn process_begin(&mut self, envelope: &TransactionEnvelope) -> Result<()> {
        if self.current.is_some() {
            return Err(self.violation(RedoError::message_exists("begin")));
        }
        self.last_envelope = envelope.clone();

        let mut builder = MessageBuilder::open(envelope, self.policy);
        debug!(xid = %envelope.xid, scn = envelope.scn, "Message opened");
        let payload = builder.payload(Op::Begin);
        self.push(&mut builder, payload);
        self.release(builder)
    }

    /// End the current transaction.
    pub fn process_commit(&mut self) -> Result<()> {
        let mut builder = self.acquire("commit")?;
        let payload = builder.payload(Op::Commit);
        self.push(&mut builder, payload);
        self.flush(builder)
    }

    pub fn process_insert(&mut self, table: &TableDescriptor, change: &RowChange) -> Result<()> {
        let mut builder = self.acquire("insert")?;
        let mut payload = self.row_payload(&builder, Op::Insert, table, change);
        payload.after = inclusive_values(table, self.policy.column, |slot| change.after(slot));
        self.push(&mut builder, payload);
        self.release(builder)
    }

    /// Unchanged columns are pruned by the configured compactor first.
    pub fn process_update(&mut self, table: &TableDescriptor, change: &RowChange) -> Result<()> {
        let mut builder = self.acquire("update")?;

        let mut change = change.clone();
        self.compactor.compact(table, &mut change);

        let mut payload = self.row_payload(&builder, Op::Update, table, &change);
        payload.before = update_values(table, &change, |slot| change.before(slot));
        payload.after = update_values(table, &change, |slot| change.after(slot));
        self.push(&mut builder, payload);
        self.release(builder)
    }

    pub fn process_delete(&mut self, table: &TableDescriptor, change: &RowChange) -> Result<()> {
        let mut builder = self.acquire("delete")?;
        let mut payload = self.row_payload(&builder, Op::Delete, table, change);
        payload.before = inclusive_values(table, self.policy.column, |slot| change.before(slot));
        self.push(&mut builder, payload);
        self.release(builder)
    }

    /// Emit a DDL statement verbatim.
    pub fn process_ddl(&mut self, table: &TableDescriptor, ddl: &DdlEvent) -> Result<()> {
        let mut builder = self.acquire("ddl")?;

        let mut payload = builder.payload(Op::Ddl);
        payload.schema = self.schema.encode_header(table, &self.policy.schema);
        payload.ddl = Some(ddl.sql.clone());

        debug!(
            table = %table.qualified_name(),
            ddl_type = ddl.ddl_type,
            operation = %ddl.operation,
            "DDL payload"
        );
        self.push(&mut builder, payload);
        self.release(builder)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Check if a full-mode message is waiting for its commit.
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn policy(&self) -> &FormatPolicy {
        &self.policy
    }

    pub fn serializer_name(&self) -> &'static str {
        self.serializer.name()
    }

    pub fn compactor_name(&self) -> &'static str {
        self.compactor.name()
    }

    pub fn schema_cache(&self) -> &SchemaCache {
        self.schema.cache()
    }

    pub fn stats(&self) -> OutputStatsSnapshot {
        self.stats.snapshot(self.schema.cache().hits())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the buffer; an open message is discarded.
    pub fn into_sink(self) -> S {
        if let Some(builder) = &self.current {
            warn!(
                payloads = builder.payload_count(),
                xid = %builder.envelope().xid,
                "Discarding unfinished message"
            );
        }
        self.sink
    }

    // ========================================================================
    // Framing
    // ========================================================================

    /// Message the next payload goes into.
    fn acquire(&mut self, operation: &'static str) -> Result<MessageBuilder> {
        if self.policy.is_short() {
            if self.current.is_some() {
                return Err(self.violation(RedoError::message_exists(operation)));
            }
            Ok(MessageBuilder::open(&self.last_envelope, self.policy))
        } else {
            match self.current.take() {
                Some(builder) => Ok(builder),
                None => Err(self.violation(RedoError::message_missing(operation))),
            }
        }
    }

    /// Keep the message open (full) or send it (short).
    fn release(&mut self, builder: MessageBuilder) -> Result<()> {
        if self.policy.is_short() {
            self.flush(builder)
        } else {
            self.current = Some(builder);
            Ok(())
        }
    }

    fn push(&mut self, builder: &mut MessageBuilder, payload: Payload) {
        trace!(op = %payload.op, index = builder.payload_count(), "Payload appended");
        self.stats.record_payload(payload.op);
        builder.push(payload);
    }

    /// Serialize and deliver; the message is gone either way.
    fn flush(&mut self, builder: MessageBuilder) -> Result<()> {
        let message = builder.finish();
        let payloads = message.payload.len();

        let bytes = match self.serializer.serialize(&message) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.stats.record_failure("serialize");
                warn!(
                    serializer = self.serializer.name(),
                    payloads,
                    error = %e,
                    "Message serialization failed, message discarded"
                );
                return Err(e);
            }
        };

        if let Err(e) = self.sink.append(&bytes).and_then(|_| self.sink.commit()) {
            self.sink.abort();
            self.stats.record_failure("sink");
            warn!(payloads, error = %e, "Sink rejected message, message discarded");
            return Err(e);
        }

        self.stats.record_message(bytes.len());
        debug!(payloads, bytes = bytes.len(), "Message flushed");
        Ok(())
    }

    fn violation(&self, err: RedoError) -> RedoError {
        warn!(mode = self.policy.message.as_str(), "{}", err);
        err
    }

    fn row_payload(
        &mut self,
        builder: &MessageBuilder,
        op: Op,
        table: &TableDescriptor,
        change: &RowChange,
    ) -> Payload {
        let mut payload = builder.payload(op);
        payload.schema = self.schema.encode(table, &self.policy.schema);
        payload.rid = Some(table.row_id(&change.address).to_string());
        payload
    }
}

impl<S: ByteSink + std::fmt::Debug> std::fmt::Debug for RedoBuffer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedoBuffer")
            .field("policy", &self.policy)
            .field("serializer", &self.serializer.name())
            .field("compactor", &self.compactor.name())
            .field("open", &self.current.is_some())
            .field("sink", &self.sink)
            .finish()
    }
}

/// INSERT after-image / DELETE before-image.
fn inclusive_values<'a>(
    table: &TableDescriptor,
    format: ColumnFormat,
    image: impl Fn(usize) -> Option<&'a Bytes>,
) -> Vec<ColumnValue> {
    table
        .slots()
        .filter_map(|(slot, column)| match image(slot) {
            Some(data) if !data.is_empty() => Some(ValueEncoder::encode(column, data)),
            _ if format == ColumnFormat::Full || column.is_primary_key() => {
                Some(ValueEncoder::null(column))
            }
            _ => None,
        })
        .collect()
}

/// One side of an UPDATE.
fn update_values<'a>(
    table: &TableDescriptor,
    change: &RowChange,
    image: impl Fn(usize) -> Option<&'a Bytes>,
) -> Vec<ColumnValue> {
    table
        .slots()
        .filter_map(|(slot, column)| match image(slot) {
            Some(data) if !data.is_empty() => Some(ValueEncoder::encode(column, data)),
            _ if change.before(slot).is_some() || change.after(slot).is_some() => {
                Some(ValueEncoder::null(column))
            }
            _ => None,
        })
        .collect()
}
