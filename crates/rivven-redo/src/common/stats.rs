//! Output counters
//!
//! Every counter is emitted through the `metrics` facade under the
//! `rivven_redo_*` prefix, labelled with the serializer format, and is also
//! kept locally so a [`OutputStatsSnapshot`] works without a recorder
//! installed. The output buffer is single-threaded so no atomics are needed.

use rivven_redo_protocol::Op;
use serde::Serialize;

#[derive(Debug)]
pub struct OutputStats {
    format: &'static str,
    messages: u64,
    bytes: u64,
    begins: u64,
    commits: u64,
    inserts: u64,
    updates: u64,
    deletes: u64,
    ddls: u64,
    failures: u64,
}

impl OutputStats {
    /// Counters labelled with the serializer `format` ("protobuf", "json").
    pub fn new(format: &'static str) -> Self {
        Self {
            format,
            messages: 0,
            bytes: 0,
            begins: 0,
            commits: 0,
            inserts: 0,
            updates: 0,
            deletes: 0,
            ddls: 0,
            failures: 0,
        }
    }

    pub fn format(&self) -> &'static str {
        self.format
    }

    /// Record one payload entry appended to a message.
    pub fn record_payload(&mut self, op: Op) {
        let name = match op {
            Op::Begin => {
                self.begins += 1;
                "rivven_redo_begins_total"
            }
            Op::Commit => {
                self.commits += 1;
                "rivven_redo_commits_total"
            }
            Op::Insert => {
                self.inserts += 1;
                "rivven_redo_inserts_total"
            }
            Op::Update => {
                self.updates += 1;
                "rivven_redo_updates_total"
            }
            Op::Delete => {
                self.deletes += 1;
                "rivven_redo_deletes_total"
            }
            Op::Ddl => {
                self.ddls += 1;
                "rivven_redo_ddls_total"
            }
        };
        metrics::counter!(name, "format" => self.format).increment(1);
    }

    /// Record one message handed to the sink.
    pub fn record_message(&mut self, bytes: usize) {
        self.messages += 1;
        self.bytes += bytes as u64;

        metrics::counter!("rivven_redo_messages_total", "format" => self.format).increment(1);
        metrics::counter!("rivven_redo_bytes_total", "format" => self.format)
            .increment(bytes as u64);
    }

    /// Record a message discarded because it failed to serialize or deliver.
    ///
    /// `stage` is "serialize" or "sink".
    pub fn record_failure(&mut self, stage: &'static str) {
        self.failures += 1;
        metrics::counter!(
            "rivven_redo_failures_total",
            "format" => self.format,
            "stage" => stage
        )
        .increment(1);
    }

    pub fn snapshot(&self, schema_dedup_hits: u64) -> OutputStatsSnapshot {
        OutputStatsSnapshot {
            messages: self.messages,
            bytes: self.bytes,
            begins: self.begins,
            commits: self.commits,
            inserts: self.inserts,
            updates: self.updates,
            deletes: self.deletes,
            ddls: self.ddls,
            failures: self.failures,
            schema_dedup_hits,
        }
    }
}

/// Point-in-time copy of the output counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutputStatsSnapshot {
    pub messages: u64,
    pub bytes: u64,
    pub begins: u64,
    pub commits: u64,
    pub inserts: u64,
    pub updates: u64,
    pub deletes: u64,
    pub ddls: u64,
    pub failures: u64,
    pub schema_dedup_hits: u64,
}

impl OutputStatsSnapshot {
    /// Row-level payloads (INSERT/UPDATE/DELETE)
    pub fn dml_total(&self) -> u64 {
        self.inserts + self.updates + self.deletes
    }
}
