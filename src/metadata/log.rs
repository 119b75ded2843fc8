//! Deferred per-parser logging.
//!
//! Parsers run on multiple threads, so emitting log lines directly would interleave
//! messages from unrelated classfiles. Each parser instead buffers its lines in a
//! [`DeferredLog`], and the link driver flushes the buffers in input order, producing a
//! deterministic log regardless of scheduling.

use std::mem;

/// One buffered log line with its indent level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Nesting depth; rendered as two spaces per level on flush.
    pub indent: usize,
    /// The message text.
    pub message: String,
}

/// An ordered buffer of log lines, flushed through the [`log`] facade.
#[derive(Debug, Default)]
pub struct DeferredLog {
    entries: Vec<LogEntry>,
}

impl DeferredLog {
    /// Create an empty log buffer.
    #[must_use]
    pub fn new() -> Self {
        DeferredLog::default()
    }

    /// Buffer a message at the given indent level.
    pub fn log(&mut self, indent: usize, message: impl Into<String>) {
        self.entries.push(LogEntry {
            indent,
            message: message.into(),
        });
    }

    /// True when no messages are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The buffered entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Move all buffered entries out of this log into `other`, preserving order.
    pub fn drain_into(&mut self, other: &mut DeferredLog) {
        other.entries.append(&mut self.entries);
    }

    /// Emit all buffered entries at debug level and clear the buffer.
    pub fn flush(&mut self) {
        for entry in mem::take(&mut self.entries) {
            log::debug!("{:indent$}{}", "", entry.message, indent = entry.indent * 2);
        }
    }
}
