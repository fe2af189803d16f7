//! Log routing — records emitted by the native collaborator fan out to
//! registered sinks in registration order, with per-sink failure isolation.
//!
//! The dispatcher is owned by the bridge instance rather than living in a
//! process-global, so tests can swap in a fresh registry; one dispatcher per
//! application is the expected shape.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

use crate::error::{TracelinkError, TracelinkResult};

/// Log severity, numbered with Android log priorities on the wire.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbose,
    #[default]
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Integer priority used on the wire (`android.util.Log` numbering).
    pub fn priority(self) -> i64 {
        match self {
            LogLevel::Verbose => 2,
            LogLevel::Debug => 3,
            LogLevel::Info => 4,
            LogLevel::Warning => 5,
            LogLevel::Error => 6,
        }
    }

    /// Map a wire priority back to a level. Unknown priorities fall back to
    /// the SDK default rather than failing.
    pub fn from_priority(priority: i64) -> Self {
        match priority {
            2 => LogLevel::Verbose,
            3 => LogLevel::Debug,
            4 => LogLevel::Info,
            5 => LogLevel::Warning,
            6 => LogLevel::Error,
            _ => LogLevel::default(),
        }
    }
}

/// A routed log record from the collaborator. Ephemeral: decoded,
/// dispatched, dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub tag: String,
    pub message: String,
    pub stack_trace: Option<String>,
}

impl LogRecord {
    /// Decode the collaborator's `level|tag|message|stackTrace` line.
    ///
    /// Splits on the first three `|` only; the stack segment may be missing
    /// or empty (both decode to `None`). Fails with
    /// [`TracelinkError::MalformedLogRecord`] on fewer than three segments
    /// or a non-integer level.
    ///
    /// The delimiter is not escaped, so a `|` inside the message shifts the
    /// remainder into the stack segment. Known fragility of the wire format,
    /// kept for compatibility with the emitting side.
    pub fn decode(line: &str) -> TracelinkResult<Self> {
        let mut parts = line.splitn(4, '|');
        let level = parts.next().unwrap_or_default();
        let tag = parts.next().ok_or_else(|| malformed(line))?;
        let message = parts.next().ok_or_else(|| malformed(line))?;
        let stack_trace = parts.next().filter(|s| !s.is_empty());

        let priority: i64 = level.trim().parse().map_err(|_| malformed(line))?;

        Ok(LogRecord {
            level: LogLevel::from_priority(priority),
            tag: tag.to_string(),
            message: message.to_string(),
            stack_trace: stack_trace.map(str::to_string),
        })
    }
}

fn malformed(line: &str) -> TracelinkError {
    TracelinkError::MalformedLogRecord(line.to_string())
}

/// Observer of routed log records. Implementations must tolerate delivery
/// from collaborator threads.
pub trait LogSink: Send + Sync {
    fn on_log(&self, record: &LogRecord);
}

/// Registry of log sinks with insertion-order fan-out.
pub struct LogDispatcher {
    sinks: Mutex<Vec<Arc<dyn LogSink>>>,
    min_level: Mutex<LogLevel>,
    dispatch_gate: Mutex<()>,
}

impl LogDispatcher {
    pub fn new() -> Self {
        Self {
            sinks: Mutex::new(Vec::new()),
            min_level: Mutex::new(LogLevel::Verbose),
            dispatch_gate: Mutex::new(()),
        }
    }

    /// Register a sink. Adding the same `Arc` twice is a no-op; identity is
    /// by allocation, not by contents.
    pub fn add_sink(&self, sink: Arc<dyn LogSink>) {
        let mut sinks = self.sinks.lock();
        if !sinks.iter().any(|existing| same_sink(existing, &sink)) {
            sinks.push(sink);
        }
    }

    /// Unregister a sink; removing an absent sink is a no-op.
    pub fn remove_sink(&self, sink: &Arc<dyn LogSink>) {
        self.sinks.lock().retain(|existing| !same_sink(existing, sink));
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    /// Records below `level` are dropped before fan-out.
    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.lock() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.lock()
    }

    /// Deliver a record to every registered sink in registration order.
    ///
    /// The gate serializes concurrent dispatches so delivery order stays
    /// FIFO; the sink-list lock is only held to snapshot, so a sink may
    /// register or unregister sinks from inside `on_log`. A panicking sink
    /// is reported through `tracing` and does not stop the fan-out; nothing
    /// propagates to the caller.
    pub fn dispatch(&self, record: &LogRecord) {
        if record.level < self.min_level() {
            return;
        }

        let _gate = self.dispatch_gate.lock();
        let sinks: Vec<_> = self.sinks.lock().clone();
        for sink in sinks {
            let delivery = panic::catch_unwind(AssertUnwindSafe(|| sink.on_log(record)));
            if delivery.is_err() {
                // Reported on the tracing side only: a sink failure must
                // never re-enter the dispatch path as a routed record.
                error!(tag = %record.tag, "log sink panicked during dispatch");
            }
        }
    }
}

impl Default for LogDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity comparison by allocation address. Vtable pointers are not stable
/// across codegen units, so a plain `Arc::ptr_eq` on the trait objects could
/// miss a duplicate.
fn same_sink(a: &Arc<dyn LogSink>, b: &Arc<dyn LogSink>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Sink that forwards routed records into the [`tracing`] facade — the
/// default console output for hosts that already run a tracing subscriber.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn on_log(&self, record: &LogRecord) {
        match record.level {
            LogLevel::Verbose => tracing::trace!(tag = %record.tag, "{}", record.message),
            LogLevel::Debug => tracing::debug!(tag = %record.tag, "{}", record.message),
            LogLevel::Info => tracing::info!(tag = %record.tag, "{}", record.message),
            LogLevel::Warning => tracing::warn!(tag = %record.tag, "{}", record.message),
            LogLevel::Error => match &record.stack_trace {
                Some(stack) => {
                    tracing::error!(tag = %record.tag, stack = %stack, "{}", record.message)
                }
                None => tracing::error!(tag = %record.tag, "{}", record.message),
            },
        }
    }
}
