//! Log sinks.
//!
//! The pipeline and the batch runner report progress through a [`LogSink`]
//! and never care which one they got. [`TracingSink`] turns every message
//! into a `tracing` event; [`ChannelSink`] forwards structured
//! [`LogRecord`]s to whoever holds the receiver (a GUI, a test).
//!
//! Sinks are shared by every worker, so appends arrive concurrently and in
//! no particular order.

use crossbeam_channel::{Receiver, Sender};
use tracing::Level;

/// Destination for pipeline messages.
pub trait LogSink: Send + Sync {
    /// Records `message` for `unit` (or for the run as a whole).
    fn log(&self, unit: Option<&str>, level: Level, message: &str);
}

/// Sink writing through the `tracing` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, unit: Option<&str>, level: Level, message: &str) {
        let file = unit.unwrap_or("-");
        if level == Level::ERROR {
            tracing::error!(file, "{message}");
        } else if level == Level::WARN {
            tracing::warn!(file, "{message}");
        } else if level == Level::INFO {
            tracing::info!(file, "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(file, "{message}");
        } else {
            tracing::trace!(file, "{message}");
        }
    }
}

/// One structured message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Unit identity; `None` for run-level messages.
    pub unit: Option<String>,
    /// Severity.
    pub level: Level,
    /// Text.
    pub message: String,
}

/// Sink sending [`LogRecord`]s over a channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<LogRecord>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its records arrive on.
    pub fn new() -> (Self, Receiver<LogRecord>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl LogSink for ChannelSink {
    fn log(&self, unit: Option<&str>, level: Level, message: &str) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.tx.send(LogRecord {
            unit: unit.map(str::to_string),
            level,
            message: message.to_string(),
        });
    }
}

/// A sink bound to one work unit.
#[derive(Clone, Copy)]
pub struct UnitLog<'a> {
    sink: &'a dyn LogSink,
    unit: &'a str,
}

impl<'a> UnitLog<'a> {
    /// Binds `sink` to `unit`.
    pub fn new(sink: &'a dyn LogSink, unit: &'a str) -> Self {
        Self { sink, unit }
    }

    /// Unit identity.
    pub fn unit(&self) -> &str {
        self.unit
    }

    /// Logs at `level`.
    pub fn log(&self, level: Level, message: &str) {
        self.sink.log(Some(self.unit), level, message);
    }

    /// Logs at info.
    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    /// Logs at warn.
    pub fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    /// Logs at error.
    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    /// Logs at debug.
    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_records() {
        let (sink, rx) = ChannelSink::new();
        let log = UnitLog::new(&sink, "DSCF0001.RAF");
        log.warn("no lens model");
        sink.log(None, Level::INFO, "done");

        let first = rx.try_recv().unwrap();
        assert_eq!(first.unit.as_deref(), Some("DSCF0001.RAF"));
        assert_eq!(first.level, Level::WARN);
        assert_eq!(first.message, "no lens model");

        let second = rx.try_recv().unwrap();
        assert_eq!(second.unit, None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.log(Some("a"), Level::ERROR, "still fine");
    }

    #[test]
    fn test_tracing_sink_accepts_all_levels() {
        let log = UnitLog::new(&TracingSink, "x");
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            log.log(level, "message");
        }
    }
}
