//! Process-wide logger used by the pipeline to report non-fatal conditions
//! (dropped degenerate geometry, UDIM chart clamps, skipped CMPT tiles,
//! texture load fallbacks) without threading a logger handle through every
//! call in C2/C3/C5.

use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Severity of a single log entry.
#[derive(Copy, Clone, PartialOrd, PartialEq, Eq, Ord, Hash, Debug)]
#[repr(u32)]
pub enum MessageKind {
    Information = 0,
    Warning = 1,
    Error = 2,
}

impl MessageKind {
    fn as_str(self) -> &'static str {
        match self {
            MessageKind::Information => "[INFO]",
            MessageKind::Warning => "[WARNING]",
            MessageKind::Error => "[ERROR]",
        }
    }
}

/// A single recorded message, kept around so callers (tests, a future
/// reporting surface) can inspect what happened during a run without
/// scraping stdout.
#[derive(Clone, Debug)]
pub struct LogMessage {
    pub kind: MessageKind,
    pub content: String,
    pub time: Duration,
}

struct LogState {
    verbosity: MessageKind,
    time_origin: Instant,
    history: Vec<LogMessage>,
}

lazy_static! {
    static ref LOG: Mutex<LogState> = Mutex::new(LogState {
        verbosity: MessageKind::Information,
        time_origin: Instant::now(),
        history: Vec::new(),
    });
}

/// Entry point for the pipeline's logger. All methods are static, mirroring
/// a process-wide singleton rather than a handle passed around workers.
pub struct Log;

impl Log {
    /// Sets the minimum severity that gets printed (entries below it are
    /// still recorded in history, just not written to stderr).
    pub fn set_verbosity(kind: MessageKind) {
        LOG.lock().verbosity = kind;
    }

    fn write(kind: MessageKind, message: String) {
        let mut log = LOG.lock();
        let time = Instant::now() - log.time_origin;
        if kind >= log.verbosity {
            eprintln!("{} {}", kind.as_str(), message);
        }
        log.history.push(LogMessage {
            kind,
            content: message,
            time,
        });
    }

    pub fn info<S: AsRef<str>>(message: S) {
        Self::write(MessageKind::Information, message.as_ref().to_owned());
    }

    pub fn warn<S: AsRef<str>>(message: S) {
        Self::write(MessageKind::Warning, message.as_ref().to_owned());
    }

    pub fn err<S: AsRef<str>>(message: S) {
        Self::write(MessageKind::Error, message.as_ref().to_owned());
    }

    /// Returns a snapshot of every message recorded so far. Intended for
    /// tests asserting that a warning was actually logged (e.g. the UDIM
    /// chart-spanning clamp in C3).
    pub fn history() -> Vec<LogMessage> {
        LOG.lock().history.clone()
    }

    pub fn clear_history() {
        LOG.lock().history.clear();
    }
}

/// Convenience trait so call sites can write `value.log_debug_name()` style
/// one-liners when a warning needs to embed a `Debug` value without an
/// intermediate `format!`.
pub trait LogExt: Debug {
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}
impl<T: Debug> LogExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_records_messages() {
        Log::clear_history();
        Log::warn("test warning");
        let history = Log::history();
        assert!(history
            .iter()
            .any(|m| m.kind == MessageKind::Warning && m.content == "test warning"));
    }
}
