//! Progress reporting
//!
//! Scenarios print one line per step to stdout and diagnostics to stderr.
//! Step and failure lines are mirrored as `tracing` events. A [`Reporter`]
//! can also write into in-memory buffers so tests can inspect exactly what a
//! run printed.

use parking_lot::Mutex;
use std::fmt::Display;
use std::io::Write;
use std::sync::Arc;

/// Width of the banner label column, including the colon
const LABEL_WIDTH: usize = 15;

#[derive(Debug, Clone)]
enum Sink {
    Stdout,
    Stderr,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

impl Sink {
    fn write_line(&self, line: &str) {
        // A closed pipe must not abort the scenario before cleanup runs.
        let _ = match self {
            Sink::Stdout => writeln!(std::io::stdout().lock(), "{line}"),
            Sink::Stderr => writeln!(std::io::stderr().lock(), "{line}"),
            Sink::Buffer(buffer) => writeln!(buffer.lock(), "{line}"),
        };
    }
}

/// Line-oriented progress and diagnostic output
#[derive(Debug, Clone)]
pub struct Reporter {
    out: Sink,
    err: Sink,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::stdio()
    }
}

impl Reporter {
    /// Progress to stdout, diagnostics to stderr
    pub fn stdio() -> Self {
        Self {
            out: Sink::Stdout,
            err: Sink::Stderr,
        }
    }

    /// Reporter writing into buffers, plus a handle to read them back
    pub fn capture() -> (Self, Captured) {
        let out = Arc::new(Mutex::new(Vec::new()));
        let err = Arc::new(Mutex::new(Vec::new()));
        let reporter = Self {
            out: Sink::Buffer(Arc::clone(&out)),
            err: Sink::Buffer(Arc::clone(&err)),
        };
        (reporter, Captured { out, err })
    }

    /// One progress line
    pub fn step(&self, message: impl Display) {
        let line = message.to_string();
        tracing::info!(target: "s3_smoke::step", "{line}");
        self.out.write_line(&line);
    }

    /// Aligned `Label: value` banner line
    pub fn field(&self, label: &str, value: impl Display) {
        let label = format!("{label}:");
        self.out
            .write_line(&format!("{label:<width$} {value}", width = LABEL_WIDTH));
    }

    /// The single diagnostic line of a failed run. The tracing mirror stays
    /// below the default filter.
    pub fn failure(&self, message: impl Display) {
        let line = message.to_string();
        tracing::info!(target: "s3_smoke::step", failed = true, "{line}");
        self.err.write_line(&line);
    }
}

/// Buffers behind a capturing [`Reporter`]
#[derive(Debug, Clone)]
pub struct Captured {
    out: Arc<Mutex<Vec<u8>>>,
    err: Arc<Mutex<Vec<u8>>>,
}

impl Captured {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.out.lock()).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.err.lock()).into_owned()
    }
}
