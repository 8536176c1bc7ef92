//! Severity levels and the "report level + message" capability.

use std::fmt;
use std::io::{self, Write};

/// Severity understood by the monitoring framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Level {
    /// Process exit code the monitoring framework expects for this level.
    pub fn exit_code(self) -> i32 {
        match self {
            Level::Ok => 0,
            Level::Warning => 1,
            Level::Critical => 2,
            Level::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warning => "WARNING",
            Level::Critical => "CRITICAL",
            Level::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one check: a level and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub level: Level,
    pub message: String,
}

impl CheckResult {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Level::Ok, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Level::Critical, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Level::Unknown, message)
    }
}

/// Sink for the single result of a check.
pub trait Reporter {
    fn report(&mut self, result: &CheckResult) -> io::Result<()>;
}

/// Writes `<check name> <LEVEL>: <message>` as one line, the format
/// Nagios-compatible plugin runners parse.
pub struct PluginReporter<W: Write> {
    check_name: String,
    out: W,
}

impl PluginReporter<io::Stdout> {
    pub fn stdout(check_name: impl Into<String>) -> Self {
        Self::new(check_name, io::stdout())
    }
}

impl<W: Write> PluginReporter<W> {
    pub fn new(check_name: impl Into<String>, out: W) -> Self {
        Self {
            check_name: check_name.into(),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for PluginReporter<W> {
    fn report(&mut self, result: &CheckResult) -> io::Result<()> {
        writeln!(
            self.out,
            "{} {}: {}",
            self.check_name, result.level, result.message
        )?;
        self.out.flush()
    }
}
