mod error;
mod formatters;
mod global;
mod logger;
mod sinks;

use std::fmt;

pub use error::{InitError, NetworkFailure, SinkError};
pub use formatters::DefaultFormatter;
pub use global::{get_instance, instance, try_init};
pub use logger::{Builder, Config, Destination, Logger};
pub use sinks::{FileSink, NetworkSink, StdoutSink};

/// Severity attached to every record. The tag is the record prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info | log::Level::Debug | log::Level::Trace => Level::Info,
        }
    }
}

pub trait LogFormatter: Sync + Send {
    fn format(&self, level: Level, message: &str) -> String;
}

/// Delivers a batch of already formatted records to a destination.
///
/// The logger calls this with its lock held, once per logging call. Implementations own the
/// wire format of the batch and must not retry: whatever happens, the logger drops the batch
/// afterwards.
pub trait LogSink: Sync + Send {
    fn write_batch(&self, records: &[String]) -> Result<(), SinkError>;
}
