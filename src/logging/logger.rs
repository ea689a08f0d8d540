use std::{
    fmt, mem,
    sync::{Mutex, MutexGuard, PoisonError},
};

use eyre::Context;
use log::{LevelFilter, Log};

use super::{
    error,
    formatters::DefaultFormatter,
    sinks::{FileSink, NetworkSink, StdoutSink},
    Level, LogFormatter, LogSink,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Destination {
    Stdout,
    File,
    Network,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => write!(f, "stdout"),
            Destination::File => write!(f, "file"),
            Destination::Network => write!(f, "network"),
        }
    }
}

/// Where a logger writes. Only the field matching `destination` is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub destination: Destination,
    pub file_path: String,
    pub network_url: String,
}

impl Config {
    pub fn new(
        destination: Destination,
        file_path: impl Into<String>,
        network_url: impl Into<String>,
    ) -> Self {
        Self {
            destination,
            file_path: file_path.into(),
            network_url: network_url.into(),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Destination::Stdout, "", "")
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::new(Destination::File, path, "")
    }

    pub fn network(url: impl Into<String>) -> Self {
        Self::new(Destination::Network, "", url)
    }

    fn build_sink(&self) -> eyre::Result<Box<dyn LogSink>> {
        let sink: Box<dyn LogSink> = match self.destination {
            Destination::Stdout => Box::new(StdoutSink::new()),
            Destination::File => Box::new(FileSink::new(&self.file_path)),
            Destination::Network => Box::new(
                NetworkSink::new(&self.network_url).context("Failed creating network sink")?,
            ),
        };
        Ok(sink)
    }
}

/// Buffers records and flushes them through its sink on every call.
///
/// The buffer lock is held across the append and the flush, so concurrent callers never see
/// each other's records in a batch. A flush failure is printed to stderr and the batch is
/// dropped: delivery is at most once.
pub struct Logger {
    config: Config,
    filter: LevelFilter,
    sink: Box<dyn LogSink>,
    formatter: Box<dyn LogFormatter>,
    buffer: Mutex<Vec<String>>,
}

impl Logger {
    pub fn new(
        config: Config,
        filter: LevelFilter,
        sink: Box<dyn LogSink>,
        formatter: Box<dyn LogFormatter>,
    ) -> Self {
        Self {
            config,
            filter,
            sink,
            formatter,
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn destination(&self) -> Destination {
        self.config.destination
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log_at(Level::Info, message.as_ref())
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.log_at(Level::Warning, message.as_ref())
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log_at(Level::Error, message.as_ref())
    }

    pub fn log_at(&self, level: Level, message: &str) {
        let mut buffer = self.lock_buffer();
        buffer.push(self.formatter.format(level, message));
        self.flush_pending(&mut buffer);
    }

    /// Registers this logger as the `log` facade backend.
    pub fn init(&'static self) -> eyre::Result<()> {
        log::set_logger(self).context("Failed registering logger")?;
        log::set_max_level(self.filter);

        Ok(())
    }

    fn lock_buffer(&self) -> MutexGuard<'_, Vec<String>> {
        // A panicking sink must not take logging down with it.
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush_pending(&self, buffer: &mut Vec<String>) {
        // Taken before the sink runs, so a panicking sink can't leave the batch behind.
        let batch = mem::take(buffer);
        if let Err(err) = self.sink.write_batch(&batch) {
            error::report(&err);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter >= metadata.level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.log_at(record.level().into(), &record.args().to_string());
        }
    }

    fn flush(&self) {
        let mut buffer = self.lock_buffer();
        self.flush_pending(&mut buffer);
    }
}

pub struct Builder {
    filter: LevelFilter,
    config: Config,
    sink: Option<Box<dyn LogSink>>,
    formatter: Box<dyn LogFormatter>,
}

impl Builder {
    pub fn new() -> Self {
        Self::from_config(Config::stdout())
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            filter: LevelFilter::Info,
            config,
            sink: None,
            formatter: Box::new(DefaultFormatter::new()),
        }
    }

    pub fn with_level(self, filter: LevelFilter) -> Self {
        Self { filter, ..self }
    }

    pub fn with_stdout_sink(self) -> Self {
        Self {
            config: Config::stdout(),
            sink: None,
            ..self
        }
    }

    pub fn with_file_sink(self, path: impl Into<String>) -> Self {
        Self {
            config: Config::file(path),
            sink: None,
            ..self
        }
    }

    pub fn with_network_sink(self, url: impl Into<String>) -> Self {
        Self {
            config: Config::network(url),
            sink: None,
            ..self
        }
    }

    /// Flushes through `sink` instead of the one `destination` would select.
    pub fn with_sink(self, sink: impl LogSink + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            ..self
        }
    }

    pub fn with_formatter(self, formatter: impl LogFormatter + 'static) -> Self {
        Self {
            formatter: Box::new(formatter),
            ..self
        }
    }

    pub fn build(self) -> eyre::Result<Logger> {
        let sink = match self.sink {
            Some(sink) => sink,
            None => self.config.build_sink()?,
        };

        tracing::debug!("logger writing to {}", self.config.destination);
        Ok(Logger::new(self.config, self.filter, sink, self.formatter))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
