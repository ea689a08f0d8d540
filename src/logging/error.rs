use std::{error::Error, io, path::PathBuf};

use yansi::{Condition, Paint};

use super::Destination;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed writing log records to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed delivering log records to {url}: {reason}")]
    Network { url: String, reason: NetworkFailure },

    #[error("failed serializing log records")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkFailure {
    #[error("invalid url ({0})")]
    InvalidUrl(String),

    #[error("can't build request ({0})")]
    Request(String),

    #[error("transport error ({0})")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("can't block on a request from inside an async runtime")]
    NestedRuntime,
}

impl SinkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SinkError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn network(url: &str, reason: NetworkFailure) -> Self {
        SinkError::Network {
            url: url.to_string(),
            reason,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("logger already initialized with {existing} destination")]
    AlreadyInitialized { existing: Destination },

    #[error("failed building logger: {0}")]
    Build(eyre::Report),
}

pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    message
}

/// Writes a flush failure to stderr, cause chain included. Never fails.
pub(crate) fn report(err: &SinkError) {
    let message = format!("logger: {}", error_chain(err));
    eprintln!("{}", message.red().whenever(Condition::STDERR_IS_TTY));
}
