use super::{Level, LogFormatter};

/// Renders `<LEVEL>: <message>`. No timestamp, no color: the same string goes to every sink.
#[derive(Debug, Default, Clone)]
pub struct DefaultFormatter {}

impl DefaultFormatter {
    pub fn new() -> Self {
        Self {}
    }
}

impl LogFormatter for DefaultFormatter {
    fn format(&self, level: Level, message: &str) -> String {
        format!("{}: {}", level.tag(), message)
    }
}
