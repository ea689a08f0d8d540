use clap::Parser;
use eyre::Context;
use sinklog::logging::{self, Destination, Level, Logger};

#[derive(Parser, Debug)]
#[command(version, long_version = "")]
#[command(about = "Write log lines to stdout, a file or an HTTP endpoint.", long_about = None)]
pub struct Sinklog {
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = Destination::Stdout,
        help = "Where log lines are flushed to."
    )]
    pub destination: Destination,

    #[arg(
        short,
        long,
        default_value = "application.log",
        help = "Log file, overwritten on every flush. Used with --destination file."
    )]
    pub file: String,

    #[arg(
        short,
        long,
        default_value = "http://localhost:8080/logs",
        help = "Endpoint receiving a JSON array per flush. Used with --destination network."
    )]
    pub url: String,

    #[arg(
        short,
        long,
        value_enum,
        default_value_t = Level::Info,
        help = "Level the given messages are logged at."
    )]
    pub level: Level,

    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        help = "Write verbose diagnostics to stderr.",
        display_order = 999
    )]
    pub verbose: u8,

    #[arg(
        help = "Messages to log. Without any, a demo sequence is logged at every level, then the \
                logger is requested again for the other destinations: those requests get the \
                first instance back, so every demo line lands on the chosen destination."
    )]
    pub messages: Vec<String>,
}

impl Sinklog {
    fn diagnostics_level(&self) -> Option<tracing::Level> {
        match self.verbose {
            0 => None,
            1 => Some(tracing::Level::WARN),
            2 => Some(tracing::Level::INFO),
            3 => Some(tracing::Level::DEBUG),
            4_u8..=u8::MAX => Some(tracing::Level::TRACE),
        }
    }

    fn setup_diagnostics(&self) {
        if let Some(level) = self.diagnostics_level() {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    pub fn run(self) -> eyre::Result<()> {
        self.setup_diagnostics();

        let logger = logging::get_instance(self.destination, &self.file, &self.url)
            .with_context(|| format!("Failed creating {} logger", self.destination))?;

        if self.messages.is_empty() {
            self.demo(logger)?;
        } else {
            for message in &self.messages {
                logger.log_at(self.level, message);
            }
        }

        Ok(())
    }

    fn demo(&self, logger: &Logger) -> eyre::Result<()> {
        logger.info(format!("Application started with {} logging", self.destination));
        logger.warning("Low memory condition detected");
        logger.error("An error occurred during processing");

        // Configuration is fixed by the first call; these hand back the same logger.
        let stdout_logger = logging::get_instance(Destination::Stdout, "", "")?;
        stdout_logger.info("Application can also log to stdout");

        let network_logger = logging::get_instance(Destination::Network, "", &self.url)?;
        network_logger.info("Network logging needs implementation");

        Ok(())
    }
}
