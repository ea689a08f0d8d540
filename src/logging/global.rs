//! Process-wide logger instance.
//!
//! The first successful initialization fixes the configuration for the rest of the process.
//! [`get_instance`] silently hands back that first instance whatever it's asked for;
//! [`try_init`] refuses a conflicting configuration instead.

use once_cell::sync::OnceCell;

use super::{Builder, Config, Destination, InitError, Logger};

static INSTANCE: OnceCell<Logger> = OnceCell::new();

/// Returns the process-wide logger, building it from these arguments on the first call.
///
/// Later calls ignore their arguments and return the instance configured by the first
/// successful call. If building fails nothing is stored, so a later call can try again.
pub fn get_instance(
    destination: Destination,
    file_path: &str,
    network_url: &str,
) -> eyre::Result<&'static Logger> {
    INSTANCE.get_or_try_init(|| {
        Builder::from_config(Config::new(destination, file_path, network_url)).build()
    })
}

/// Like [`get_instance`], but a call whose config differs from the live one is an error.
pub fn try_init(config: Config) -> Result<&'static Logger, InitError> {
    let logger = INSTANCE
        .get_or_try_init(|| Builder::from_config(config.clone()).build())
        .map_err(InitError::Build)?;

    if logger.config() != &config {
        return Err(InitError::AlreadyInitialized {
            existing: logger.destination(),
        });
    }

    Ok(logger)
}

pub fn instance() -> Option<&'static Logger> {
    INSTANCE.get()
}
