//! Host configuration.
//!
//! The browser launches the host with a fixed command line from the
//! native messaging manifest, so overrides come from the environment
//! first and CLI flags second.

use std::time::Duration;

use tracing::warn;

/// Default enumeration command.
const DEFAULT_COMMAND: &str = "wlr-randr";

/// Default hard timeout for one enumeration run.
const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Runtime configuration for the host.
#[derive(Debug, Clone)]
pub struct Config {
    /// Display enumeration executable, invoked with no arguments.
    pub command: String,
    /// Hard timeout for one enumeration run.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Reads `AUTOHIDPI_COMMAND` and `AUTOHIDPI_TIMEOUT_MS`. An
    /// unparseable timeout is logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(command) = std::env::var("AUTOHIDPI_COMMAND") {
            if !command.is_empty() {
                config.command = command;
            }
        }

        if let Ok(raw) = std::env::var("AUTOHIDPI_TIMEOUT_MS") {
            match raw.parse() {
                Ok(ms) => config.timeout = Duration::from_millis(ms),
                Err(_) => warn!(value = %raw, "Ignoring unparseable AUTOHIDPI_TIMEOUT_MS"),
            }
        }

        config
    }
}
