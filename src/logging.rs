// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `tracing` setup for the CLI.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter directive.
pub const LOG_ENV: &str = "K8S_TO_KRO_LOG";

/// Default level for the given number of `-v` flags.
pub fn default_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE
    }
}

/// Installs a stderr subscriber so stdout only carries the rendered document.
///
/// [`LOG_ENV`] takes precedence over `verbosity`. Calling this twice is a
/// no-op.
pub fn initialize_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity).to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_level(0), Level::WARN);
        assert_eq!(default_level(1), Level::INFO);
        assert_eq!(default_level(2), Level::DEBUG);
        assert_eq!(default_level(7), Level::TRACE);
    }

    #[test]
    fn repeated_initialization_is_harmless() {
        initialize_logging(0);
        initialize_logging(3);
    }
}
