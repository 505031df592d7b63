//! Tracing initialization for the CLI.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging to stderr.
///
/// Reads `LAUNCHSENSE_LOG` for filter directives, e.g.
/// `LAUNCHSENSE_LOG=launchsense_core=debug`. Falls back to `default_filter`
/// (the configured `logging.filter`) when unset or invalid.
///
/// Calling this more than once is a no-op.
pub fn init(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("LAUNCHSENSE_LOG")
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        // A subscriber installed by an embedding host wins.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}
