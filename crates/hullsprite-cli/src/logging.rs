//! Diagnostic logging setup.
//!
//! User-facing output goes to stdout through `colored`; diagnostics go to
//! stderr through `tracing`.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. `"warn"` or
/// `"hullsprite_cli=debug"`) is used. Calling this twice is harmless.
pub fn init_logging(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
