//! Tracing subscriber setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging on stderr.
///
/// `RUST_LOG` takes precedence when set; otherwise the crate logs at `info`,
/// or `debug` when `verbose` is on. Stdout stays reserved for the report.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "restaurant_report=debug"
    } else {
        "restaurant_report=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
