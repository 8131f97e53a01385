//! Diagnostic logging setup shared by the binaries

use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter directive (e.g. `multipowers=debug`)
pub const LOG_ENV: &str = "MULTIPOWERS_LOG";

/// Install a stderr subscriber. `MULTIPOWERS_LOG` takes precedence over `default_level`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .try_init();
}
