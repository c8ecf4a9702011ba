//! Logging setup for the CLI.
//!
//! Structured logging via the tracing ecosystem. `RUST_LOG` wins when set;
//! otherwise the verbose flag picks the default level for our crates.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hublens_core={default_level},hublens_client={default_level},hublens_cli={default_level}"
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}
