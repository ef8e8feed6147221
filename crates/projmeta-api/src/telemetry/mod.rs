//! Tracing subscriber setup.

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "projmeta=debug,tower_http=debug";

/// Install the global subscriber. JSON lines in production, compact console output otherwise.
///
/// `RUST_LOG` overrides the default filter. Calling this twice is harmless; the second
/// installation is skipped.
pub fn init_telemetry(production: bool) {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let result = if production {
        tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter())
            .with(console_fmt)
            .try_init()
    };

    if result.is_ok() {
        tracing::info!(production, "Telemetry initialized");
    }
}
