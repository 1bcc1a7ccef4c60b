use {
    std::sync::Once,
    tracing::level_filters::LevelFilter,
    tracing_subscriber::{EnvFilter, fmt::time::UtcTime, prelude::*},
};

/// Initializes the global tracing subscriber.
///
/// `env_filter` uses the `RUST_LOG` directive syntax, e.g.
/// `warn,vault=debug,vault_driver=debug`.
///
/// # Panics
///
/// Panics if a global subscriber was already installed. Use
/// [`initialize_reentrant`] from tests.
pub fn initialize(env_filter: &str, use_json_format: bool) {
    set_tracing_subscriber(env_filter, use_json_format);
    tracing::info!(%env_filter, use_json_format, "initialized tracing");
}

/// Like [`initialize`], but can be called multiple times in a row. Later
/// calls are ignored.
pub fn initialize_reentrant(env_filter: &str) {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| set_tracing_subscriber(env_filter, false));
}

fn set_tracing_subscriber(env_filter: &str, use_json_format: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(env_filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(false);

    if use_json_format {
        tracing_subscriber::registry()
            .with(fmt_layer.json().with_filter(filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer.with_filter(filter))
            .init();
    }
}
