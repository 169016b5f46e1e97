use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "WELLRL_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber; stdout carries the JSON output only.
pub fn init_tracing() {
    let directive = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let env_filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
