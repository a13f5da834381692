//! Tracing subscriber initialization

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use auth_shared::config::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the env filter, preferring `RUST_LOG` over the configured level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            InfrastructureError::Config(format!("Invalid log level {}: {}", config.level, e))
        }),
    }
}

fn format_layer(config: &LoggingConfig) -> BoxedLayer {
    let source = config.source_location;

    match (config.format, config.timestamp) {
        (LogFormat::Json, true) => fmt::layer()
            .json()
            .with_file(source)
            .with_line_number(source)
            .boxed(),
        (LogFormat::Json, false) => fmt::layer()
            .json()
            .without_time()
            .with_file(source)
            .with_line_number(source)
            .boxed(),
        (LogFormat::Pretty, true) => fmt::layer()
            .pretty()
            .with_ansi(config.colored)
            .with_file(source)
            .with_line_number(source)
            .boxed(),
        (LogFormat::Pretty, false) => fmt::layer()
            .pretty()
            .without_time()
            .with_ansi(config.colored)
            .with_file(source)
            .with_line_number(source)
            .boxed(),
        (LogFormat::Compact, true) => fmt::layer()
            .compact()
            .with_ansi(config.colored)
            .with_file(source)
            .with_line_number(source)
            .boxed(),
        (LogFormat::Compact, false) => fmt::layer()
            .compact()
            .without_time()
            .with_ansi(config.colored)
            .with_file(source)
            .with_line_number(source)
            .boxed(),
    }
}

/// Install the global tracing subscriber
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = build_filter(config)?;

    tracing_subscriber::registry()
        .with(format_layer(config))
        .with(filter)
        .try_init()
        .map_err(|e| InfrastructureError::Config(format!("Failed to install subscriber: {}", e)))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialized");
    Ok(())
}
