//! Tracing subscriber initialisation

use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use bh_shared::config::{LogFormat, LoggingConfig};

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the configured level. Returns `false` when a
/// subscriber was already installed; the existing one is kept.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let installed = match config.format {
        LogFormat::Pretty => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(config.colored)
                .with_file(config.source_location)
                .with_line_number(config.source_location),
        ),
        LogFormat::Compact => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(config.colored)
                .with_target(true)
                .with_file(config.source_location)
                .with_line_number(config.source_location),
        ),
        LogFormat::Json => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_file(config.source_location)
                .with_line_number(config.source_location),
        ),
    };

    if installed {
        tracing::debug!(level = %config.level, "Tracing initialised");
    }
    installed
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},sqlx=warn,hyper=warn,reqwest=warn",
            config.level
        ))
    })
}

fn init_with_layer<L>(config: &LoggingConfig, fmt_layer: L) -> bool
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config))
        .try_init()
        .is_ok()
}
