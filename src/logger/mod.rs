//! Tracing subscriber and Prometheus exporter for the oracle process.
//!
//! `RUST_LOG` overrides `logger.level` when set.

mod config;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub(crate) use config::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub(crate) fn initialize(logger: &LoggerConfig, telemetry: &TelemetryConfig) {
    let directives = filter_directives(logger, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|error| {
        eprintln!("Invalid log filter {directives:?} ({error}); falling back to info");
        EnvFilter::new("info")
    });

    let installed = tracing_subscriber::registry()
        .with(output_layer(logger.format).with_filter(filter))
        .try_init();
    if let Err(error) = installed {
        eprintln!("Tracing subscriber already installed: {error}");
    }
    tracing::info!(format = ?logger.format, filter = %directives, "Logger initialized");

    if telemetry.metrics.enabled {
        start_metrics_exporter(&telemetry.metrics);
    }
}

/// Non-empty `RUST_LOG` wins over the configured level.
fn filter_directives(logger: &LoggerConfig, rust_log: Option<String>) -> String {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| logger.level.clone())
}

fn output_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Pretty => fmt::layer().with_target(true).compact().boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .flatten_event(true)
            .boxed(),
    }
}

fn start_metrics_exporter(metrics: &TelemetryMetricsConfig) {
    let bind_address = metrics.bind_address;
    match PrometheusBuilder::new()
        .with_http_listener(bind_address)
        .install()
    {
        Ok(()) => tracing::info!(%bind_address, "Serving Prometheus metrics"),
        Err(error) => tracing::warn!(
            %bind_address,
            %error,
            "Prometheus exporter not started; continuing without metrics"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(level: &str) -> LoggerConfig {
        LoggerConfig {
            level: level.to_string(),
            format: LogFormat::Pretty,
        }
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        let directives = filter_directives(&logger("info"), Some("oracle_blockchain=trace".into()));
        assert_eq!(directives, "oracle_blockchain=trace");
    }

    #[test]
    fn blank_rust_log_keeps_configured_level() {
        assert_eq!(filter_directives(&logger("warn"), Some("  ".into())), "warn");
        assert_eq!(filter_directives(&logger("debug"), None), "debug");
    }
}
