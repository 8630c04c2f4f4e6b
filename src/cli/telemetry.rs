//! Log output and optional OTLP span export.
//!
//! Logs go to stdout as pretty text or one JSON object per line. Spans are
//! exported over OTLP/gRPC only when `OTEL_EXPORTER_OTLP_ENDPOINT` is set; the
//! exporter reads the endpoint and `OTEL_EXPORTER_OTLP_HEADERS` itself.

use anyhow::Result;
use once_cell::sync::OnceCell;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::{Compression, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    Resource,
    propagation::{BaggagePropagator, TraceContextPropagator},
    trace::{SdkTracerProvider, Tracer},
};
use std::{env::var, str::FromStr, time::Duration};
use tracing::{Level, debug, error};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt};
use ulid::Ulid;

static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub level: Option<Level>,
    pub format: LogFormat,
    pub service_name: String,
    /// A fresh ULID per process when unset.
    pub instance_id: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: LogFormat::Pretty,
            service_name: env!("CARGO_PKG_NAME").to_string(),
            instance_id: None,
        }
    }
}

fn resource(config: &TelemetryConfig) -> Resource {
    let instance_id = config
        .instance_id
        .clone()
        .unwrap_or_else(|| Ulid::new().to_string());

    Resource::builder_empty()
        .with_attributes(vec![
            KeyValue::new("service.name", config.service_name.clone()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("service.instance.id", instance_id),
        ])
        .build()
}

fn init_tracer(config: &TelemetryConfig) -> Result<Tracer> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_compression(Compression::Gzip)
        .with_timeout(Duration::from_secs(3))
        .build()?;

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource(config))
        .build();

    let _ = TRACER_PROVIDER.set(trace_provider.clone());

    global::set_tracer_provider(trace_provider.clone());
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));

    Ok(trace_provider.tracer(config.service_name.clone()))
}

fn fmt_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_target(false)
            .pretty()
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the exporter cannot be built or a subscriber is already set.
pub fn init(config: &TelemetryConfig) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.unwrap_or(Level::ERROR).into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("tokio=error".parse()?)
        .add_directive("sqlx=warn".parse()?)
        .add_directive("opentelemetry_sdk=warn".parse()?);

    let otel_layer = if var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        Some(tracing_opentelemetry::layer().with_tracer(init_tracer(config)?))
    } else {
        None
    };

    let subscriber = Registry::default()
        .with(fmt_layer(config.format))
        .with(otel_layer)
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    debug!(service.name = %config.service_name, format = ?config.format, "telemetry ready");

    Ok(())
}

/// Flush and stop the span exporter, if one was started.
pub fn shutdown_tracer() {
    if let Some(tp) = TRACER_PROVIDER.get() {
        if let Err(err) = tp.shutdown() {
            error!("Failed to shut down tracer provider, spans may be lost: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(resource: &Resource, key: &str) -> Option<String> {
        resource
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str().to_string())
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn resource_carries_configured_identity() {
        let config = TelemetryConfig {
            service_name: "authgate-eu".to_string(),
            instance_id: Some("node-1".to_string()),
            ..TelemetryConfig::default()
        };
        let resource = resource(&config);

        assert_eq!(
            attribute(&resource, "service.name").as_deref(),
            Some("authgate-eu")
        );
        assert_eq!(
            attribute(&resource, "service.instance.id").as_deref(),
            Some("node-1")
        );
        assert_eq!(
            attribute(&resource, "service.version").as_deref(),
            Some(env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn resource_generates_instance_id_when_unset() {
        let resource = resource(&TelemetryConfig::default());
        let instance_id = attribute(&resource, "service.instance.id").unwrap_or_default();
        assert!(Ulid::from_string(&instance_id).is_ok(), "got {instance_id}");
        assert_eq!(
            attribute(&resource, "service.name").as_deref(),
            Some("authgate")
        );
    }

    #[test]
    fn shutdown_without_exporter_is_noop() {
        shutdown_tracer();
    }
}
