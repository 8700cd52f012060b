use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: stdout, a daily rolling file under
/// `logs/`, and the OpenTelemetry log bridge. Keep the guard alive for the
/// lifetime of the process or buffered file output is lost.
pub fn init_logger(logger_provider: SdkLoggerProvider, service_name: &str) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::daily("logs", format!("{service_name}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let otel_layer = OpenTelemetryTracingBridge::new(&logger_provider);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().json().with_writer(file_writer))
        .with(otel_layer)
        .init();

    guard
}
