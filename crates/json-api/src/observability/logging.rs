//! Tracing subscriber initialisation.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::observability::{LogFormat, LoggingConfig};

use super::ObservabilityError;

/// Crates whose `info` output is noise next to request and cart logs.
const QUIET_TARGETS: [&str; 5] = ["h2", "hyper", "tonic", "opentelemetry", "sqlx"];

pub(super) fn init_subscriber(
    logging: &LoggingConfig,
    service_name: &str,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&logging.log_level)));

    match logging.log_format {
        LogFormat::Compact => install(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
            filter,
            service_name,
            tracer_provider,
        ),
        LogFormat::Json => install(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
            filter,
            service_name,
            tracer_provider,
        ),
    }
}

fn default_directives(level: &str) -> String {
    QUIET_TARGETS
        .iter()
        .fold(level.to_owned(), |directives, target| {
            format!("{directives},{target}=warn")
        })
}

fn install<L>(
    fmt_layer: L,
    filter: EnvFilter,
    service_name: &str,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);

    match tracer_provider {
        Some(provider) => subscriber
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_owned())))
            .try_init()?,
        None => subscriber.try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_quiet_transport_and_sql_crates() {
        assert_eq!(
            default_directives("debug"),
            "debug,h2=warn,hyper=warn,tonic=warn,opentelemetry=warn,sqlx=warn"
        );
    }

    #[test]
    fn default_directives_parse_as_a_filter() {
        assert!(
            EnvFilter::try_new(default_directives("trolley_json=trace,info")).is_ok(),
            "directives should parse"
        );
    }
}
