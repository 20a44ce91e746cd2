use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(logging.level).into())
        .from_env_lossy();

    // Rendered fragments and record JSON go to stdout; keep diagnostics
    // on stderr so piped output stays clean.
    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "girder_client_retry_total",
            Unit::Count,
            "Total number of API request attempts retried after a retryable failure."
        );
        describe_counter!(
            "girder_client_auth_refresh_total",
            Unit::Count,
            "Total number of bearer-token refreshes performed by the API client."
        );
        describe_counter!(
            "girder_client_session_expired_total",
            Unit::Count,
            "Total number of calls that terminated with an expired session."
        );
        describe_counter!(
            "girder_render_fallback_total",
            Unit::Count,
            "Total number of renders that degraded to the escaped fallback block."
        );
    });
}
