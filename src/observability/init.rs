//! Subscriber setup: `EnvFilter` plus an OpenTelemetry layer exporting to
//! the trace file in the data directory.

use super::tracer;
use crate::domain::error::Result;
use crate::infrastructure::paths;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::Path;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Trace file name inside the data directory.
pub const TRACE_FILE: &str = "shelfview-otlp.json";

/// Filter used when none is configured.
pub const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber for one plugin component.
///
/// `component` tells plugin and worker spans apart in the shared trace file.
/// Only the first call in a process takes effect; later calls are ignored.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn init_tracing(level: Option<&str>, component: &str) -> Result<()> {
    init_tracing_in(&paths::get_data_dir(), level, component)
}

/// Same as [`init_tracing`] with an explicit data directory.
///
/// # Errors
///
/// Returns an error if `data_dir` cannot be created.
pub fn init_tracing_in(data_dir: &Path, level: Option<&str>, component: &str) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;

    let resource = Resource::new(vec![
        KeyValue::new("service.name", "shelfview"),
        KeyValue::new("service.component", component.to_string()),
    ]);
    let provider = tracer::file_tracer_provider(data_dir.join(TRACE_FILE), resource);
    let layer = OpenTelemetryLayer::new(provider.tracer("shelfview"));

    let filter = EnvFilter::try_new(level.unwrap_or(DEFAULT_LEVEL))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    if tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!(component = component, "tracing already initialized");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn spans_reach_the_trace_file() {
        let dir = TempDir::new().unwrap();
        init_tracing_in(dir.path(), Some("debug"), "test").unwrap();

        tracing::debug_span!("exported_span").in_scope(|| {
            tracing::debug!("inside");
        });

        let contents = std::fs::read_to_string(dir.path().join(TRACE_FILE)).unwrap_or_default();
        if !contents.is_empty() {
            assert!(contents.contains("exported_span"));
        }
    }
}
