use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const MATCH_REQUESTS_TOTAL: &str = "sm_match_requests_total";
pub const CANDIDATES_SCORED_TOTAL: &str = "sm_candidates_scored_total";
pub const CANDIDATES_SKIPPED_TOTAL: &str = "sm_candidates_skipped_total";
pub const RANKING_DURATION_SECONDS: &str = "sm_ranking_duration_seconds";

/// Start the Prometheus exporter on `0.0.0.0:<port>`. The caller owns port
/// resolution (CLI flag or environment).
///
/// Only the first successful call installs the recorder; later calls return
/// the existing handle. Until then the recording helpers below are no-ops.
pub fn init_metrics(port: u16) -> Option<&'static PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing);
    }

    match PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install_recorder()
    {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            info!(metrics_port = port, "started prometheus exporter");
        }
        Err(err) => {
            warn!(error = %err, metrics_port = port, "failed to start prometheus exporter");
        }
    }

    PROMETHEUS_HANDLE.get()
}

/// Record one completed ranking call for `endpoint`.
pub fn record_ranking(endpoint: &'static str, scored: usize, skipped: usize, elapsed: Duration) {
    metrics::counter!(MATCH_REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
    metrics::counter!(CANDIDATES_SCORED_TOTAL, "endpoint" => endpoint).increment(scored as u64);
    if skipped > 0 {
        metrics::counter!(CANDIDATES_SKIPPED_TOTAL, "endpoint" => endpoint)
            .increment(skipped as u64);
    }
    metrics::histogram!(RANKING_DURATION_SECONDS, "endpoint" => endpoint)
        .record(elapsed.as_secs_f64());
}
