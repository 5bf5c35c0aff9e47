use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::models::ApprovalStatus;

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {e}"))?;

    register_metrics();

    Ok(handle)
}

/// Pre-register counters so they appear even before the first increment.
fn register_metrics() {
    counter!("recommendations_generated_total").absolute(0);
    counter!("recommendations_failed_total").absolute(0);
    counter!("macro_fallbacks_total").absolute(0);
    for status in [ApprovalStatus::Approved, ApprovalStatus::Rejected] {
        counter!("approvals_total", "decision" => status.as_str()).absolute(0);
    }
    counter!("macro_refreshes_total").absolute(0);

    histogram!("recommendation_latency_seconds").record(0.0);
}
