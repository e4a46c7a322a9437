use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

pub fn setup_metrics_recorder() -> PrometheusHandle {
    const EXPONENTIAL_SECONDS: &[f64] = &[
        0.000005, 0.00001, 0.000025, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005,
    ];

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("page_render_time".to_string()),
            EXPONENTIAL_SECONDS,
        )
        .unwrap()
        .install_recorder()
        .unwrap()
}

#[derive(Clone)]
pub struct Metrics {
    pub prometheus_handle: PrometheusHandle,
}

impl Metrics {
    pub fn new(prometheus_handle: PrometheusHandle) -> Self {
        Self { prometheus_handle }
    }

    /// This function records the number of pages rendered.
    /// It increments the counter by 1.
    pub fn record_page_rendered(&self) {
        metrics::increment_counter!("pages_rendered_total");
    }

    /// This function records the time taken to render a page.
    /// It records the duration in seconds.
    pub fn record_render_time(&self, duration: Duration) {
        metrics::histogram!("page_render_time", duration.as_secs_f64());
    }

    /// This function records requests that matched no route.
    /// It increments the counter by 1.
    pub fn record_not_found(&self) {
        metrics::increment_counter!("not_found_total");
    }
}
