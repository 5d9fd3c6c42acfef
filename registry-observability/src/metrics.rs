//! Prometheus exposition of the registry's counters, plus an optional
//! periodic push to an external collector. One `prometheus::Registry`,
//! gauges refreshed from a `registry_store::counters::Snapshot` on
//! demand, and a request counter broken down by endpoint and outcome.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use registry_store::Registry as GraphRegistry;
use std::sync::Arc;
use std::time::Duration;

pub struct Counters {
    registry: Registry,
    persons_count: IntGauge,
    machines_count: IntGauge,
    urls_count: IntGauge,
    persons_urls_count: IntGauge,
    machines_urls_count: IntGauge,
    total_accesses: IntGauge,
    persons_memory: IntGauge,
    machines_memory: IntGauge,
    urls_memory: IntGauge,
    persons_urls_memory: IntGauge,
    requests_total: IntCounterVec,
}

impl Counters {
    pub fn new() -> Self {
        let registry = Registry::new();

        macro_rules! gauge {
            ($name:literal, $help:literal) => {{
                let g = IntGauge::new($name, $help).expect("valid metric spec");
                registry.register(Box::new(g.clone())).expect("unique metric name");
                g
            }};
        }

        let requests_total = IntCounterVec::new(
            Opts::new(
                "registry_requests_total",
                "Total number of HTTP requests handled by the registry",
            ),
            &["endpoint", "status"],
        )
        .expect("valid metric spec");
        registry
            .register(Box::new(requests_total.clone()))
            .expect("unique metric name");

        Self {
            persons_count: gauge!("registry_persons_count", "Number of known persons"),
            machines_count: gauge!("registry_machines_count", "Number of known machines"),
            urls_count: gauge!("registry_urls_count", "Number of interned urls"),
            persons_urls_count: gauge!(
                "registry_persons_urls_count",
                "Number of person-to-url edges"
            ),
            machines_urls_count: gauge!(
                "registry_machines_urls_count",
                "Number of machine-to-url edges"
            ),
            total_accesses: gauge!(
                "registry_total_accesses",
                "Sum of every person's usages counter"
            ),
            persons_memory: gauge!("registry_persons_memory_bytes", "Approximate persons memory"),
            machines_memory: gauge!(
                "registry_machines_memory_bytes",
                "Approximate machines memory"
            ),
            urls_memory: gauge!("registry_urls_memory_bytes", "Approximate urls memory"),
            persons_urls_memory: gauge!(
                "registry_persons_urls_memory_bytes",
                "Approximate persons_urls memory"
            ),
            requests_total,
            registry,
        }
    }

    /// Refresh every gauge from a fresh snapshot of the graph.
    pub fn refresh(&self, store: &GraphRegistry) {
        let snap = store.snapshot();
        self.persons_count.set(snap.persons_count as i64);
        self.machines_count.set(snap.machines_count as i64);
        self.urls_count.set(snap.urls_count as i64);
        self.persons_urls_count.set(snap.persons_urls_count as i64);
        self.machines_urls_count.set(snap.machines_urls_count as i64);
        self.total_accesses.set(snap.total_accesses as i64);
        self.persons_memory.set(snap.persons_memory as i64);
        self.machines_memory.set(snap.machines_memory as i64);
        self.urls_memory.set(snap.urls_memory as i64);
        self.persons_urls_memory.set(snap.persons_urls_memory as i64);
    }

    /// Increment the per-endpoint, per-outcome request counter, e.g.
    /// `endpoint="access", status="ok"` or `endpoint="switch",
    /// status="432"`.
    pub fn record_request(&self, endpoint: &str, status: &str) {
        self.requests_total.with_label_values(&[endpoint, status]).inc();
    }

    /// Render the current state of every metric in Prometheus text
    /// exposition format, for the `/metrics` handler.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder
            .encode(&metric_families, &mut buf)
            .expect("text encoding never fails for well-formed metrics");
        String::from_utf8(buf).expect("prometheus text exposition is valid utf-8")
    }

    /// Periodically push the current exposition to an external
    /// collector. No-op unless `push_url` is set; runs until the
    /// returned task is aborted or the process exits.
    pub fn start_push_loop(
        self: Arc<Self>,
        store: Arc<GraphRegistry>,
        push_url: String,
        interval: Duration,
    ) {
        tokio::spawn(async move {
            let client = reqwest::Client::new();
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.refresh(&store);
                let body = self.gather_text();
                if let Err(err) = client
                    .post(&push_url)
                    .header("Content-Type", "text/plain; version=0.0.4")
                    .body(body)
                    .send()
                    .await
                {
                    tracing::warn!(%err, url = %push_url, "metrics push failed");
                }
            }
        });
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_store::NullSink;

    #[test]
    fn gather_text_includes_registered_metrics() {
        let counters = Counters::new();
        let store = GraphRegistry::new(Box::new(NullSink));
        store.access("", "550e8400-e29b-41d4-a716-446655440000", "http://a/", "alpha", 1000).unwrap();
        counters.refresh(&store);

        let text = counters.gather_text();
        assert!(text.contains("registry_persons_count"));
        assert!(text.contains("registry_urls_count"));
    }

    #[test]
    fn record_request_increments_counter_per_endpoint_and_status() {
        let counters = Counters::new();
        counters.record_request("access", "ok");
        counters.record_request("access", "ok");
        counters.record_request("switch", "432");
        let text = counters.gather_text();
        assert!(text.contains(r#"registry_requests_total{endpoint="access",status="ok"} 2"#));
        assert!(text.contains(r#"registry_requests_total{endpoint="switch",status="432"} 1"#));
    }
}
