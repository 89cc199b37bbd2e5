use prometheus::{CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry};
use std::sync::Arc;

pub mod server;

pub struct Metrics {
    pub records_published_total: CounterVec,
    pub publish_failures_total: CounterVec,
    pub publish_duration_seconds: HistogramVec,
    pub producer_running: Gauge,
    pub registry: Registry,
}

impl Metrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let records_published_total = CounterVec::new(
            Opts::new(
                "producer_records_published_total",
                "Total number of log records acknowledged by the broker",
            ),
            &["queue", "level"],
        )?;

        let publish_failures_total = CounterVec::new(
            Opts::new(
                "producer_publish_failures_total",
                "Total number of log records that failed to publish",
            ),
            &["queue", "error_type"],
        )?;

        let publish_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "producer_publish_duration_seconds",
                "Time from send until broker confirmation",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["queue", "status"],
        )?;

        let producer_running = Gauge::new(
            "producer_running",
            "1 while the publish loop is running",
        )?;

        registry.register(Box::new(records_published_total.clone()))?;
        registry.register(Box::new(publish_failures_total.clone()))?;
        registry.register(Box::new(publish_duration_seconds.clone()))?;
        registry.register(Box::new(producer_running.clone()))?;

        Ok(Arc::new(Self {
            records_published_total,
            publish_failures_total,
            publish_duration_seconds,
            producer_running,
            registry,
        }))
    }
}
