use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Notify};
use tracing::{debug, error, info};

use crate::contracts::{LogRecord, PublishError};
use crate::generator::Generator;
use crate::messaging::RecordPublisher;
use crate::metrics::Metrics;

pub mod supervisor;

pub use supervisor::{supervise, ProducerOutcome};

/// Pause between two publish cycles.
pub const PUBLISH_INTERVAL: Duration = Duration::from_secs(2);

/// Target of the per-cycle "Produced log" event. The logging filter keeps it
/// at `info` whatever `RUST_LOG` says.
pub const RECORD_TRACE_TARGET: &str = "orders_log_producer::records";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    /// Between cycles, including the pause.
    Idle,
    /// A record has been handed to the publisher and the confirm is pending.
    Publishing,
}

/// Generate-then-publish loop.
///
/// One record per cycle, strictly sequential: the next record is only
/// generated after the previous one was acknowledged. A publish error is
/// returned to the caller as is and ends the loop. The shutdown signal is
/// checked during the pause between cycles; a notification that arrives
/// while a publish is in flight is kept by `Notify` and ends the loop at
/// the following pause.
pub struct LogProducer<P, R = StdRng> {
    publisher: P,
    generator: Generator<R>,
    shutdown: Arc<Notify>,
    metrics: Arc<Metrics>,
    interval: Duration,
    state: watch::Sender<ProducerState>,
}

impl<P, R> LogProducer<P, R>
where
    P: RecordPublisher,
    R: Rng,
{
    pub fn new(
        publisher: P,
        generator: Generator<R>,
        shutdown: Arc<Notify>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            publisher,
            generator,
            shutdown,
            metrics,
            interval: PUBLISH_INTERVAL,
            state: watch::channel(ProducerState::Idle).0,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> ProducerState {
        *self.state.borrow()
    }

    /// Follows state transitions while the loop runs elsewhere.
    pub fn subscribe_state(&self) -> watch::Receiver<ProducerState> {
        self.state.subscribe()
    }

    pub fn into_publisher(self) -> P {
        self.publisher
    }

    /// Runs until the shutdown signal fires or a publish fails.
    pub async fn run(&mut self) -> Result<(), PublishError> {
        self.drive(None).await
    }

    /// Runs exactly `cycles` cycles unless stopped earlier. There is no
    /// pause after the last cycle.
    pub async fn run_for(&mut self, cycles: u64) -> Result<(), PublishError> {
        self.drive(Some(cycles)).await
    }

    async fn drive(&mut self, limit: Option<u64>) -> Result<(), PublishError> {
        info!(
            destination = %self.publisher.destination(),
            interval_ms = self.interval.as_millis() as u64,
            cycles = ?limit,
            "Starting log producer"
        );

        self.metrics.producer_running.set(1.0);
        let result = self.cycles(limit).await;
        self.metrics.producer_running.set(0.0);

        match &result {
            Ok(completed) => info!(completed, "Log producer stopped"),
            Err(e) => error!(error = %e, error_type = e.error_type(), "Log producer aborted"),
        }

        result.map(|_| ())
    }

    async fn cycles(&mut self, limit: Option<u64>) -> Result<u64, PublishError> {
        let mut completed = 0u64;

        while limit.is_none_or(|n| completed < n) {
            if completed > 0 {
                tokio::select! {
                    _ = self.shutdown.notified() => {
                        info!(completed, "Shutdown signal received, stopping producer");
                        break;
                    }
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }

            self.cycle().await?;
            completed += 1;
        }

        Ok(completed)
    }

    async fn cycle(&mut self) -> Result<(), PublishError> {
        self.state.send_replace(ProducerState::Publishing);
        let record = self.generator.generate();
        debug!(order_id = %record.order_id(), "Publishing record");

        let start = Instant::now();
        let result = self.publisher.publish(&record).await;
        let duration = start.elapsed().as_secs_f64();
        self.state.send_replace(ProducerState::Idle);

        let queue = self.publisher.destination();
        match result {
            Ok(()) => {
                self.metrics
                    .records_published_total
                    .with_label_values(&[queue, record.level().as_str()])
                    .inc();
                self.metrics
                    .publish_duration_seconds
                    .with_label_values(&[queue, "success"])
                    .observe(duration);

                trace_record(&record, duration);
                Ok(())
            }
            Err(e) => {
                self.metrics
                    .publish_failures_total
                    .with_label_values(&[queue, e.error_type()])
                    .inc();
                self.metrics
                    .publish_duration_seconds
                    .with_label_values(&[queue, "error"])
                    .observe(duration);

                error!(
                    error = %e,
                    queue,
                    order_id = %record.order_id(),
                    "Failed to publish log record"
                );
                Err(e)
            }
        }
    }
}

fn trace_record(record: &LogRecord, duration: f64) {
    info!(
        target: RECORD_TRACE_TARGET,
        timestamp = %record.formatted_timestamp(),
        service = record.service(),
        level = %record.level(),
        message = record.message(),
        order_id = %record.order_id(),
        duration_ms = duration * 1000.0,
        "Produced log"
    );
}
