use std::future::Future;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::contracts::PublishError;

/// Time a stopping producer gets to finish the publish it is waiting on.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// How the producer task ended.
#[derive(Debug)]
pub enum ProducerOutcome {
    /// Stopped at a pause after the shutdown signal.
    Stopped,
    /// A publish failed; the loop treats this as fatal.
    PublishFailed(PublishError),
    /// Still publishing when the grace period ran out, the task was aborted.
    TimedOut,
    /// The task panicked or was cancelled.
    TaskFailed(String),
}

impl ProducerOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Stopped => 0,
            Self::PublishFailed(_) | Self::TimedOut | Self::TaskFailed(_) => 1,
        }
    }
}

/// Waits for the producer task to end on its own, or for `stop` to fire.
///
/// On `stop` the shutdown signal is raised and the task gets `grace` to
/// return; past that it is aborted. Either way the task is finished when
/// this returns, so the caller can release the broker connection.
pub async fn supervise<S>(
    mut handle: JoinHandle<Result<(), PublishError>>,
    stop: S,
    shutdown: &Notify,
    grace: Duration,
) -> ProducerOutcome
where
    S: Future<Output = ()>,
{
    let joined = tokio::select! {
        joined = &mut handle => joined,
        _ = stop => {
            warn!("Shutdown signal received, stopping producer");
            shutdown.notify_one();

            match tokio::time::timeout(grace, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(grace_ms = grace.as_millis() as u64, "Producer did not stop in time, aborting");
                    handle.abort();
                    let _ = handle.await;
                    return ProducerOutcome::TimedOut;
                }
            }
        }
    };

    match joined {
        Ok(Ok(())) => ProducerOutcome::Stopped,
        Ok(Err(e)) => ProducerOutcome::PublishFailed(e),
        Err(e) => ProducerOutcome::TaskFailed(e.to_string()),
    }
}
