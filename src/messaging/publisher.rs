use async_trait::async_trait;
use std::sync::Arc;

use crate::contracts::{LogRecord, PublishError};

/// Send-and-confirm delivery of one record to a named broker channel.
///
/// `publish` must not return before the broker has acknowledged the
/// record, or before the attempt has definitively failed.
#[async_trait]
pub trait RecordPublisher: Send + Sync {
    async fn publish(&self, record: &LogRecord) -> Result<(), PublishError>;

    /// Name of the channel records are delivered to, used for logs and metric labels.
    fn destination(&self) -> &str;
}

#[async_trait]
impl<T: RecordPublisher + ?Sized> RecordPublisher for Arc<T> {
    async fn publish(&self, record: &LogRecord) -> Result<(), PublishError> {
        (**self).publish(record).await
    }

    fn destination(&self) -> &str {
        (**self).destination()
    }
}
