use async_trait::async_trait;
use lapin::{options::*, publisher_confirm::Confirmation, types::FieldTable, BasicProperties, Channel};
use tracing::{debug, error, info};

use super::publisher::RecordPublisher;
use crate::contracts::{LogRecord, PublishError};

const CONTENT_TYPE: &str = "application/json";
const PERSISTENT_DELIVERY: u8 = 2;

/// Publishes records to a durable queue through the default exchange.
///
/// Obtained from `RabbitMqConnection::open_publisher`. The channel must be in
/// confirm mode (see `ChannelProvider::create_channel`),
/// otherwise the broker never acknowledges and every publish reports
/// `Confirmation::NotRequested`.
pub struct RabbitMqPublisher {
    channel: Channel,
    queue_name: String,
}

impl RabbitMqPublisher {
    pub fn new(channel: Channel, queue_name: String) -> Self {
        Self {
            channel,
            queue_name,
        }
    }

    pub async fn declare_queue(&self) -> Result<(), PublisherSetupError> {
        self.channel
            .queue_declare(
                &self.queue_name,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                error!(error = %e, queue = %self.queue_name, "Failed to declare queue");
                PublisherSetupError::DeclareFailed(e.to_string())
            })?;

        info!(queue = %self.queue_name, durable = true, "Queue declared");
        Ok(())
    }
}

#[async_trait]
impl RecordPublisher for RabbitMqPublisher {
    async fn publish(&self, record: &LogRecord) -> Result<(), PublishError> {
        let payload = record.to_json()?;

        let properties = BasicProperties::default()
            .with_content_type(CONTENT_TYPE.into())
            .with_delivery_mode(PERSISTENT_DELIVERY);

        let confirm = self
            .channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await
            .map_err(|e| PublishError::SendFailed(e.to_string()))?;

        let confirmation = confirm
            .await
            .map_err(|e| PublishError::ConfirmFailed(e.to_string()))?;

        confirmation_result(confirmation, record, &self.queue_name)?;

        debug!(
            queue = %self.queue_name,
            order_id = %record.order_id(),
            payload_size = payload.len(),
            "Broker acknowledged record"
        );
        Ok(())
    }

    fn destination(&self) -> &str {
        &self.queue_name
    }
}

/// Maps the broker's answer to a publish onto the publish outcome.
fn confirmation_result(
    confirmation: Confirmation,
    record: &LogRecord,
    queue_name: &str,
) -> Result<(), PublishError> {
    match confirmation {
        Confirmation::Ack(_) => Ok(()),
        Confirmation::Nack(_) => Err(PublishError::Rejected(format!(
            "nack for order_id {} on queue {}",
            record.order_id(),
            queue_name
        ))),
        Confirmation::NotRequested => Err(PublishError::ConfirmFailed(
            "channel is not in confirm mode".to_string(),
        )),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublisherSetupError {
    #[error("Failed to declare queue: {0}")]
    DeclareFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;

    #[test]
    fn test_ack_is_success() {
        let record = Generator::seeded(1).generate();
        assert!(confirmation_result(Confirmation::Ack(None), &record, "logs").is_ok());
    }

    #[test]
    fn test_nack_is_rejected() {
        let record = Generator::seeded(2).generate();
        let err = confirmation_result(Confirmation::Nack(None), &record, "logs").unwrap_err();

        assert_eq!(err.error_type(), "rejected");
        let reason = err.to_string();
        assert!(reason.contains(&record.order_id().to_string()));
        assert!(reason.contains("logs"));
    }

    #[test]
    fn test_unconfirmed_channel_is_confirm_failure() {
        let record = Generator::seeded(3).generate();
        let err = confirmation_result(Confirmation::NotRequested, &record, "logs").unwrap_err();

        assert!(matches!(err, PublishError::ConfirmFailed(_)));
        assert_eq!(
            err.to_string(),
            "Failed to receive broker confirmation: channel is not in confirm mode"
        );
    }
}
