/// Failure of a single send-and-confirm cycle.
///
/// Every publish failure is reported through this one type, whatever the
/// underlying cause:
/// - `Serialization`: the record could not be encoded as JSON
/// - `SendFailed`: the channel refused the publish (connection lost, channel closed)
/// - `ConfirmFailed`: the connection failed while waiting for the broker confirm
/// - `Rejected`: the broker answered the publish with a nack
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to serialize log record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to send log record: {0}")]
    SendFailed(String),

    #[error("Failed to receive broker confirmation: {0}")]
    ConfirmFailed(String),

    #[error("Broker rejected log record: {0}")]
    Rejected(String),
}

impl PublishError {
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "serialization",
            Self::SendFailed(_) => "send",
            Self::ConfirmFailed(_) => "confirm",
            Self::Rejected(_) => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        assert_eq!(PublishError::SendFailed("closed".into()).error_type(), "send");
        assert_eq!(PublishError::ConfirmFailed("io".into()).error_type(), "confirm");
        assert_eq!(PublishError::Rejected("nack".into()).error_type(), "rejected");
    }

    #[test]
    fn test_serialization_error_carries_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PublishError::from(cause);
        assert_eq!(err.error_type(), "serialization");
        assert!(err.to_string().starts_with("Failed to serialize log record: "));
    }
}
