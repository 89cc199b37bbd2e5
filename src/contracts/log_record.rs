use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Name of the simulated source stamped on every record.
pub const SERVICE_NAME: &str = "orders";

/// Severity of a synthetic log record.
///
/// Each severity maps to exactly one canonical message, see [`Level::message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Info, Level::Warn, Level::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Info => "Order processed successfully",
            Self::Warn => "Order processing delayed",
            Self::Error => "Order processing failed due to payment timeout",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown log level: {0}")]
pub struct ParseLevelError(String);

/// One synthesized log line of the fictitious orders service.
///
/// Records are built by the generator and never modified afterwards;
/// the wire form is a flat JSON object with string-typed fields:
///
/// ```json
/// {"timestamp":"2024-05-01T12:00:00","service":"orders","level":"WARN",
///  "message":"Order processing delayed","order_id":"5f0c..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    #[serde(with = "timestamp_format")]
    timestamp: DateTime<Utc>,
    service: &'static str,
    level: Level,
    message: &'static str,
    order_id: Uuid,
}

impl LogRecord {
    /// `timestamp` is expected to already be truncated to whole seconds.
    pub(crate) fn new(timestamp: DateTime<Utc>, level: Level, order_id: Uuid) -> Self {
        Self {
            timestamp,
            service: SERVICE_NAME,
            level,
            message: level.message(),
            order_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(timestamp_format::LAYOUT).to_string()
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub const LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(LAYOUT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(level: Level) -> LogRecord {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let id = Uuid::parse_str("9b2e4c1a-3f6d-4e8b-a1c2-7d5e6f708192").unwrap();
        LogRecord::new(ts, level, id)
    }

    #[test]
    fn test_level_messages() {
        assert_eq!(Level::Info.message(), "Order processed successfully");
        assert_eq!(Level::Warn.message(), "Order processing delayed");
        assert_eq!(
            Level::Error.message(),
            "Order processing failed due to payment timeout"
        );
    }

    #[test]
    fn test_message_lookup_by_name() {
        let message = |name: &str| name.parse::<Level>().map(|l| l.message());

        assert_eq!(message("INFO"), Ok("Order processed successfully"));
        assert_eq!(message("WARN"), Ok("Order processing delayed"));
        assert_eq!(
            message("ERROR"),
            Ok("Order processing failed due to payment timeout")
        );
        assert_eq!(message("INFO"), message("INFO"));
    }

    #[test]
    fn test_unknown_level_rejected() {
        let err = "DEBUG".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown log level: DEBUG");
        assert!("info".parse::<Level>().is_err());
    }

    #[test]
    fn test_record_message_follows_level() {
        for level in Level::ALL {
            let record = sample(level);
            assert_eq!(record.level(), level);
            assert_eq!(record.message(), level.message());
            assert_eq!(record.service(), "orders");
        }
    }

    #[test]
    fn test_wire_format() {
        let record = sample(Level::Warn);
        let json: serde_json::Value = serde_json::from_slice(&record.to_json().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "timestamp": "2024-03-09T07:05:01",
                "service": "orders",
                "level": "WARN",
                "message": "Order processing delayed",
                "order_id": "9b2e4c1a-3f6d-4e8b-a1c2-7d5e6f708192",
            })
        );
    }

    #[test]
    fn test_wire_field_order_preserved() {
        let body = String::from_utf8(sample(Level::Info).to_json().unwrap()).unwrap();
        assert!(body.starts_with(r#"{"timestamp":"2024-03-09T07:05:01","service":"orders","level":"INFO""#));
    }
}
