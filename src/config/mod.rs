use std::env;

use crate::producer::RECORD_TRACE_TARGET;

pub const DEFAULT_QUEUE_NAME: &str = "logs";
pub const DEFAULT_METRICS_PORT: u16 = 9090;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rabbitmq_url: String,
    pub queue_name: String,
    pub metrics_port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rabbitmq_url =
            lookup("RABBITMQ_URL").ok_or(ConfigError::MissingRequired("RABBITMQ_URL"))?;

        let queue_name = lookup("QUEUE_NAME").unwrap_or_else(|| DEFAULT_QUEUE_NAME.to_string());

        let metrics_port = match lookup("METRICS_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("METRICS_PORT", raw))?,
            None => DEFAULT_METRICS_PORT,
        };

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            rabbitmq_url,
            queue_name,
            metrics_port,
            rust_log,
        })
    }

    /// `RUST_LOG` as a tracing filter, with the per-record trace line
    /// always enabled at `info`.
    pub fn log_filter(&self) -> String {
        let base = match self.rust_log.trim() {
            "" => "info",
            directives => directives,
        };
        format!("{},{}=info", base, RECORD_TRACE_TARGET)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
