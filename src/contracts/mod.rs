pub mod log_record;
pub mod publish_error;

pub use log_record::{Level, LogRecord, ParseLevelError, SERVICE_NAME};
pub use publish_error::PublishError;
