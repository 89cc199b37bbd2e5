pub mod channel;
pub mod connection;
pub mod publisher;
pub mod rabbitmq_publisher;

pub use channel::{ChannelError, ChannelProvider};
pub use connection::{ConnectionError, RabbitMqConnection};
pub use publisher::RecordPublisher;
pub use rabbitmq_publisher::{PublisherSetupError, RabbitMqPublisher};
