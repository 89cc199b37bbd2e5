//! Synthetic log producer for a fictitious "orders" service.
//!
//! Every cycle a [`LogRecord`](contracts::LogRecord) is generated, published
//! to a RabbitMQ queue with publisher confirms, traced, and then the loop
//! pauses before the next one.

pub mod config;
pub mod contracts;
pub mod generator;
pub mod logging;
pub mod messaging;
pub mod metrics;
pub mod producer;
