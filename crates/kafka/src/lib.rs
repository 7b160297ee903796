//! Broker access for the topic activity monitor.
//!
//! The [`BrokerGateway`] trait is the seam between probing logic and the
//! Kafka client; [`KafkaGateway`] is the production implementation over
//! librdkafka.

pub mod client;
pub mod config;
pub mod gateway;

pub use client::KafkaGateway;
pub use config::KafkaConfig;
pub use gateway::{BrokerGateway, CommittedOffset, ConsumedRecord, OffsetPosition};
