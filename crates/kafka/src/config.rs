//! Kafka connection configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kafka gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    /// Broker addresses (host:port)
    pub bootstrap_servers: Vec<String>,
    /// Deadline for every blocking broker call, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Deadline for fetching a single record, in milliseconds
    #[serde(default = "default_consume_timeout_ms")]
    pub consume_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_consume_timeout_ms() -> u64 {
    15_000
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: vec!["localhost:9092".to_string()],
            request_timeout_ms: default_request_timeout_ms(),
            consume_timeout_ms: default_consume_timeout_ms(),
        }
    }
}

impl KafkaConfig {
    pub fn brokers(&self) -> String {
        self.bootstrap_servers.join(",")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn consume_timeout(&self) -> Duration {
        Duration::from_millis(self.consume_timeout_ms)
    }
}
