//! Report serialization.

pub mod csv;
pub mod json;

pub use csv::CsvReporter;
pub use json::JsonReporter;

use monitor_core::{Result, TopicActivityInfo};

/// Turns one cycle's activity records into report bytes.
pub trait Reporter: Send + Sync {
    /// HTTP content type of the serialized report.
    fn content_type(&self) -> &'static str;

    /// Serializes the records in the order given.
    fn report(&self, infos: &[TopicActivityInfo]) -> Result<Vec<u8>>;
}
