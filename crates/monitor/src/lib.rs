//! Activity probing and report coordination for the topic activity monitor.

pub mod coordinator;
pub mod probe;
pub mod report;

pub use coordinator::{ReportCoordinator, ReportHandle};
pub use probe::probe_topic;
pub use report::{CsvReporter, JsonReporter, Reporter};

#[cfg(test)]
mod testutil;
