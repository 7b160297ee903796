//! Telemetry: structured logging via tracing.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, TracingConfig};
