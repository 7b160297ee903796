//! Core types and activity classification for the topic activity monitor.

pub mod activity;
pub mod classifier;
pub mod error;

pub use activity::TopicActivityInfo;
pub use classifier::{is_active, is_active_at};
pub use error::{Error, Result};
