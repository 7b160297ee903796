//! Application state shared across handlers.

use monitor::ReportHandle;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Rendezvous handle into the report coordinator.
    pub reports: ReportHandle,
}

impl AppState {
    pub fn new(reports: ReportHandle) -> Self {
        Self { reports }
    }
}
