//! HTTP API layer for the topic activity monitor.

pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
