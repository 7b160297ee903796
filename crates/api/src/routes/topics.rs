//! The report endpoint.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use monitor_core::Error;
use tracing::error;

use crate::state::AppState;

/// GET /topics - Computes a fresh activity report and returns it.
///
/// The call blocks for the full report cycle; callers queue behind each
/// other because the coordinator services one request at a time. A failed
/// cycle returns an empty body so clients can tell it apart from an empty
/// report (which still carries a CSV header or a JSON array).
pub async fn topics_handler(State(state): State<AppState>) -> Response {
    match state.reports.request_report().await {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, state.reports.content_type())],
            body,
        )
            .into_response(),
        Err(Error::WorkerGone) => {
            error!("Report coordinator is gone");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
        Err(e) => {
            error!(error = %e, "Report request failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
