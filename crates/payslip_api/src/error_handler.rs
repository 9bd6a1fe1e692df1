//! Terminal error handling for route chains
//!
//! Every failure of a route stage ends up here. This is the single place
//! that turns an error into a client-safe JSON response.

use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::errors::{ApiError, HandlerError};

#[cfg(test)]
#[path = "error_handler_tests.rs"]
mod tests;

/// Convert a stage failure into the response sent to the client.
///
/// If a stage already began sending `begun_response`, its status and
/// headers can no longer change: that response is returned untouched and
/// the error is only logged.
///
/// Errors that are not [`ApiError`]s are reported as `INTERNAL_ERROR`
/// with a description of the failure as details.
pub fn handle_error(error: HandlerError, begun_response: Option<Response>) -> Response {
    log_error(&error);

    if let Some(response) = begun_response {
        tracing::warn!("Response already started. Cannot respond with error.");
        return response;
    }

    match error {
        HandlerError::Api(api_error) => api_error.into_response(),
        HandlerError::Unexpected(other) => ApiError::internal_error()
            .with_details(inspect_details(&other))
            .into_response(),
    }
}

/// Describe an unexpected error for the details of an internal error.
fn inspect_details(error: &anyhow::Error) -> Value {
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    json!({
        "message": error.to_string(),
        "causes": causes,
    })
}

/// Log error with appropriate level based on HTTP status
fn log_error(error: &HandlerError) {
    match error {
        HandlerError::Api(api_error) if api_error.http_code().is_server_error() => {
            tracing::error!(
                error_code = api_error.error_code(),
                details = ?api_error.details(),
                frames = ?api_error.stack_frames(),
                "API error"
            );
        }
        HandlerError::Api(api_error) => {
            tracing::warn!(
                error_code = api_error.error_code(),
                details = ?api_error.details(),
                frames = ?api_error.stack_frames(),
                "API error"
            );
        }
        HandlerError::Unexpected(other) => {
            tracing::error!(error = ?other, "Unexpected error while handling request");
        }
    }
}
