//! Error types for the HTTP layer
//!
//! Two families of errors live here:
//!
//! - [`ApiError`]: a client-facing runtime error. It carries an HTTP status,
//!   a stable machine error code, a human description and optional details,
//!   and renders itself as `{errorCode, description, details}`.
//! - [`ConfigurationError`]: a programmer error raised while declaring or
//!   mounting routes. These are fatal at startup and never reach clients.
//!
//! Every request stage fails with a [`HandlerError`], which is either an
//! `ApiError` or an unexpected error that the error handler wraps as
//! `INTERNAL_ERROR`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::panic::Location;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Known API error kinds.
///
/// Each kind fixes the HTTP status, error code and description of the
/// errors created from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InternalError,
    InvalidInput,
    InvalidLogin,
    AuthenticationRequired,
    AccessDenied,
}

impl ErrorKind {
    /// HTTP status sent with errors of this kind.
    pub fn http_code(&self) -> StatusCode {
        match self {
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidInput | ErrorKind::InvalidLogin => StatusCode::BAD_REQUEST,
            ErrorKind::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
        }
    }

    /// Stable machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::InternalError => "INTERNAL_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::InvalidLogin => "INVALID_LOGIN",
            ErrorKind::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            ErrorKind::AccessDenied => "ACCESS_DENIED",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::InternalError => {
                "Something went wrong on server. Please contact server admin."
            }
            ErrorKind::InvalidInput => {
                "The request input is not as expected by API. Please provide valid input."
            }
            ErrorKind::InvalidLogin => "Login credentials do not match any registered user.",
            ErrorKind::AuthenticationRequired => {
                "Authentication is required to access this resource."
            }
            ErrorKind::AccessDenied => "You do not have access to this resource.",
        }
    }
}

/// Source location where an [`ApiError`] was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl StackFrame {
    fn from_location(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
            column: location.column(),
        }
    }

    /// Whether the frame points into this workspace rather than into a
    /// registry dependency or the standard library.
    pub fn is_application_frame(&self) -> bool {
        let file = self.file.replace('\\', "/");
        !(file.contains("/.cargo/registry/")
            || file.contains("/.cargo/git/")
            || file.starts_with("/rustc/"))
    }
}

/// Client-facing API error.
///
/// Created at the error site from an [`ErrorKind`], optionally enriched
/// with details, and rendered to a response exactly once.
///
/// # Example
///
/// ```rust,ignore
/// fn stage(ctx: &mut RequestContext) -> Result<Next, HandlerError> {
///     let salary: f64 = ctx.body_field("annual_salary")?;
///     if salary < 0.0 {
///         return Err(ApiError::invalid_input()
///             .with_details(json!({ "annual_salary": salary }))
///             .into());
///     }
///     Ok(Next::Continue)
/// }
/// ```
#[derive(Debug, Error)]
#[error("{}: {}", .kind.error_code(), .kind.description())]
pub struct ApiError {
    kind: ErrorKind,
    details: Option<Value>,
    stack_frames: Vec<StackFrame>,
}

impl ApiError {
    /// Create an error of the given kind.
    ///
    /// The caller's location is captured as the error's stack frame.
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        let stack_frames = std::iter::once(StackFrame::from_location(Location::caller()))
            .filter(StackFrame::is_application_frame)
            .collect();

        Self {
            kind,
            details: None,
            stack_frames,
        }
    }

    /// `500 INTERNAL_ERROR`
    #[track_caller]
    pub fn internal_error() -> Self {
        Self::new(ErrorKind::InternalError)
    }

    /// `400 INVALID_INPUT`
    #[track_caller]
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// `400 INVALID_LOGIN`
    #[track_caller]
    pub fn invalid_login() -> Self {
        Self::new(ErrorKind::InvalidLogin)
    }

    /// `401 AUTHENTICATION_REQUIRED`
    #[track_caller]
    pub fn authentication_required() -> Self {
        Self::new(ErrorKind::AuthenticationRequired)
    }

    /// `403 ACCESS_DENIED`
    #[track_caller]
    pub fn access_denied() -> Self {
        Self::new(ErrorKind::AccessDenied)
    }

    /// Attach structured details, replacing any previous details.
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        let details = serde_json::to_value(details).unwrap_or_else(|e| {
            json!({ "message": format!("Error details could not be serialized: {}", e) })
        });
        self.details = Some(details);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn http_code(&self) -> StatusCode {
        self.kind.http_code()
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Where the error was created. Logged, never sent to clients.
    pub fn stack_frames(&self) -> &[StackFrame] {
        &self.stack_frames
    }

    /// The body sent to clients.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_code: self.error_code().to_string(),
            description: self.description().to_string(),
            details: self.details.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.http_code(), Json(self.to_error_response())).into_response()
    }
}

/// Standard error body for all API errors.
///
/// `details` is always present and `null` when the error carries none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error_code: String,

    /// Human-readable error message
    pub description: String,

    /// Additional context (type varies by error)
    pub details: Option<Value>,
}

/// Failure of a request stage.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Client-facing error, rendered as-is.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Anything else; rendered as `INTERNAL_ERROR`.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Errors in a route declaration.
///
/// Raised while building or mounting routes at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Method must be one of: [{allowed}], got '{method}'")]
    InvalidMethod { method: String, allowed: String },

    #[error("Invalid route path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("At least one user type must be set to use permissions. Use allow_user_types() to set user types first.")]
    PermissionsWithoutUserTypes,

    #[error("Invalid {part} schema: {reason}")]
    InvalidSchema { part: String, reason: String },

    #[error("Access not configured for route {method} {path}. Use allow_user_types() and/or set_public() to do so.")]
    AccessNotConfigured { method: String, path: String },

    #[error("Route {method} {path} is already mounted")]
    DuplicateRoute { method: String, path: String },

    #[error("Route path '{path}' overlaps mounted path '{existing}'")]
    ConflictingRoute { path: String, existing: String },
}
