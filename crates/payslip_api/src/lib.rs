//! Payslip REST API
//!
//! This crate provides the HTTP service around `payslip_core`. It exposes
//! `POST /getSalarySlip`, a health check and the static front end.
//!
//! # Architecture
//!
//! This crate exists in the HTTP layer and handles:
//! - Declarative routes with access checks and JSON schema validation
//! - Error mapping to a uniform JSON error response
//! - Routing, settings and server configuration
//!
//! The dependency flows: HTTP API → Business Logic, never the reverse.

pub mod access;
pub mod context;
pub mod error_handler;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod route;
pub mod router;
pub mod routes;
pub mod server;
pub mod settings;
pub mod validation;

// Re-export key types for convenience
pub use access::Principal;
pub use context::RequestContext;
pub use errors::{ApiError, ConfigurationError, ErrorKind, ErrorResponse, HandlerError};
pub use middleware::{Middleware, Next};
pub use route::{InputPart, MountedRoute, RequestMethod, Route};
pub use router::ApiRouter;
pub use server::ApiServer;
pub use settings::{Settings, SettingsError};

/// Default API port
pub const DEFAULT_PORT: u16 = 8000;
