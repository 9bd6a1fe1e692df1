//! HTTP request and response models
//!
//! This module contains the HTTP-specific types for requests and responses.
//! Domain types live in `payslip_core`.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::salary_details_schema;
pub use response::{HealthCheckResponse, SalarySlipResponse};
