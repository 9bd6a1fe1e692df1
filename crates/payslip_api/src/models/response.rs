//! HTTP response type definitions
//!
//! Response types use camelCase for JSON serialization.

use payslip_core::SalarySlip;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

/// HTTP response for a computed salary slip.
///
/// # Example
///
/// ```json
/// {
///   "salarySlip": {
///     "Name": "David Rudd",
///     "payPeriod": "1st March - 31st March",
///     "grossIncome": 5004,
///     "superIncome": 450,
///     "taxAmount": 922,
///     "netIncome": 4082
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySlipResponse {
    pub salary_slip: SalarySlip,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Service status: "healthy" or "unhealthy"
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Current timestamp (ISO 8601)
    pub timestamp: String,
}
