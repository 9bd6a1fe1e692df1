//! HTTP request schemas
//!
//! Request bodies are validated against JSON schemas before any handler
//! stage reads them, then deserialized into the domain types of
//! `payslip_core`.

use serde_json::{json, Value};

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// Schema of the `POST /getSalarySlip` body.
///
/// # Example
///
/// ```json
/// {
///   "first_name": "David",
///   "last_name": "Rudd",
///   "super_rate": 9,
///   "annual_salary": 60050,
///   "pay_start_date": "1st March - 31st March"
/// }
/// ```
///
/// All five fields are required. Other properties are rejected.
pub fn salary_details_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "first_name": { "type": "string" },
            "last_name": { "type": "string" },
            "super_rate": { "type": "number" },
            "annual_salary": { "type": "number" },
            "pay_start_date": { "type": "string" }
        },
        "required": ["first_name", "last_name", "super_rate", "annual_salary", "pay_start_date"]
    })
}
