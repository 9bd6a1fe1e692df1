//! Salary details and slips.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "slip_tests.rs"]
mod tests;

/// Salary details submitted by an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryDetails {
    pub first_name: String,
    pub last_name: String,

    /// Superannuation rate in percent
    pub super_rate: f64,

    pub annual_salary: f64,

    /// Free-form pay period label, e.g. "1st March - 31st March"
    pub pay_start_date: String,
}

impl SalaryDetails {
    /// Display name on the slip: first and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Monthly salary slip.
///
/// Field names match the JSON shape returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySlip {
    #[serde(rename = "Name")]
    pub name: String,
    pub pay_period: String,
    pub gross_income: i64,
    pub super_income: i64,
    pub tax_amount: i64,
    pub net_income: i64,
}
