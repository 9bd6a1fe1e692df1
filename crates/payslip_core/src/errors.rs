//! Calculation error types.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors produced by the salary calculations.
///
/// These are input problems: every calculation is otherwise total.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Annual salary must not be negative: {salary}")]
    NegativeSalary { salary: f64 },

    #[error("Amount for '{field}' is not a finite number")]
    NonFiniteAmount { field: String },
}

/// Result type alias for calculation operations.
pub type CalculationResult<T> = Result<T, CalculationError>;
