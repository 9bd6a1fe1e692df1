//! Tests for calculation error types.

use super::*;

#[test]
fn test_negative_salary_message() {
    let error = CalculationError::NegativeSalary { salary: -1.5 };
    assert_eq!(error.to_string(), "Annual salary must not be negative: -1.5");
}

#[test]
fn test_non_finite_amount_message() {
    let error = CalculationError::NonFiniteAmount {
        field: "super_rate".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Amount for 'super_rate' is not a finite number"
    );
}
