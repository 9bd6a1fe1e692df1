//! Salary calculations
//!
//! Pure, stateless functions used to build a salary slip. All monetary
//! results are rounded to the nearest whole dollar, halves away from zero.

use crate::{
    errors::{CalculationError, CalculationResult},
    tax::{TaxBracket, TaxSlab},
};

#[cfg(test)]
#[path = "calculation_tests.rs"]
mod tests;

const SLAB1_MAX: f64 = 18_200.0;
const SLAB2_MAX: f64 = 37_000.0;
const SLAB3_MAX: f64 = 87_000.0;
const SLAB4_MAX: f64 = 180_000.0;

/// Select the tax slab for an annual salary.
///
/// | Annual salary        | Slab  |
/// |----------------------|-------|
/// | 0 – 18,200           | slab1 |
/// | 18,201 – 37,000      | slab2 |
/// | 37,001 – 87,000      | slab3 |
/// | 87,001 – 180,000     | slab4 |
/// | 180,001 and over     | slab5 |
///
/// Fractional salaries between two whole-dollar boundaries belong to the
/// higher slab.
///
/// # Errors
///
/// Returns `CalculationError::NegativeSalary` for salaries below zero and
/// `CalculationError::NonFiniteAmount` for NaN or infinite input.
pub fn tax_slab(annual_salary: f64) -> CalculationResult<TaxSlab> {
    ensure_finite("annual_salary", annual_salary)?;
    if annual_salary < 0.0 {
        return Err(CalculationError::NegativeSalary {
            salary: annual_salary,
        });
    }

    let slab = if annual_salary <= SLAB1_MAX {
        TaxSlab::Slab1
    } else if annual_salary <= SLAB2_MAX {
        TaxSlab::Slab2
    } else if annual_salary <= SLAB3_MAX {
        TaxSlab::Slab3
    } else if annual_salary <= SLAB4_MAX {
        TaxSlab::Slab4
    } else {
        TaxSlab::Slab5
    };

    Ok(slab)
}

/// Monthly gross income: `round(annual_salary / 12)`.
pub fn gross_income(annual_salary: f64) -> i64 {
    round_amount(annual_salary / 12.0)
}

/// Monthly superannuation: `round(gross * super_rate / 100)`.
///
/// `super_rate_percent` is a percentage, e.g. `9.5` for 9.5%.
pub fn super_income(gross_income: i64, super_rate_percent: f64) -> i64 {
    round_amount(gross_income as f64 * super_rate_percent / 100.0)
}

/// Monthly income tax for an annual salary within `bracket`.
///
/// `round((fix_amount + (annual_salary - upper_limit) * variable_rate) / 12)`
pub fn income_tax(annual_salary: f64, bracket: &TaxBracket) -> i64 {
    let annual_tax =
        bracket.fix_amount + (annual_salary - bracket.upper_limit) * bracket.variable_rate;
    round_amount(annual_tax / 12.0)
}

/// Net income: `income - tax`. Both inputs are already whole dollars.
///
/// Both figures must be expressed over the same period. The salary slip
/// passes the monthly gross income and the monthly tax.
pub fn net_income(income: i64, tax: i64) -> i64 {
    income - tax
}

fn round_amount(amount: f64) -> i64 {
    amount.round() as i64
}

pub(crate) fn ensure_finite(field: &str, amount: f64) -> CalculationResult<()> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(CalculationError::NonFiniteAmount {
            field: field.to_string(),
        })
    }
}
