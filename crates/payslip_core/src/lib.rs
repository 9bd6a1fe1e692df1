//! Payslip core calculations
//!
//! This crate contains the business logic for computing a monthly salary
//! slip: tax slab selection, gross income, superannuation, income tax and
//! net income. It has no knowledge of HTTP.
//!
//! # Architecture
//!
//! - [`calculation`] holds the pure arithmetic functions
//! - [`tax`] holds the tax slab identifiers and the per-slab constants
//! - [`slip`] holds the request details and the [`SalarySlip`] they produce
//!
//! The dependency flows: HTTP API → Business Logic, never the reverse.

pub mod calculation;
pub mod errors;
pub mod slip;
pub mod tax;

pub use calculation::{gross_income, income_tax, net_income, super_income, tax_slab};
pub use errors::{CalculationError, CalculationResult};
pub use slip::{SalaryDetails, SalarySlip};
pub use tax::{TaxBracket, TaxSlab, TaxTable};
