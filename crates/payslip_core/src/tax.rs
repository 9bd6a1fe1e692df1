//! Tax slabs and per-slab tax constants.
//!
//! A [`TaxTable`] supplies one [`TaxBracket`] for every [`TaxSlab`]. The
//! constants are configuration, not code: the server loads them from its
//! settings file and falls back to [`TaxTable::default`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "tax_tests.rs"]
mod tests;

/// Tax slab selected by annual salary range.
///
/// See [`crate::calculation::tax_slab`] for the ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxSlab {
    Slab1,
    Slab2,
    Slab3,
    Slab4,
    Slab5,
}

impl TaxSlab {
    /// All slabs in ascending salary order.
    pub const ALL: [TaxSlab; 5] = [
        TaxSlab::Slab1,
        TaxSlab::Slab2,
        TaxSlab::Slab3,
        TaxSlab::Slab4,
        TaxSlab::Slab5,
    ];

    /// Configuration key of this slab.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxSlab::Slab1 => "slab1",
            TaxSlab::Slab2 => "slab2",
            TaxSlab::Slab3 => "slab3",
            TaxSlab::Slab4 => "slab4",
            TaxSlab::Slab5 => "slab5",
        }
    }
}

impl fmt::Display for TaxSlab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constants used to compute the income tax within one slab.
///
/// `upper_limit` is the upper bound of the previous slab, i.e. the amount
/// above which `variable_rate` applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Fixed annual tax owed on everything up to `upper_limit`
    pub fix_amount: f64,

    /// Salary above which the variable rate is charged
    pub upper_limit: f64,

    /// Marginal rate as a fraction (0.325 for 32.5c per dollar)
    pub variable_rate: f64,
}

impl TaxBracket {
    /// Create a new bracket.
    pub fn new(fix_amount: f64, upper_limit: f64, variable_rate: f64) -> Self {
        Self {
            fix_amount,
            upper_limit,
            variable_rate,
        }
    }
}

/// Per-slab tax constants keyed by slab identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxTable {
    pub slab1: TaxBracket,
    pub slab2: TaxBracket,
    pub slab3: TaxBracket,
    pub slab4: TaxBracket,
    pub slab5: TaxBracket,
}

impl TaxTable {
    /// Look up the constants for a slab.
    pub fn bracket(&self, slab: TaxSlab) -> &TaxBracket {
        match slab {
            TaxSlab::Slab1 => &self.slab1,
            TaxSlab::Slab2 => &self.slab2,
            TaxSlab::Slab3 => &self.slab3,
            TaxSlab::Slab4 => &self.slab4,
            TaxSlab::Slab5 => &self.slab5,
        }
    }
}

impl Default for TaxTable {
    /// Resident income tax rates for the 2012-13 financial year.
    fn default() -> Self {
        Self {
            slab1: TaxBracket::new(0.0, 0.0, 0.0),
            slab2: TaxBracket::new(0.0, 18_200.0, 0.19),
            slab3: TaxBracket::new(3_572.0, 37_000.0, 0.325),
            slab4: TaxBracket::new(19_822.0, 87_000.0, 0.37),
            slab5: TaxBracket::new(54_232.0, 180_000.0, 0.45),
        }
    }
}
