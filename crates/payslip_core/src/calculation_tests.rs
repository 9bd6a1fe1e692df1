//! Tests for salary calculations

use super::*;
use crate::tax::TaxTable;

#[test]
fn test_tax_slab_boundaries() {
    let cases = [
        (0.0, TaxSlab::Slab1),
        (18_200.0, TaxSlab::Slab1),
        (18_201.0, TaxSlab::Slab2),
        (37_000.0, TaxSlab::Slab2),
        (37_001.0, TaxSlab::Slab3),
        (87_000.0, TaxSlab::Slab3),
        (87_001.0, TaxSlab::Slab4),
        (180_000.0, TaxSlab::Slab4),
        (180_001.0, TaxSlab::Slab5),
        (1_000_000.0, TaxSlab::Slab5),
    ];

    for (salary, expected) in cases {
        assert_eq!(tax_slab(salary).unwrap(), expected, "salary {}", salary);
    }
}

#[test]
fn test_tax_slab_fractional_salary_uses_higher_slab() {
    assert_eq!(tax_slab(18_200.5).unwrap(), TaxSlab::Slab2);
    assert_eq!(tax_slab(180_000.01).unwrap(), TaxSlab::Slab5);
}

#[test]
fn test_tax_slab_rejects_negative_salary() {
    let result = tax_slab(-1.0);
    assert_eq!(
        result,
        Err(CalculationError::NegativeSalary { salary: -1.0 })
    );
}

#[test]
fn test_tax_slab_rejects_non_finite_salary() {
    assert!(matches!(
        tax_slab(f64::NAN),
        Err(CalculationError::NonFiniteAmount { .. })
    ));
    assert!(matches!(
        tax_slab(f64::INFINITY),
        Err(CalculationError::NonFiniteAmount { .. })
    ));
}

#[test]
fn test_gross_income_rounds_to_nearest() {
    assert_eq!(gross_income(50_000.0), 4_167);
    assert_eq!(gross_income(60_050.0), 5_004);
    assert_eq!(gross_income(120_000.0), 10_000);
    // 6 / 12 = 0.5 rounds away from zero
    assert_eq!(gross_income(6.0), 1);
}

#[test]
fn test_super_income() {
    assert_eq!(super_income(5_004, 9.0), 450);
    assert_eq!(super_income(10_000, 10.0), 1_000);
    assert_eq!(super_income(4_167, 0.0), 0);
}

#[test]
fn test_income_tax_per_slab() {
    let table = TaxTable::default();

    assert_eq!(income_tax(18_000.0, table.bracket(TaxSlab::Slab1)), 0);
    assert_eq!(income_tax(60_050.0, table.bracket(TaxSlab::Slab3)), 922);
    assert_eq!(income_tax(120_000.0, table.bracket(TaxSlab::Slab4)), 2_669);
    assert_eq!(income_tax(50_000.0, table.bracket(TaxSlab::Slab3)), 650);
}

#[test]
fn test_net_income() {
    assert_eq!(net_income(5_004, 922), 4_082);
    assert_eq!(net_income(10_000, 2_669), 7_331);
}
