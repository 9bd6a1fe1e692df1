//! Tests for tax slabs and tables

use super::*;

#[test]
fn test_slab_keys() {
    let keys: Vec<&str> = TaxSlab::ALL.iter().map(|s| s.as_str()).collect();
    assert_eq!(keys, vec!["slab1", "slab2", "slab3", "slab4", "slab5"]);
    assert_eq!(TaxSlab::Slab3.to_string(), "slab3");
}

#[test]
fn test_slab_serializes_as_key() {
    let json = serde_json::to_string(&TaxSlab::Slab4).unwrap();
    assert_eq!(json, "\"slab4\"");
}

#[test]
fn test_bracket_lookup_matches_fields() {
    let table = TaxTable::default();
    assert_eq!(table.bracket(TaxSlab::Slab1), &table.slab1);
    assert_eq!(table.bracket(TaxSlab::Slab3).fix_amount, 3_572.0);
    assert_eq!(table.bracket(TaxSlab::Slab5).upper_limit, 180_000.0);
}

#[test]
fn test_table_from_toml() {
    let source = r#"
        [slab1]
        fix_amount = 0.0
        upper_limit = 0.0
        variable_rate = 0.0

        [slab2]
        fix_amount = 0.0
        upper_limit = 18200.0
        variable_rate = 0.19

        [slab3]
        fix_amount = 3572.0
        upper_limit = 37000.0
        variable_rate = 0.325

        [slab4]
        fix_amount = 19822.0
        upper_limit = 87000.0
        variable_rate = 0.37

        [slab5]
        fix_amount = 54232.0
        upper_limit = 180000.0
        variable_rate = 0.45
    "#;

    let table: TaxTable = toml::from_str(source).unwrap();
    assert_eq!(table, TaxTable::default());
}

#[test]
fn test_table_rejects_missing_slab() {
    let source = r#"
        [slab1]
        fix_amount = 0.0
        upper_limit = 0.0
        variable_rate = 0.0
    "#;

    let result = toml::from_str::<TaxTable>(source);
    assert!(result.is_err());
}
