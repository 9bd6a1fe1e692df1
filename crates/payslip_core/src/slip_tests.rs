//! Tests for salary slip composition

use super::*;

#[test]
fn test_full_name_joins_first_and_last_name() {
    let details = SalaryDetails {
        first_name: "David".to_string(),
        last_name: "Rudd".to_string(),
        super_rate: 9.0,
        annual_salary: 60_050.0,
        pay_start_date: "1st March - 31st March".to_string(),
    };

    assert_eq!(details.full_name(), "David Rudd");
}

#[test]
fn test_slip_serializes_with_client_field_names() {
    let slip = SalarySlip {
        name: "David Rudd".to_string(),
        pay_period: "1st March - 31st March".to_string(),
        gross_income: 10_000,
        super_income: 1_000,
        tax_amount: 2_669,
        net_income: 7_331,
    };
    let json = serde_json::to_value(&slip).unwrap();

    assert_eq!(json["Name"], "David Rudd");
    assert_eq!(json["payPeriod"], "1st March - 31st March");
    assert_eq!(json["grossIncome"], 10_000);
    assert_eq!(json["superIncome"], 1_000);
    assert_eq!(json["taxAmount"], 2_669);
    assert_eq!(json["netIncome"], 7_331);
    assert_eq!(json.as_object().unwrap().len(), 6);
}

#[test]
fn test_details_deserialize_from_request_json() {
    let json = r#"{
        "first_name": "A",
        "last_name": "B",
        "super_rate": 10,
        "annual_salary": 50000,
        "pay_start_date": "x"
    }"#;

    let parsed: SalaryDetails = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.full_name(), "A B");
    assert_eq!(parsed.annual_salary, 50_000.0);
}
