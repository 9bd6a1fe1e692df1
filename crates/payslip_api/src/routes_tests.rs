//! Tests for routes module

use super::*;
use crate::route::{RequestMethod, StageKind};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

fn router() -> Router {
    api_router(Arc::new(TaxTable::default())).unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn salary_slip_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/getSalarySlip")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn salary_details(annual_salary: Value, super_rate: Value) -> Value {
    json!({
        "first_name": "David",
        "last_name": "Rudd",
        "annual_salary": annual_salary,
        "super_rate": super_rate,
        "pay_start_date": "1st March - 31st March"
    })
}

#[test]
fn test_router_creation() {
    let settings = Settings::default();
    assert!(create_router(&settings).is_ok());
}

#[test]
fn test_salary_slip_route_declaration() {
    let route = salary_slip_route(Arc::new(TaxTable::default())).unwrap();

    assert_eq!(route.method(), RequestMethod::Post);
    assert_eq!(route.path(), "/getSalarySlip");
    assert!(route.is_public());
    assert_eq!(route.middleware_count(), 5);

    let mounted = route.compile().unwrap();
    assert_eq!(mounted.stage_kinds()[0], StageKind::Validation(crate::route::InputPart::Body));
    assert_eq!(mounted.stage_kinds().len(), 6);
}

#[tokio::test]
async fn test_get_salary_slip() {
    let request = salary_slip_request(json!({
        "first_name": "A",
        "last_name": "B",
        "super_rate": 10,
        "annual_salary": 50000,
        "pay_start_date": "x"
    }));

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "salarySlip": {
                "Name": "A B",
                "payPeriod": "x",
                "grossIncome": 4167,
                "superIncome": 417,
                "taxAmount": 650,
                "netIncome": 3517
            }
        })
    );
}

#[tokio::test]
async fn test_get_salary_slip_reference_employee() {
    let request = salary_slip_request(salary_details(json!(60050), json!(9)));

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    let slip = &body["salarySlip"];
    assert_eq!(slip["Name"], "David Rudd");
    assert_eq!(slip["payPeriod"], "1st March - 31st March");
    assert_eq!(slip["grossIncome"], 5004);
    assert_eq!(slip["superIncome"], 450);
    assert_eq!(slip["taxAmount"], 922);
    assert_eq!(slip["netIncome"], 4082);
}

#[tokio::test]
async fn test_get_salary_slip_high_earner() {
    let request = salary_slip_request(salary_details(json!(200000), json!(12.5)));

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    let slip = &body["salarySlip"];
    // (54232 + 20000 * 0.45) / 12 = 5269.33
    assert_eq!(slip["grossIncome"], 16667);
    assert_eq!(slip["superIncome"], 2083);
    assert_eq!(slip["taxAmount"], 5269);
    assert_eq!(slip["netIncome"], 11398);
}

#[tokio::test]
async fn test_get_salary_slip_missing_field() {
    let mut details = salary_details(json!(60050), json!(9));
    details.as_object_mut().unwrap().remove("annual_salary");

    let (status, body) = send(router(), salary_slip_request(details)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_INPUT");
    assert_eq!(body["details"]["valid"], false);
    assert_eq!(body["details"]["part"], "body");

    let serialized = body.to_string();
    assert!(!serialized.contains("stackFrames"));
    assert!(!serialized.contains("schemaPath"));
}

#[tokio::test]
async fn test_get_salary_slip_wrong_type() {
    let request = salary_slip_request(salary_details(json!("60050"), json!(9)));

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_get_salary_slip_negative_salary() {
    let request = salary_slip_request(salary_details(json!(-100), json!(9)));

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_get_salary_slip_uses_configured_tax_table() {
    let mut table = TaxTable::default();
    table.slab3.variable_rate = 0.0;
    let router = api_router(Arc::new(table)).unwrap();

    let request = salary_slip_request(salary_details(json!(60050), json!(9)));
    let (status, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    // 3572 / 12 = 297.67
    assert_eq!(body["salarySlip"]["taxAmount"], 298);
}

#[tokio::test]
async fn test_get_salary_slip_wrong_method() {
    let request = Request::builder()
        .method("GET")
        .uri("/getSalarySlip")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_get_salary_slip_rejects_unknown_field() {
    let mut details = salary_details(json!(60050), json!(9));
    details["extra"] = json!(1);

    let (status, body) = send(router(), salary_slip_request(details)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_INPUT");
    assert_eq!(body["details"]["part"], "body");
    assert_eq!(body["details"]["error"]["code"], "additionalProperties");
    assert_eq!(body["details"]["error"]["instancePath"], "");
    assert!(body["details"]["error"]["message"]
        .as_str()
        .unwrap()
        .contains("extra"));
}

#[tokio::test]
async fn test_get_salary_slip_form_body_is_validated() {
    let request = Request::builder()
        .method("POST")
        .uri("/getSalarySlip")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(
            "first_name=David&last_name=Rudd&annual_salary=60050&super_rate=9\
             &pay_start_date=March",
        ))
        .unwrap();

    let (status, body) = send(router(), request).await;

    // form values are strings, the schema wants numbers
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_INPUT");
    assert_eq!(body["details"]["error"]["code"], "type");
}

#[test]
fn test_mounting_health_route_twice_fails() {
    let error = ApiRouter::<()>::new()
        .mount(health_route())
        .unwrap()
        .mount(health_route())
        .unwrap_err();

    assert_eq!(
        error,
        ConfigurationError::DuplicateRoute {
            method: "get".to_string(),
            path: "/health".to_string(),
        }
    );
}

#[tokio::test]
async fn test_health_check() {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_static_fallback_serves_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>payslip</html>").unwrap();

    let settings = Settings {
        static_dir: dir.path().to_path_buf(),
        ..Settings::default()
    };
    let router = create_router(&settings).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/some/client/route")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<html>payslip</html>");
}

#[tokio::test]
async fn test_get_on_post_only_route_serves_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>payslip</html>").unwrap();

    let settings = Settings {
        static_dir: dir.path().to_path_buf(),
        ..Settings::default()
    };
    let router = create_router(&settings).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/getSalarySlip")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<html>payslip</html>");

    let request = Request::builder()
        .method("PUT")
        .uri("/getSalarySlip")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
