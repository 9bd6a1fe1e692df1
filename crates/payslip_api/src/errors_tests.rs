//! Tests for error handling and HTTP conversion

use super::*;

async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[test]
fn test_error_kinds() {
    let cases = [
        (ErrorKind::InternalError, 500, "INTERNAL_ERROR"),
        (ErrorKind::InvalidInput, 400, "INVALID_INPUT"),
        (ErrorKind::InvalidLogin, 400, "INVALID_LOGIN"),
        (ErrorKind::AuthenticationRequired, 401, "AUTHENTICATION_REQUIRED"),
        (ErrorKind::AccessDenied, 403, "ACCESS_DENIED"),
    ];

    for (kind, status, code) in cases {
        assert_eq!(kind.http_code().as_u16(), status);
        assert_eq!(kind.error_code(), code);
        assert!(!kind.description().is_empty());
    }
}

#[test]
fn test_constructors_use_their_kind() {
    assert_eq!(ApiError::internal_error().kind(), ErrorKind::InternalError);
    assert_eq!(ApiError::invalid_input().kind(), ErrorKind::InvalidInput);
    assert_eq!(ApiError::invalid_login().kind(), ErrorKind::InvalidLogin);
    assert_eq!(
        ApiError::authentication_required().kind(),
        ErrorKind::AuthenticationRequired
    );
    assert_eq!(ApiError::access_denied().kind(), ErrorKind::AccessDenied);
}

#[test]
fn test_stack_frame_points_at_call_site() {
    let line = line!() + 1;
    let error = ApiError::invalid_input();

    let frames = error.stack_frames();
    assert_eq!(frames.len(), 1);
    assert!(frames[0].file.ends_with("errors_tests.rs"));
    assert_eq!(frames[0].line, line);
}

#[test]
fn test_stack_frame_filter() {
    let app = StackFrame {
        file: "crates/payslip_api/src/handlers.rs".to_string(),
        line: 1,
        column: 1,
    };
    let dependency = StackFrame {
        file: "/home/dev/.cargo/registry/src/index.crates.io-6f17d22bba15001f/axum-0.7.9/src/routing/mod.rs"
            .to_string(),
        line: 1,
        column: 1,
    };
    let toolchain = StackFrame {
        file: "/rustc/90b35a6239c3d8bdabc530a6a0816f7ff89a0aaf/library/core/src/ops/function.rs"
            .to_string(),
        line: 1,
        column: 1,
    };

    assert!(app.is_application_frame());
    assert!(!dependency.is_application_frame());
    assert!(!toolchain.is_application_frame());
}

#[test]
fn test_with_details_replaces_details() {
    let error = ApiError::invalid_input()
        .with_details(json!({"first": 1}))
        .with_details(json!({"second": 2}));

    assert_eq!(error.details(), Some(&json!({"second": 2})));
}

#[test]
fn test_display_includes_code_and_description() {
    let error = ApiError::invalid_login();
    assert_eq!(
        error.to_string(),
        "INVALID_LOGIN: Login credentials do not match any registered user."
    );
}

#[tokio::test]
async fn test_into_response_status_and_body() {
    let error = ApiError::invalid_input().with_details(json!({"field": "annual_salary"}));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["errorCode"], "INVALID_INPUT");
    assert_eq!(
        body["description"],
        "The request input is not as expected by API. Please provide valid input."
    );
    assert_eq!(body["details"]["field"], "annual_salary");
}

#[tokio::test]
async fn test_internal_error_never_serializes_stack_frames() {
    let response = ApiError::internal_error().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    let object = body.as_object().unwrap();
    let mut keys: Vec<&String> = object.keys().collect();
    keys.sort();

    assert_eq!(keys, vec!["description", "details", "errorCode"]);
    assert!(body["details"].is_null());
}

#[test]
fn test_handler_error_from_api_error() {
    let error: HandlerError = ApiError::access_denied().into();
    assert!(matches!(error, HandlerError::Api(ref e) if e.kind() == ErrorKind::AccessDenied));
}

#[test]
fn test_handler_error_from_anyhow() {
    let error: HandlerError = anyhow::anyhow!("disk on fire").into();
    assert!(matches!(error, HandlerError::Unexpected(_)));
    assert_eq!(error.to_string(), "disk on fire");
}

#[test]
fn test_configuration_error_messages() {
    let error = ConfigurationError::AccessNotConfigured {
        method: "post".to_string(),
        path: "/things".to_string(),
    };
    assert!(error.to_string().contains("post /things"));

    let error = ConfigurationError::InvalidMethod {
        method: "patch".to_string(),
        allowed: "get,post".to_string(),
    };
    assert_eq!(error.to_string(), "Method must be one of: [get,post], got 'patch'");
}
