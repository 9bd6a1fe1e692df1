//! HTTP routing configuration
//!
//! This module declares every route and assembles the application router.
//!
//! # Route Structure
//!
//! - POST   /getSalarySlip - Compute a salary slip (public)
//! - GET    /health        - Health check (public)
//! - GET    /*             - Static front end, falling back to `index.html`
//!
//! A GET to an API path that has no GET route, such as `GET /getSalarySlip`,
//! also gets `index.html` so the browser app can handle it.

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use payslip_core::TaxTable;
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    context::RequestContext,
    errors::ConfigurationError,
    handlers,
    middleware::tracing_middleware,
    models::salary_details_schema,
    route::{RequestMethod, Route},
    router::ApiRouter,
    settings::Settings,
};

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// `POST /getSalarySlip`
///
/// Public. Validates the body, then computes the slip one figure per stage.
pub fn salary_slip_route(tax_table: Arc<TaxTable>) -> Result<Route, ConfigurationError> {
    let route = Route::new("post", "/getSalarySlip")?
        .set_public()
        .validate_input_body(salary_details_schema())?
        .use_middleware(handlers::start_salary_slip)
        .use_middleware(handlers::add_super_income)
        .use_middleware(move |ctx: &mut RequestContext| {
            handlers::add_tax_amount(ctx, &tax_table)
        })
        .use_middleware(handlers::add_net_income)
        .use_middleware(handlers::send_salary_slip);

    Ok(route)
}

/// `GET /health`
pub fn health_route() -> Route {
    Route::with_method(RequestMethod::Get, "/health")
        .set_public()
        .use_middleware(handlers::health_check)
}

/// Router with every API route mounted, without any layers.
pub fn api_router(tax_table: Arc<TaxTable>) -> Result<Router, ConfigurationError> {
    let router = ApiRouter::new()
        .mount(salary_slip_route(tax_table)?)?
        .mount(health_route())?;

    Ok(router.into_router())
}

/// Create the complete application router.
///
/// This function sets up:
/// - All API routes
/// - Static file serving for the front end
/// - CORS configuration
/// - Request tracing
/// - Timeout handling
///
/// # Errors
///
/// Returns a `ConfigurationError` if any route declaration is invalid.
pub fn create_router(settings: &Settings) -> Result<Router, ConfigurationError> {
    // Configure CORS for the browser front end
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
        .max_age(Duration::from_secs(3600));

    // Configure request tracing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_response(DefaultOnResponse::new().include_headers(true));

    let timeout_layer = TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs));

    // Unknown paths get the single page app
    let index = ServeFile::new(settings.static_dir.join("index.html"));
    let static_files = ServeDir::new(&settings.static_dir).fallback(index.clone());

    let router = api_router(Arc::new(settings.tax.clone()))?
        .fallback_service(static_files)
        .layer(middleware::from_fn_with_state(index, index_for_unrouted_get))
        .layer(middleware::from_fn(tracing_middleware))
        .layer(timeout_layer)
        .layer(trace_layer)
        .layer(cors);

    Ok(router)
}

/// Serve `index.html` for a GET the API answers with 405.
async fn index_for_unrouted_get(
    State(index): State<ServeFile>,
    request: Request,
    next: middleware::Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let mut index_request = Request::new(axum::body::Body::empty());
    *index_request.uri_mut() = request.uri().clone();
    *index_request.headers_mut() = request.headers().clone();

    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    tracing::debug!(uri = %index_request.uri(), "No GET route, serving index.html");
    match index.oneshot(index_request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
