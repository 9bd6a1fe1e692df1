//! Request middleware
//!
//! This module provides:
//! - The [`Middleware`] trait implemented by every user stage of a route
//! - Request tracing middleware applied to the whole router

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next as AxumNext,
    response::Response,
};
use tracing::Instrument;

use crate::{context::RequestContext, errors::HandlerError};

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;

/// What the chain does after a stage succeeds.
pub enum Next {
    /// Run the next stage.
    Continue,

    /// Stop the chain and send this response.
    Respond(Response),
}

/// One user-supplied stage of a route.
///
/// Plain functions and closures of the shape
/// `Fn(&mut RequestContext) -> Result<Next, HandlerError>` implement this
/// trait. Implement it directly for stages that need to await.
///
/// # Example
///
/// ```rust,ignore
/// fn greet(ctx: &mut RequestContext) -> Result<Next, HandlerError> {
///     ctx.set_local("greeting", "hello");
///     Ok(Next::Continue)
/// }
///
/// let route = Route::new("get", "/greet")?
///     .set_public()
///     .use_middleware(greet);
/// ```
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Next, HandlerError>;
}

#[async_trait]
impl<F> Middleware for F
where
    F: Fn(&mut RequestContext) -> Result<Next, HandlerError> + Send + Sync + 'static,
{
    async fn handle(&self, ctx: &mut RequestContext) -> Result<Next, HandlerError> {
        (self)(ctx)
    }
}

/// Response header carrying the request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request tracing middleware.
///
/// Runs the request inside a span holding a fresh request ID and echoes
/// that ID back in the `x-request-id` response header.
pub async fn tracing_middleware(request: Request, next: AxumNext) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        tracing::info!("Request started");

        let mut response = next.run(request).await;

        tracing::info!(status = %response.status(), "Request completed");

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
