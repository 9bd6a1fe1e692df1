//! Request-scoped state passed through a route's stage chain.

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, FromRequestParts, Query, RawPathParams, Request},
    http::{header, request::Parts, HeaderValue, Method},
    response::Response,
    Form,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::{access::Principal, errors::ApiError, route::InputPart};

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// State owned by a single request while it moves through its chain.
///
/// Stages read the decoded request parts and append their results to
/// `locals`. Nothing in here is shared with other requests.
pub struct RequestContext {
    pub method: Method,
    pub path: String,

    /// Decoded JSON body; an empty object when the request had no body
    pub body: Value,

    /// Query string parameters as a JSON object of strings
    pub query: Value,

    /// Path parameters as a JSON object of strings
    pub params: Value,

    /// Authenticated caller, if an outer layer attached one
    pub principal: Option<Principal>,

    /// Result accumulator appended to by stages
    pub locals: Map<String, Value>,

    begun_response: Option<Response>,
}

impl RequestContext {
    /// Create an empty context for `method` and `path`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Value::Object(Map::new()),
            query: Value::Object(Map::new()),
            params: Value::Object(Map::new()),
            principal: None,
            locals: Map::new(),
            begun_response: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Decode an incoming request into a context.
    ///
    /// The body is read up to [`MAX_BODY_BYTES`]. Form bodies
    /// (`application/x-www-form-urlencoded`) become an object of strings;
    /// any other body is parsed as JSON. Path parameters are only available
    /// once the router has matched the request.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if the body is too large or cannot be decoded,
    /// or if the query string cannot be decoded.
    pub async fn from_request(request: Request) -> Result<Self, ApiError> {
        let (mut parts, body) = request.into_parts();

        let params = path_params(&mut parts).await;
        let query = query_params(&parts)?;
        let body = if is_form(&parts) {
            form_body(body).await?
        } else {
            json_body(body).await?
        };

        let mut context = Self::new(parts.method.clone(), parts.uri.path());
        context.principal = parts.extensions.get::<Principal>().cloned();
        context.body = body;
        context.query = query;
        context.params = params;

        Ok(context)
    }

    /// The request data validated for `part`.
    pub fn part(&self, part: InputPart) -> &Value {
        match part {
            InputPart::Body => &self.body,
            InputPart::Query => &self.query,
            InputPart::Params => &self.params,
        }
    }

    /// Deserialize the whole body.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            ApiError::invalid_input().with_details(json!({ "message": e.to_string() }))
        })
    }

    /// Deserialize a single top-level body field.
    pub fn body_field<T: DeserializeOwned>(&self, field: &str) -> Result<T, ApiError> {
        let value = self.body.get(field).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| {
            ApiError::invalid_input().with_details(json!({
                "field": field,
                "message": e.to_string(),
            }))
        })
    }

    pub fn set_local(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.locals.insert(key.into(), value.into());
    }

    /// Read an integer stored by an earlier stage.
    ///
    /// A missing or non-integer value is a bug in the chain, not bad input.
    pub fn local_i64(&self, key: &str) -> anyhow::Result<i64> {
        self.locals
            .get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| anyhow::anyhow!("Request local '{}' is missing or not an integer", key))
    }

    /// Start sending `response` while the chain keeps running.
    ///
    /// Once a response has begun its status and headers are fixed: a later
    /// failure can no longer be reported to the client.
    pub fn begin_response(&mut self, response: Response) {
        if self.begun_response.is_some() {
            tracing::warn!(path = %self.path, "Response already started, ignoring new response");
            return;
        }
        self.begun_response = Some(response);
    }

    pub fn response_begun(&self) -> bool {
        self.begun_response.is_some()
    }

    pub(crate) fn take_begun_response(&mut self) -> Option<Response> {
        self.begun_response.take()
    }
}

async fn path_params(parts: &mut Parts) -> Value {
    let params = match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => params
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect(),
        Err(_) => Map::new(),
    };
    Value::Object(params)
}

fn query_params(parts: &Parts) -> Result<Value, ApiError> {
    if parts.uri.query().is_none() {
        return Ok(Value::Object(Map::new()));
    }

    let Query(query) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri).map_err(|e| {
        ApiError::invalid_input().with_details(json!({ "message": e.body_text() }))
    })?;

    Ok(Value::Object(
        query
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    ))
}

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn is_form(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE))
}

/// Read the whole body, or `None` when it is blank.
async fn read_body(body: Body) -> Result<Option<Bytes>, ApiError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            ApiError::invalid_input().with_details(json!({
                "message": format!("Failed to read request body: {}", e),
                "limit": MAX_BODY_BYTES,
            }))
        })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(bytes))
}

async fn form_body(body: Body) -> Result<Value, ApiError> {
    let Some(bytes) = read_body(body).await? else {
        return Ok(Value::Object(Map::new()));
    };

    let mut request = Request::new(Body::from(bytes));
    *request.method_mut() = Method::POST;
    request.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(FORM_CONTENT_TYPE),
    );

    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
        .await
        .map_err(|e| {
            ApiError::invalid_input().with_details(json!({ "message": e.body_text() }))
        })?;

    // repeated keys keep the last value
    Ok(Value::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    ))
}

async fn json_body(body: Body) -> Result<Value, ApiError> {
    let Some(bytes) = read_body(body).await? else {
        return Ok(Value::Object(Map::new()));
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        ApiError::invalid_input().with_details(json!({
            "message": format!("Request body is not valid JSON: {}", e),
        }))
    })
}
