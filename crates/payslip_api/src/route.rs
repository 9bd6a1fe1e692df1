//! Declarative request routes
//!
//! A [`Route`] describes one HTTP method + path pair:
//!
//! 1. Which callers may use it: allowed user types, required permissions,
//!    or public access
//! 2. Which request parts are validated, and against which JSON schema
//! 3. The ordered middlewares that handle the request
//!
//! Routes are declared at startup and compiled onto an [`ApiRouter`] by
//! [`Route::mount`]. Compilation produces a fixed stage order:
//!
//! ```text
//! [access check] → [validation per schema, in declaration order] → [middlewares]
//! ```
//!
//! The access check is only present when user types were declared. Any
//! stage failure short-circuits the chain to
//! [`handle_error`](crate::error_handler::handle_error).
//!
//! # Example
//!
//! ```rust,ignore
//! let router = Route::new("post", "/getSalarySlip")?
//!     .set_public()
//!     .validate_input_body(schema)?
//!     .use_middleware(start_salary_slip)
//!     .use_middleware(send_salary_slip)
//!     .mount(ApiRouter::new())?;
//! ```

use axum::{
    extract::Request,
    handler::Handler,
    response::Response,
    routing::{self, MethodRouter},
};
use serde::Serialize;
use serde_json::json;
use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    access::AccessCheck,
    context::RequestContext,
    error_handler::handle_error,
    errors::{ApiError, ConfigurationError, HandlerError},
    middleware::{Middleware, Next},
    router::{parse_path, ApiRouter},
    validation::InputValidator,
};

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;

/// HTTP methods a route can be declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl RequestMethod {
    /// All allowed methods.
    pub const ALL: [RequestMethod; 5] = [
        RequestMethod::Get,
        RequestMethod::Post,
        RequestMethod::Put,
        RequestMethod::Delete,
        RequestMethod::Head,
    ];

    /// Lower-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "get",
            RequestMethod::Post => "post",
            RequestMethod::Put => "put",
            RequestMethod::Delete => "delete",
            RequestMethod::Head => "head",
        }
    }

    fn method_router<H, T, S>(&self, handler: H) -> MethodRouter<S>
    where
        H: Handler<T, S>,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        match self {
            RequestMethod::Get => routing::get(handler),
            RequestMethod::Post => routing::post(handler),
            RequestMethod::Put => routing::put(handler),
            RequestMethod::Delete => routing::delete(handler),
            RequestMethod::Head => routing::head(handler),
        }
    }
}

impl FromStr for RequestMethod {
    type Err = ConfigurationError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        let lower = method.to_lowercase();
        RequestMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| ConfigurationError::InvalidMethod {
                method: method.to_string(),
                allowed: RequestMethod::ALL
                    .iter()
                    .map(RequestMethod::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            })
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request part a schema applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPart {
    Body,
    Query,
    Params,
}

impl InputPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputPart::Body => "body",
            InputPart::Query => "query",
            InputPart::Params => "params",
        }
    }
}

impl fmt::Display for InputPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of one request handling route.
///
/// Built with chained calls. Calls that can reject their input return a
/// `Result` so configuration mistakes surface at startup.
pub struct Route {
    method: RequestMethod,
    path: String,
    middlewares: Vec<Arc<dyn Middleware>>,
    user_types: Vec<String>,
    permissions: Vec<String>,
    is_public: bool,
    input_schema: Vec<InputValidator>,
}

impl Route {
    /// Declare a route for `method` (case insensitive) and `path`.
    ///
    /// `path` uses axum syntax, e.g. `/users/:id`. It is checked when the
    /// route is mounted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidMethod` unless `method` is one of
    /// get, post, put, delete or head.
    pub fn new(method: &str, path: impl Into<String>) -> Result<Self, ConfigurationError> {
        Ok(Self::with_method(method.parse()?, path))
    }

    /// Declare a route for an already parsed method.
    pub fn with_method(method: RequestMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            middlewares: Vec::new(),
            user_types: Vec::new(),
            permissions: Vec::new(),
            is_public: false,
            input_schema: Vec::new(),
        }
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn user_types(&self) -> &[String] {
        &self.user_types
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Request parts with a schema, in declaration order.
    pub fn validated_parts(&self) -> Vec<InputPart> {
        self.input_schema.iter().map(InputValidator::part).collect()
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Append a middleware to the end of the chain.
    pub fn use_middleware(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Append already shared middlewares, in order.
    pub fn use_middlewares<I>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        self.middlewares.extend(middlewares);
        self
    }

    /// Allow callers of the given user types. Duplicates are ignored and
    /// the first-seen order is kept.
    pub fn allow_user_types<I, T>(mut self, user_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for user_type in user_types {
            push_unique(&mut self.user_types, user_type.into());
        }
        self
    }

    /// Require callers to hold all of the given permissions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::PermissionsWithoutUserTypes` if no user
    /// type was allowed yet: permissions only apply to known user types.
    pub fn require_permissions<I, P>(mut self, permissions: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        if self.user_types.is_empty() {
            return Err(ConfigurationError::PermissionsWithoutUserTypes);
        }

        for permission in permissions {
            push_unique(&mut self.permissions, permission.into());
        }
        Ok(self)
    }

    /// Make the route publicly accessible.
    ///
    /// A public route skips user type and permission checks even when
    /// those were declared.
    pub fn set_public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Validate the JSON body against `schema`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSchema` if `schema` is not a JSON
    /// object or not a valid JSON schema.
    pub fn validate_input_body(self, schema: serde_json::Value) -> Result<Self, ConfigurationError> {
        self.validate_input(InputPart::Body, schema)
    }

    /// Validate the query parameters against `schema`.
    ///
    /// Query values are always strings.
    pub fn validate_input_query(
        self,
        schema: serde_json::Value,
    ) -> Result<Self, ConfigurationError> {
        self.validate_input(InputPart::Query, schema)
    }

    /// Validate the path parameters against `schema`.
    ///
    /// Path parameter values are always strings.
    pub fn validate_input_params(
        self,
        schema: serde_json::Value,
    ) -> Result<Self, ConfigurationError> {
        self.validate_input(InputPart::Params, schema)
    }

    fn validate_input(
        mut self,
        part: InputPart,
        schema: serde_json::Value,
    ) -> Result<Self, ConfigurationError> {
        let validator = InputValidator::compile(part, schema)?;

        // a replaced schema keeps its position
        match self.input_schema.iter_mut().find(|v| v.part() == part) {
            Some(existing) => *existing = validator,
            None => self.input_schema.push(validator),
        }
        Ok(self)
    }

    /// Compile the route into its ordered stage chain.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::AccessNotConfigured` if the route is neither
    ///   public nor restricted to user types
    /// - `ConfigurationError::InvalidPath` if the path is not valid route
    ///   syntax, see [`parse_path`]
    pub fn compile(self) -> Result<MountedRoute, ConfigurationError> {
        if !self.is_public && self.user_types.is_empty() {
            return Err(ConfigurationError::AccessNotConfigured {
                method: self.method.to_string(),
                path: self.path,
            });
        }

        parse_path(&self.path)?;

        let mut stages = Vec::with_capacity(
            usize::from(!self.user_types.is_empty())
                + self.input_schema.len()
                + self.middlewares.len(),
        );

        if !self.user_types.is_empty() {
            stages.push(Stage::AccessCheck(AccessCheck::new(
                self.user_types,
                self.permissions,
                self.is_public,
            )));
        }

        stages.extend(self.input_schema.into_iter().map(Stage::Validation));
        stages.extend(self.middlewares.into_iter().map(Stage::Middleware));

        Ok(MountedRoute {
            method: self.method,
            path: self.path,
            stages,
        })
    }

    /// Compile the route and register it on `router`.
    ///
    /// # Errors
    ///
    /// See [`Route::compile`] and [`ApiRouter`]: the method + path must not
    /// be mounted already, nor overlap a mounted path. Nothing is
    /// registered on failure.
    pub fn mount<S>(self, router: ApiRouter<S>) -> Result<ApiRouter<S>, ConfigurationError>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mounted = Arc::new(self.compile()?);
        router.check_available(mounted.method, &mounted.path)?;

        tracing::debug!(
            method = %mounted.method,
            path = %mounted.path,
            stages = ?mounted.stage_kinds(),
            "Mounting route"
        );

        let method = mounted.method;
        let path = mounted.path.clone();
        let handler = move |request: Request| {
            let route = Arc::clone(&mounted);
            async move { route.handle(request).await }
        };

        Ok(router.register(method, path, method.method_router(handler)))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middlewares", &self.middlewares.len())
            .field("user_types", &self.user_types)
            .field("permissions", &self.permissions)
            .field("is_public", &self.is_public)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// One compiled stage of a route.
pub enum Stage {
    AccessCheck(AccessCheck),
    Validation(InputValidator),
    Middleware(Arc<dyn Middleware>),
}

/// Stage identity, for inspecting a compiled chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    AccessCheck,
    Validation(InputPart),
    Middleware,
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::AccessCheck(_) => StageKind::AccessCheck,
            Stage::Validation(validator) => StageKind::Validation(validator.part()),
            Stage::Middleware(_) => StageKind::Middleware,
        }
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Next, HandlerError> {
        match self {
            Stage::AccessCheck(check) => {
                check.check(ctx.principal.as_ref())?;
                Ok(Next::Continue)
            }
            Stage::Validation(validator) => {
                validator.validate(ctx.part(validator.part())).map_err(|report| {
                    ApiError::invalid_input().with_details(report)
                })?;
                Ok(Next::Continue)
            }
            Stage::Middleware(middleware) => middleware.handle(ctx).await,
        }
    }
}

/// A route compiled into its stage chain.
pub struct MountedRoute {
    method: RequestMethod,
    path: String,
    stages: Vec<Stage>,
}

impl MountedRoute {
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(Stage::kind).collect()
    }

    /// Decode `request` and run it through the chain.
    pub async fn handle(&self, request: Request) -> Response {
        match RequestContext::from_request(request).await {
            Ok(ctx) => self.dispatch(ctx).await,
            Err(error) => handle_error(error.into(), None),
        }
    }

    /// Run the stages in order until one responds or fails.
    ///
    /// A chain that finishes without responding returns the response a
    /// stage began, or fails with an internal error.
    pub async fn dispatch(&self, mut ctx: RequestContext) -> Response {
        for stage in &self.stages {
            match stage.run(&mut ctx).await {
                Ok(Next::Continue) => {}
                Ok(Next::Respond(response)) => {
                    return match ctx.take_begun_response() {
                        Some(begun) => {
                            tracing::warn!(
                                path = %self.path,
                                "Response already started, dropping final response"
                            );
                            begun
                        }
                        None => response,
                    };
                }
                Err(error) => return handle_error(error, ctx.take_begun_response()),
            }
        }

        match ctx.take_begun_response() {
            Some(begun) => begun,
            None => handle_error(
                ApiError::internal_error()
                    .with_details(json!({
                        "message": format!("Route {} {} did not respond", self.method, self.path),
                    }))
                    .into(),
                None,
            ),
        }
    }
}

impl fmt::Debug for MountedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedRoute")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("stages", &self.stage_kinds())
            .finish()
    }
}
