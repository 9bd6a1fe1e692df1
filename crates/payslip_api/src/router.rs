//! Route registry
//!
//! [`ApiRouter`] wraps an axum [`Router`] and remembers every mounted
//! method + path pair. axum panics when a route overlaps one registered
//! before; the registry turns those cases into [`ConfigurationError`]s
//! before anything reaches axum.
//!
//! Paths use axum syntax with whole-segment wildcards:
//!
//! - `/users` - static segment
//! - `/users/:id` - named parameter
//! - `/files/*rest` - catch-all, last segment only

use axum::{routing::MethodRouter, Router};
use std::fmt;

use crate::{errors::ConfigurationError, route::RequestMethod};

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;

/// One segment of a route path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Static(&'a str),
    Param(&'a str),
    CatchAll(&'a str),
}

impl PathSegment<'_> {
    /// Segments the router cannot tell apart compare equal here.
    fn matches_like(&self, other: &PathSegment<'_>) -> bool {
        match (self, other) {
            (PathSegment::Static(a), PathSegment::Static(b)) => a == b,
            (PathSegment::Param(_), PathSegment::Param(_)) => true,
            (PathSegment::CatchAll(_), PathSegment::CatchAll(_)) => true,
            _ => false,
        }
    }
}

/// Split `path` into segments, checking its syntax.
///
/// # Errors
///
/// Returns `ConfigurationError::InvalidPath` when the path does not start
/// with `/`, has an unnamed or partial-segment wildcard, repeats a
/// parameter name or has a catch-all before its last segment.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment<'_>>, ConfigurationError> {
    let invalid = |reason: &str| ConfigurationError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| invalid("must start with '/'"))?;

    let raw: Vec<&str> = rest.split('/').collect();
    let mut segments = Vec::with_capacity(raw.len());
    let mut names: Vec<&str> = Vec::new();

    for (index, segment) in raw.iter().copied().enumerate() {
        let parsed = match segment.chars().next() {
            Some(':') => PathSegment::Param(&segment[1..]),
            Some('*') => PathSegment::CatchAll(&segment[1..]),
            _ if segment.contains([':', '*']) => {
                return Err(invalid("wildcards must span a whole segment"));
            }
            _ => PathSegment::Static(segment),
        };

        if let PathSegment::Param(name) | PathSegment::CatchAll(name) = parsed {
            if name.is_empty() {
                return Err(invalid("wildcards must be named"));
            }
            if name.contains([':', '*']) {
                return Err(invalid("only one wildcard is allowed per segment"));
            }
            if names.contains(&name) {
                return Err(invalid("parameter names must be unique"));
            }
            names.push(name);
        }

        if matches!(parsed, PathSegment::CatchAll(_)) && index + 1 != raw.len() {
            return Err(invalid("catch-all is only allowed as the last segment"));
        }

        segments.push(parsed);
    }

    Ok(segments)
}

/// Whether the router would reject `path` once `existing` is registered.
///
/// Paths equal up to parameter names collide, as do two paths that diverge
/// at a catch-all.
fn overlaps(existing: &[PathSegment<'_>], path: &[PathSegment<'_>]) -> bool {
    for (a, b) in existing.iter().zip(path) {
        if a.matches_like(b) {
            continue;
        }
        return matches!(a, PathSegment::CatchAll(_)) || matches!(b, PathSegment::CatchAll(_));
    }
    existing.len() == path.len()
}

/// axum router plus the routes mounted on it.
#[derive(Clone)]
pub struct ApiRouter<S = ()> {
    router: Router<S>,
    mounted: Vec<(RequestMethod, String)>,
}

impl<S> ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            mounted: Vec::new(),
        }
    }

    /// Mount `route`. Same as [`Route::mount`](crate::route::Route::mount).
    pub fn mount(self, route: crate::route::Route) -> Result<Self, ConfigurationError> {
        route.mount(self)
    }

    /// Mounted method + path pairs, in mount order.
    pub fn routes(&self) -> impl Iterator<Item = (RequestMethod, &str)> {
        self.mounted
            .iter()
            .map(|(method, path)| (*method, path.as_str()))
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }

    /// Check `method` + `path` against the mounted routes.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::DuplicateRoute` for a repeated method + path
    /// - `ConfigurationError::ConflictingRoute` for a different path the
    ///   router cannot tell apart from a mounted one
    pub(crate) fn check_available(
        &self,
        method: RequestMethod,
        path: &str,
    ) -> Result<(), ConfigurationError> {
        let segments = parse_path(path)?;

        for (mounted_method, mounted_path) in &self.mounted {
            if mounted_path == path {
                if *mounted_method == method {
                    return Err(ConfigurationError::DuplicateRoute {
                        method: method.to_string(),
                        path: path.to_string(),
                    });
                }
                continue;
            }

            if overlaps(&parse_path(mounted_path)?, &segments) {
                return Err(ConfigurationError::ConflictingRoute {
                    path: path.to_string(),
                    existing: mounted_path.clone(),
                });
            }
        }

        Ok(())
    }

    /// Register an already checked route.
    pub(crate) fn register(
        mut self,
        method: RequestMethod,
        path: String,
        method_router: MethodRouter<S>,
    ) -> Self {
        self.router = self.router.route(&path, method_router);
        self.mounted.push((method, path));
        self
    }
}

impl<S> fmt::Debug for ApiRouter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRouter")
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl<S> Default for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
