//! Route access control
//!
//! The access-check stage enforces the user types and permissions a route
//! declares. It does not authenticate anyone: an outer layer is expected to
//! put a [`Principal`] into the request extensions. Without one the caller
//! is anonymous.

use serde_json::json;

use crate::errors::ApiError;

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Kind of user, e.g. the user model name. Case sensitive.
    pub user_type: String,

    /// Permissions granted to the caller
    pub permissions: Vec<String>,
}

impl Principal {
    pub fn new(user_type: impl Into<String>) -> Self {
        Self {
            user_type: user_type.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Access rules of one mounted route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCheck {
    user_types: Vec<String>,
    permissions: Vec<String>,
    is_public: bool,
}

impl AccessCheck {
    pub fn new(user_types: Vec<String>, permissions: Vec<String>, is_public: bool) -> Self {
        Self {
            user_types,
            permissions,
            is_public,
        }
    }

    /// Decide whether `principal` may use the route.
    ///
    /// Public routes admit everyone. Otherwise the caller must be
    /// authenticated, have one of the allowed user types, and hold every
    /// required permission.
    ///
    /// # Errors
    ///
    /// - `AUTHENTICATION_REQUIRED` when there is no principal
    /// - `ACCESS_DENIED` for a disallowed user type or missing permissions
    pub fn check(&self, principal: Option<&Principal>) -> Result<(), ApiError> {
        if self.is_public {
            return Ok(());
        }

        let principal = principal.ok_or_else(|| ApiError::authentication_required())?;

        if !self.user_types.iter().any(|t| *t == principal.user_type) {
            tracing::debug!(
                user_type = %principal.user_type,
                allowed = ?self.user_types,
                "Access denied: user type not allowed"
            );
            return Err(ApiError::access_denied().with_details(json!({
                "userType": principal.user_type,
                "allowedUserTypes": self.user_types,
            })));
        }

        let missing: Vec<&String> = self
            .permissions
            .iter()
            .filter(|p| !principal.has_permission(p))
            .collect();

        if !missing.is_empty() {
            tracing::debug!(
                user_type = %principal.user_type,
                missing = ?missing,
                "Access denied: missing permissions"
            );
            return Err(ApiError::access_denied().with_details(json!({
                "missingPermissions": missing,
            })));
        }

        Ok(())
    }
}
