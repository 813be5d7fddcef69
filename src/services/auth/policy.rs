//! Per-route role requirements and the single check that evaluates them.
//!
//! Routes declare their `RequiredRoles` when they are registered (see
//! `api::routes`); the access middleware calls [`check`] after the token has
//! been validated. Handlers never inspect roles themselves.

use thiserror::Error;

use crate::domain::Role;
use crate::services::auth::claims::Claims;

/// Roles accepted by a route. Empty means the route is anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredRoles(&'static [Role]);

impl RequiredRoles {
    pub const ANONYMOUS: Self = Self(&[]);
    pub const ADMIN: Self = Self(&[Role::Admin]);
    pub const STAFF: Self = Self(&[Role::Admin, Role::Editor]);

    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }

    pub fn roles(&self) -> &'static [Role] {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("role {actual} is not allowed here (requires one of {required:?})")]
pub struct AccessDenied {
    pub actual: Role,
    pub required: Vec<&'static str>,
}

/// Allow when the claimed role is one of the required roles.
///
/// Comparison is on canonical names; there is no hierarchy and no wildcard.
pub fn check(claims: &Claims, required: RequiredRoles) -> Result<(), AccessDenied> {
    if required.is_anonymous() {
        return Ok(());
    }

    let actual = claims.role();
    let name = actual.as_str();
    if required.roles().iter().any(|r| r.as_str() == name) {
        Ok(())
    } else {
        Err(AccessDenied {
            actual,
            required: required.roles().iter().map(|r| r.as_str()).collect(),
        })
    }
}
