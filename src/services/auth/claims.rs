use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Signed payload carried inside the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verified identity for one request.
///
/// Only `TokenValidator` can build this, from a token whose signature and
/// expiry it has checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    email: String,
    role: Role,
    expires_at: i64,
}

impl Claims {
    pub(in crate::services::auth) fn new(email: String, role: Role, expires_at: i64) -> Self {
        Self {
            email,
            role,
            expires_at,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Expiry as a unix timestamp (seconds).
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }
}
