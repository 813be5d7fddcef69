/*
 * Responsibility
 * - signup / login / me request and response bodies
 * - request bodies carry secrets, so they do not derive Debug
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Role;
use crate::services::auth::{Claims, IssuedToken};

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Raw token; decoded by the strict enum codec, never by serde.
    #[serde(default)]
    pub role: Value,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub role: Role,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl LoginResponse {
    pub fn new(email: String, role: Role, issued: IssuedToken) -> Self {
        Self {
            email,
            role,
            expires_in: issued.expires_in_seconds(),
            token: issued.token,
            token_type: "Bearer",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
    pub role: Role,
    pub expires_at: i64,
}

impl From<&Claims> for MeResponse {
    fn from(claims: &Claims) -> Self {
        Self {
            email: claims.email().to_string(),
            role: claims.role(),
            expires_at: claims.expires_at(),
        }
    }
}
