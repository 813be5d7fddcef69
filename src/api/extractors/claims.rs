use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::services::auth::Claims;

/// Claims the access middleware verified for this request.
///
/// Only usable on protected routes; elsewhere nothing was inserted and the
/// request is treated as unauthenticated.
#[derive(Debug, Clone)]
pub struct CurrentClaims(pub Claims);

impl<S> FromRequestParts<S> for CurrentClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(CurrentClaims)
            .ok_or(AppError::Unauthenticated)
    }
}
