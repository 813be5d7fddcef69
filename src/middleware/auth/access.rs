//! Bearer token check + role check for one route.
//!
//! `protect` attaches the guard to a method router at registration time, so
//! every route carries its own `RequiredRoles`. On success the verified
//! `Claims` are put into request extensions for the `CurrentClaims` extractor.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::{AuthService, RequiredRoles, policy};
use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct AccessGuard {
    auth: Arc<AuthService>,
    required: RequiredRoles,
}

/// Require a valid token whose role is in `required`.
///
/// Anonymous requirements leave the route untouched.
pub fn protect(
    route: MethodRouter<AppState>,
    auth: &Arc<AuthService>,
    required: RequiredRoles,
) -> MethodRouter<AppState> {
    if required.is_anonymous() {
        return route;
    }

    let guard = AccessGuard {
        auth: Arc::clone(auth),
        required,
    };
    // route_layer: only matched requests are checked, so unknown methods stay 405
    route.route_layer(middleware::from_fn_with_state(guard, access_middleware))
}

async fn access_middleware(
    State(guard): State<AccessGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or(AppError::Unauthenticated)?;

    let claims = match guard.auth.validator().validate(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthenticated);
        }
    };

    if let Err(denied) = policy::check(&claims, guard.required) {
        tracing::warn!(email = claims.email(), error = %denied, "access denied");
        return Err(denied.into());
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(
            bearer_token(&request_with(Some("Bearer abc.def"))),
            Some("abc.def")
        );
        assert_eq!(bearer_token(&request_with(Some("bearer abc"))), Some("abc"));
    }

    #[test]
    fn ignores_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&request_with(None)), None);
        assert_eq!(bearer_token(&request_with(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&request_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&request_with(Some("Bearer"))), None);
    }
}
