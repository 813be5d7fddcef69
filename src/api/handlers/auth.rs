/*
 * Responsibility
 * - POST /signup: strict role decode, field validation, save
 * - POST /login: credential lookup, token issue
 * - GET /me: echo the verified claims
 */
use axum::{Json, extract::State};
use serde_json::Value;

use super::{Created, created};
use crate::{
    api::dto::auth::{LoginRequest, LoginResponse, MeResponse, SignupRequest},
    api::dto::users::UserResponse,
    api::extractors::{ApiJson, CurrentClaims},
    domain::{NewPrincipal, Role, normalize_email},
    error::AppError,
    state::AppState,
};

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<Created<UserResponse>, AppError> {
    // A present role must be a valid name before anything else is checked.
    let role = match &req.role {
        Value::Null => None,
        raw => Some(Role::decode(raw)?),
    };

    let new = NewPrincipal::validate(&req.email, &req.password, role)
        .map_err(AppError::ValidationFailed)?;
    let saved = state.principals.save(new).await?;

    tracing::info!(id = saved.id, role = %saved.role, "principal registered");

    let location = format!("/users/{}", saved.id);
    Ok(created(location, UserResponse::from(&saved)))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let principal = state
        .principals
        .find_by_credentials(normalize_email(&req.email), &req.password)
        .await?
        .ok_or(AppError::BadCredentials)?;

    let issued = state.auth.issuer().issue(&principal)?;
    tracing::info!(id = principal.id, "token issued");

    let body = LoginResponse::new(principal.email, principal.role, issued);
    Ok(Json(body))
}

pub async fn me(CurrentClaims(claims): CurrentClaims) -> Json<MeResponse> {
    Json(MeResponse::from(&claims))
}
