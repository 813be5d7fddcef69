/*
 * Responsibility
 * - /vehicles CRUD + batch create
 * - validation happens here against the current calendar year
 */
use axum::{Json, extract::State, http::StatusCode};
use chrono::{Datelike, Utc};

use super::{Created, created};
use crate::{
    api::dto::vehicles::{VehicleListQuery, VehicleRequest},
    api::extractors::{ApiJson, ApiPath, ApiQuery},
    domain::Vehicle,
    error::AppError,
    state::AppState,
};

fn current_year() -> i32 {
    Utc::now().year()
}

fn checked_id(id: i64) -> Result<i64, AppError> {
    if id <= 0 {
        Err(AppError::invalid_id(id))
    } else {
        Ok(id)
    }
}

pub async fn list_vehicles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<VehicleListQuery>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let rows = state
        .vehicles
        .list(query.page.unwrap_or(1), &query.filter())
        .await?;
    Ok(Json(rows))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vehicle>, AppError> {
    let row = state
        .vehicles
        .find_by_id(checked_id(id)?)
        .await?
        .ok_or(AppError::not_found("Vehicle"))?;
    Ok(Json(row))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VehicleRequest>,
) -> Result<Created<Vehicle>, AppError> {
    let new = req
        .validate(current_year())
        .map_err(AppError::ValidationFailed)?;
    let saved = state.vehicles.save(new).await?;

    let location = format!("/vehicles/{}", saved.id);
    Ok(created(location, saved))
}

/// All items are validated before anything is stored; the first invalid
/// item fails the whole batch.
pub async fn create_vehicles(
    State(state): State<AppState>,
    ApiJson(reqs): ApiJson<Vec<VehicleRequest>>,
) -> Result<(StatusCode, Json<Vec<Vehicle>>), AppError> {
    if reqs.is_empty() {
        return Err(AppError::ValidationFailed(vec![
            "Vehicle list cannot be empty".to_string(),
        ]));
    }

    let year = current_year();
    let vehicles = reqs
        .iter()
        .map(|r| r.validate(year))
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::ValidationFailed)?;

    let saved = state.vehicles.save_all(vehicles).await?;
    tracing::info!(count = saved.len(), "vehicles created");

    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<VehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    let id = checked_id(id)?;
    let new = req
        .validate(current_year())
        .map_err(AppError::ValidationFailed)?;

    let row = state
        .vehicles
        .update(id, new)
        .await?
        .ok_or(AppError::not_found("Vehicle"))?;
    Ok(Json(row))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    if state.vehicles.delete(checked_id(id)?).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Vehicle"))
    }
}
