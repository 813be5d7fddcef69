use axum::{Json, extract::State};

use crate::{
    api::dto::users::{PageQuery, UserResponse},
    api::extractors::{ApiPath, ApiQuery},
    error::AppError,
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = state.principals.list(query.page.unwrap_or(1)).await?;
    Ok(Json(rows.iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<UserResponse>, AppError> {
    if id <= 0 {
        return Err(AppError::invalid_id(id));
    }

    let row = state
        .principals
        .find_by_id(id)
        .await?
        .ok_or(AppError::not_found("User"))?;

    Ok(Json(UserResponse::from(&row)))
}
