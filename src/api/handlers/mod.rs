use axum::{
    Json,
    http::{HeaderName, StatusCode, header},
};

pub mod auth;
pub mod home;
pub mod users;
pub mod vehicles;

/// `201 Created` with a `Location` header pointing at the new resource.
pub type Created<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

fn created<T>(location: String, body: T) -> Created<T> {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
}
