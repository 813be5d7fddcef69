/*
 * Responsibility
 * - URL structure of the service
 * - Each route declares its RequiredRoles here, at registration time
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::api::handlers::{
    auth::{login, me, signup},
    home::{health, home},
    users::{get_user, list_users},
    vehicles::{
        create_vehicle, create_vehicles, delete_vehicle, get_vehicle, list_vehicles, update_vehicle,
    },
};
use crate::middleware::auth::access::protect;
use crate::services::auth::RequiredRoles;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let auth = &state.auth;

    Router::new()
        .route("/", protect(get(home), auth, RequiredRoles::ANONYMOUS))
        .route(
            "/health",
            protect(get(health), auth, RequiredRoles::ANONYMOUS),
        )
        .route(
            "/signup",
            protect(post(signup), auth, RequiredRoles::ANONYMOUS),
        )
        .route(
            "/login",
            protect(post(login), auth, RequiredRoles::ANONYMOUS),
        )
        .route("/me", protect(get(me), auth, RequiredRoles::STAFF))
        .route(
            "/users",
            protect(get(list_users), auth, RequiredRoles::ADMIN),
        )
        .route(
            "/users/{id}",
            protect(get(get_user), auth, RequiredRoles::ADMIN),
        )
        .route(
            "/vehicles",
            protect(
                get(list_vehicles).post(create_vehicle),
                auth,
                RequiredRoles::STAFF,
            ),
        )
        .route(
            "/vehicles/batch",
            protect(post(create_vehicles), auth, RequiredRoles::STAFF),
        )
        .route(
            "/vehicles/{id}",
            protect(get(get_vehicle), auth, RequiredRoles::STAFF).merge(protect(
                put(update_vehicle).delete(delete_vehicle),
                auth,
                RequiredRoles::ADMIN,
            )),
        )
}
