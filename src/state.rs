/*
 * Responsibility
 * - Shared context handed to every handler and to the access middleware
 * - Clone is cheap (everything behind Arc)
 */
use std::sync::Arc;

use crate::repos::{PrincipalStore, VehicleStore};
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub principals: Arc<dyn PrincipalStore>,
    pub vehicles: Arc<dyn VehicleStore>,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        principals: Arc<dyn PrincipalStore>,
        vehicles: Arc<dyn VehicleStore>,
    ) -> Self {
        Self {
            auth,
            principals,
            vehicles,
        }
    }
}
