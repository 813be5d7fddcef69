pub mod error;
pub mod pagination;
pub mod principal_repo;
pub mod vehicle_repo;

use sqlx::PgPool;

pub use principal_repo::{InMemoryPrincipalStore, PgPrincipalStore, PrincipalStore};
pub use vehicle_repo::{InMemoryVehicleStore, PgVehicleStore, VehicleStore};

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Create the tables if they do not exist yet.
pub async fn apply_schema(db: &PgPool) -> Result<(), error::RepoError> {
    sqlx::raw_sql(SCHEMA).execute(db).await?;
    Ok(())
}
