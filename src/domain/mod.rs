/*
 * Responsibility
 * - Entity types shared by handlers, services and repos
 * - Field validation that does not need storage
 */
pub mod principal;
pub mod role;
pub mod vehicle;

pub use principal::{NewPrincipal, Principal, normalize_email};
pub use role::Role;
pub use vehicle::{NewVehicle, Vehicle, VehicleFilter};
