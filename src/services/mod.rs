pub mod auth;
pub mod strict_enum;
