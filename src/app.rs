/*
 * Responsibility
 * - tracing + panic hook
 * - Config -> shared services -> Router
 * - axum::serve()
 */
use std::{panic, sync::Arc};

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;
use crate::repos::{
    self, InMemoryPrincipalStore, InMemoryVehicleStore, PgPrincipalStore, PgVehicleStore,
};
use crate::services::auth::AuthService;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // RUST_LOG=info,vehicle_registry=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr may be hidden depending on how the process is launched
        tracing::error!(%info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = Config::from_env()?;
    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; data lives in memory and is lost on exit");
        return Ok(in_memory_state(config));
    };

    let db = PgPoolOptions::new().max_connections(10).connect(url).await?;
    repos::apply_schema(&db).await?;

    Ok(AppState::new(
        Arc::new(AuthService::new(&config.signing_key)),
        Arc::new(PgPrincipalStore::new(db.clone())),
        Arc::new(PgVehicleStore::new(db)),
    ))
}

/// State backed by in-memory stores. Used without a database and by tests.
pub fn in_memory_state(config: &Config) -> AppState {
    AppState::new(
        Arc::new(AuthService::new(&config.signing_key)),
        Arc::new(InMemoryPrincipalStore::new()),
        Arc::new(InMemoryVehicleStore::new()),
    )
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .merge(api::routes(&state))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state);

    middleware::http::apply(router, config.max_body_bytes)
}

async fn not_found() -> AppError {
    AppError::not_found("Route")
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
