use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;
use sqlx::SqlitePool;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod models;
pub mod services;
pub mod views;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub cookie_key: Key,
}

impl AppState {
    /// Opens the pool and applies the schema.
    ///
    /// A store that cannot be reached or migrated is logged and otherwise
    /// ignored, so the server still starts and `/health` can report it.
    /// Only an unparseable `DATABASE_URL` is fatal.
    pub async fn init(config: Config) -> Result<Self, sqlx::Error> {
        let db = db::create_pool(&config)?;

        match db::run_migrations(&db).await {
            Ok(()) => tracing::info!("Database migrations applied"),
            Err(e) => tracing::error!(error = %e, "Database unavailable at startup"),
        }

        Ok(Self {
            db,
            cookie_key: flash::signing_key(&config.secret_key),
            config: Arc::new(config),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard::home))
        .route("/privacy", get(handlers::dashboard::privacy))
        .route("/health", get(handlers::health::health_check))
        // Entries
        .route("/entries", post(handlers::entries::create_entry))
        .route("/entries/:id", post(handlers::entries::update_entry))
        .route("/entries/:id/delete", post(handlers::entries::delete_entry))
        // Presets
        .route("/presets", post(handlers::presets::create_preset))
        .route("/presets/:id/use", post(handlers::presets::use_preset))
        .route("/presets/:id/delete", post(handlers::presets::delete_preset))
        // JSON
        .route("/api/entries", get(handlers::entries::list_entries))
        .route("/api/dashboard", get(handlers::dashboard::dashboard_json))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
