#![allow(dead_code)]

use std::sync::Arc;

use acad_pulse::{
    api::{self, state::AppState},
    auth::AuthService,
    config::Settings,
    service::ServiceContext,
};
use axum::Router;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// One connection, so every query sees the same in-memory database.
pub async fn memory_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

pub fn service_context(pool: SqlitePool) -> Arc<ServiceContext> {
    let auth_service = Arc::new(AuthService::new(pool.clone(), 24, false));
    Arc::new(ServiceContext::from_pool(pool, auth_service))
}

pub struct TestApp {
    pub router: Router,
    pub context: Arc<ServiceContext>,
    pub settings: Settings,
    pub uploads: tempfile::TempDir,
}

/// Full router over a fresh database with the bootstrap admin in place.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let pool = memory_pool().await?;
    let context = service_context(pool);
    let uploads = tempfile::tempdir()?;

    let mut settings = Settings::default();
    settings.uploads.dir = uploads.path().to_string_lossy().to_string();
    settings.auth.session_secret = "integration-test-secret".to_string();

    context
        .account_service
        .ensure_bootstrap_admin(&settings.bootstrap)
        .await?;

    let state = AppState::new(context.clone(), Arc::new(settings.clone()));
    let router = api::create_app(state);

    Ok(TestApp { router, context, settings, uploads })
}
