use std::sync::Arc;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acad_pulse::{
    api::{self, state::AppState},
    auth::AuthService,
    config::Settings,
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "acad_pulse=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting ACAD PULSE on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        settings.auth.session_duration_hours,
        settings.auth.secure_cookies,
    ));

    let purged = auth_service.cleanup_expired_sessions().await?;
    if purged > 0 {
        tracing::info!("Removed {} expired sessions", purged);
    }

    let service_context = Arc::new(ServiceContext::from_pool(db_pool, auth_service));

    service_context
        .account_service
        .ensure_bootstrap_admin(&settings.bootstrap)
        .await?;

    tokio::fs::create_dir_all(&settings.uploads.dir).await?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app_state = AppState::new(service_context, Arc::new(settings));
    let app = api::create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
