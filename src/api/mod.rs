pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::web;
use state::AppState;

pub fn create_app(app_state: AppState) -> Router {
    let max_body = app_state.settings.server.max_upload_bytes;
    let uploads = ServeDir::new(app_state.image_store.dir());

    Router::new()
        .route("/health", get(handlers::root::health_check))
        .with_state(app_state.clone())

        // HTML pages
        .merge(web::create_web_routes(app_state))

        // Stored images
        .nest_service("/static/uploads", uploads)

        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
