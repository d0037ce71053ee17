pub mod flash;
pub mod portal;
pub mod templates;
pub mod uploads;
pub mod views;

use axum::{
    Router,
    routing::get,
};
use crate::api::state::AppState;

pub fn create_web_routes(state: AppState) -> Router {
    Router::new()
        // Login form doubles as the landing page
        .route("/", get(templates::auth::login_page).post(templates::auth::login_handler))
        .route("/logout", get(templates::auth::logout_handler))

        .merge(portal::create_student_routes(state.clone()))
        .merge(portal::admin::create_admin_routes(state.clone()))

        .with_state(state)
}
