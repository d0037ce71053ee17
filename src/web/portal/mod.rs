pub mod admin;
mod achievements;
mod circulars;
mod dashboard;
mod feedback;
mod links;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};
use crate::api::state::AppState;

/// Pages reachable by logged-in students only.
pub fn create_student_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::student_dashboard))
        .route("/circulars", get(circulars::circulars_page))
        .route("/circular/:id", get(circulars::circular_detail_page))
        .route("/achievements", get(achievements::achievements_page))
        .route("/registration-links", get(links::registration_links_page))
        .route("/feedback", get(feedback::feedback_page))
        .route("/feedback-submit", post(feedback::submit_feedback))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::api::middleware::auth::require_student,
        ))
}
