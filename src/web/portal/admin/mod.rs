mod achievements;
mod circulars;
mod console;
mod links;
mod profile;
mod students;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};
use crate::{
    api::state::AppState,
    error::{AppError, Result},
    web::uploads::MultipartForm,
};

pub fn create_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(console::admin_console))
        // Students
        .route("/admin-create-student", post(students::create_student))
        .route("/admin-edit-student/:user_id", post(students::edit_student))
        .route("/admin-delete-student/:user_id", post(students::delete_student))
        .route("/admin-reset-student-password", post(students::reset_student_password))
        // Circulars
        .route("/admin-circular", post(circulars::create_circular))
        .route("/admin-edit-circular/:id", post(circulars::edit_circular))
        // Achievements
        .route("/admin-achievement", post(achievements::create_achievement))
        .route("/admin-edit-achievement/:id", post(achievements::edit_achievement))
        // Registration links
        .route("/admin-reg-link", post(links::create_link))
        .route("/admin-edit-reg-link/:id", post(links::edit_link))
        .route("/admin-deactivate-link/:id", post(links::deactivate_link))
        // Own account
        .route("/admin-change-password", post(profile::change_password))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::api::middleware::auth::require_admin,
        ))
}

/// Form value trimmed, with blank treated as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(form: &MultipartForm, field: &str, message: &str) -> Result<String> {
    form.opt_text(field)
        .ok_or_else(|| AppError::Validation(message.to_string()))
}
