pub mod auth;

use askama::Template;
use axum::{
    response::{Html, IntoResponse, Response},
    http::StatusCode,
};

use crate::api::middleware::auth::CurrentUser;

/// Header data shared by every logged-in page.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub user_id: String,
    pub full_name: String,
}

impl From<&CurrentUser> for UserInfo {
    fn from(user: &CurrentUser) -> Self {
        Self {
            user_id: user.user_id.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: String,
    pub message: String,
}

// Make askama templates work with axum
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("Failed to render template: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template: {}", err),
                ).into_response()
            }
        }
    }
}
