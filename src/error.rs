use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::web::templates::{ErrorTemplate, HtmlTemplate};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message fit for a flash banner, for the variants a user can fix by
    /// resubmitting the form.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg)
            | AppError::Upload(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Missing or wrong role goes back to the login page, no 401/403.
            AppError::Unauthorized | AppError::Forbidden => {
                return Redirect::to("/").into_response();
            }
            AppError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg)
            | AppError::Upload(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let page = ErrorTemplate {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        };

        (status, HtmlTemplate(page)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        AppError::Internal(format!("Template error: {}", err))
    }
}
