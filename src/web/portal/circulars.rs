use askama::Template;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension,
};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    error::{AppError, Result},
    web::{
        templates::{HtmlTemplate, UserInfo},
        views::CircularView,
    },
};

#[derive(Template)]
#[template(path = "portal/circulars.html")]
pub struct CircularsTemplate {
    pub current_user: Option<UserInfo>,
    pub circulars: Vec<CircularView>,
}

#[derive(Template)]
#[template(path = "portal/circular_detail.html")]
pub struct CircularDetailTemplate {
    pub current_user: Option<UserInfo>,
    pub circular: CircularView,
}

pub async fn circulars_page(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let circulars = state.service_context.circular_repo.list_all().await?;

    Ok(HtmlTemplate(CircularsTemplate {
        current_user: Some(UserInfo::from(&current_user)),
        circulars: circulars.iter().map(CircularView::from).collect(),
    }))
}

pub async fn circular_detail_page(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let circular = state
        .service_context
        .circular_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Circular not found".to_string()))?;

    Ok(HtmlTemplate(CircularDetailTemplate {
        current_user: Some(UserInfo::from(&current_user)),
        circular: CircularView::from(&circular),
    }))
}
