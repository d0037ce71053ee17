use askama::Template;
use axum::{
    extract::State,
    response::IntoResponse,
    Extension,
};
use chrono::Utc;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    error::Result,
    web::{
        templates::{HtmlTemplate, UserInfo},
        views::LinkView,
    },
};

#[derive(Template)]
#[template(path = "portal/registration_links.html")]
pub struct RegistrationLinksTemplate {
    pub current_user: Option<UserInfo>,
    pub links: Vec<LinkView>,
}

/// Active links only. Expired-but-active links are still listed, with a badge.
pub async fn registration_links_page(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let now = Utc::now();
    let links = state.service_context.registration_link_repo.list_active(None).await?;

    Ok(HtmlTemplate(RegistrationLinksTemplate {
        current_user: Some(UserInfo::from(&current_user)),
        links: links.iter().map(|l| LinkView::new(l, now)).collect(),
    }))
}
