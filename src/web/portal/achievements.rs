use askama::Template;
use axum::{
    extract::State,
    response::IntoResponse,
    Extension,
};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    error::Result,
    web::{
        templates::{HtmlTemplate, UserInfo},
        views::AchievementView,
    },
};

#[derive(Template)]
#[template(path = "portal/achievements.html")]
pub struct AchievementsTemplate {
    pub current_user: Option<UserInfo>,
    pub achievements: Vec<AchievementView>,
}

pub async fn achievements_page(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let achievements = state.service_context.achievement_repo.list_all().await?;

    Ok(HtmlTemplate(AchievementsTemplate {
        current_user: Some(UserInfo::from(&current_user)),
        achievements: achievements.iter().map(AchievementView::from).collect(),
    }))
}
