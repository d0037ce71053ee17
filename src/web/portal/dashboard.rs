use askama::Template;
use axum::{
    extract::State,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::SignedCookieJar;
use chrono::Utc;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::Role,
    error::Result,
    web::{
        flash::{self, FlashMessage},
        templates::{HtmlTemplate, UserInfo},
        views::{AchievementView, CircularView, DashboardStats, LinkView},
    },
};

const DASHBOARD_ITEMS: i64 = 5;

#[derive(Template)]
#[template(path = "portal/dashboard.html")]
pub struct StudentDashboardTemplate {
    pub current_user: Option<UserInfo>,
    pub flash: Option<FlashMessage>,
    pub stats: DashboardStats,
    pub circulars: Vec<CircularView>,
    pub achievements: Vec<AchievementView>,
    pub links: Vec<LinkView>,
}

pub async fn student_dashboard(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse> {
    let context = &state.service_context;
    let now = Utc::now();

    let circulars = context.circular_repo.list_recent(DASHBOARD_ITEMS).await?;
    let achievements = context.achievement_repo.list_recent(DASHBOARD_ITEMS).await?;
    let links = context.registration_link_repo.list_active(Some(DASHBOARD_ITEMS)).await?;

    let stats = DashboardStats {
        circulars: context.circular_repo.count().await?,
        achievements: context.achievement_repo.count().await?,
        students: context.account_repo.count_by_role(Role::Student).await?,
        active_links: context.registration_link_repo.count_active().await?,
    };

    let (jar, flash) = flash::take(jar);

    let template = StudentDashboardTemplate {
        current_user: Some(UserInfo::from(&current_user)),
        flash,
        stats,
        circulars: circulars.iter().map(CircularView::from).collect(),
        achievements: achievements.iter().map(AchievementView::from).collect(),
        links: links.iter().map(|l| LinkView::new(l, now)).collect(),
    };

    Ok((jar, HtmlTemplate(template)))
}
