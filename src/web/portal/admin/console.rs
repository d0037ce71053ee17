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
        views::{
            circular_categories, pg_departments, ug_departments, AchievementView, AdminStats,
            CircularView, DepartmentOption, FeedbackView, LinkView, StudentView,
        },
    },
};

const RECENT_CIRCULARS: i64 = 10;
const RECENT_FEEDBACK: i64 = 50;
const RECENT_ACHIEVEMENTS: i64 = 10;
const RECENT_LINKS: i64 = 10;

#[derive(Template)]
#[template(path = "admin/console.html")]
pub struct AdminConsoleTemplate {
    pub current_user: Option<UserInfo>,
    pub flash: Option<FlashMessage>,
    pub stats: AdminStats,
    pub students: Vec<StudentView>,
    pub circulars: Vec<CircularView>,
    pub feedback: Vec<FeedbackView>,
    pub achievements: Vec<AchievementView>,
    pub links: Vec<LinkView>,
    pub ug_departments: Vec<DepartmentOption>,
    pub pg_departments: Vec<DepartmentOption>,
    pub categories: Vec<String>,
}

pub async fn admin_console(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse> {
    let context = &state.service_context;
    let now = Utc::now();

    let students = context.account_repo.list_by_role(Role::Student).await?;
    let circulars = context.circular_repo.list_recent(RECENT_CIRCULARS).await?;
    let feedback = context.feedback_repo.list_recent(RECENT_FEEDBACK).await?;
    let achievements = context.achievement_repo.list_recent(RECENT_ACHIEVEMENTS).await?;
    let links = context.registration_link_repo.list_active(Some(RECENT_LINKS)).await?;

    let stats = AdminStats {
        students: students.len() as i64,
        circulars: context.circular_repo.count().await?,
        feedback: context.feedback_repo.count().await?,
        active_links: context.registration_link_repo.count_active().await?,
    };

    let (jar, flash) = flash::take(jar);

    let template = AdminConsoleTemplate {
        current_user: Some(UserInfo::from(&current_user)),
        flash,
        stats,
        students: students.iter().map(StudentView::from).collect(),
        circulars: circulars.iter().map(CircularView::from).collect(),
        feedback: feedback.iter().map(FeedbackView::from).collect(),
        achievements: achievements.iter().map(AchievementView::from).collect(),
        links: links.iter().map(|l| LinkView::new(l, now)).collect(),
        ug_departments: ug_departments(),
        pg_departments: pg_departments(),
        categories: circular_categories(),
    };

    Ok((jar, HtmlTemplate(template)))
}
