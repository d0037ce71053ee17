//! Rendering structs for the askama templates. Everything here is pure so
//! the formatting rules can be checked without a server.

use chrono::{DateTime, Utc};

use crate::domain::{
    student_id::{department_code, DEPARTMENT_CODES, PG_DEPARTMENTS},
    Account, Achievement, Circular, Feedback, RegistrationLink, CIRCULAR_CATEGORIES, MAX_RATING,
};

const EXCERPT_CHARS: usize = 160;
const DATE_FORMAT: &str = "%d %b %Y";
const DATETIME_FORMAT: &str = "%d %b %Y %H:%M";
/// Matches the `datetime-local` input widget.
const EXPIRY_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Public URL of a stored upload.
pub fn upload_url(file_name: &str) -> String {
    format!("/static/uploads/{}", file_name)
}

fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[derive(Debug, Clone)]
pub struct CircularView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub image_url: Option<String>,
    pub published: String,
}

impl From<&Circular> for CircularView {
    fn from(circular: &Circular) -> Self {
        Self {
            id: circular.id,
            title: circular.title.clone(),
            content: circular.content.clone(),
            excerpt: excerpt(&circular.content),
            category: circular.category.clone(),
            image_url: circular.image_filename.as_deref().map(upload_url),
            published: circular.published_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AchievementView {
    pub id: i64,
    pub title: String,
    pub winner_name: String,
    pub image_url: Option<String>,
    pub awarded: String,
}

impl From<&Achievement> for AchievementView {
    fn from(achievement: &Achievement) -> Self {
        Self {
            id: achievement.id,
            title: achievement.title.clone(),
            winner_name: achievement.winner_name.clone(),
            image_url: achievement.winner_image.as_deref().map(upload_url),
            awarded: achievement.awarded_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkView {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub department: String,
    pub expires: Option<String>,
    /// Prefill for the edit form, empty when there is no expiry.
    pub expiry_input: String,
    pub is_expired: bool,
    pub created: String,
}

impl LinkView {
    pub fn new(link: &RegistrationLink, now: DateTime<Utc>) -> Self {
        Self {
            id: link.id,
            title: link.title.clone(),
            url: link.url.clone(),
            department: link.department.clone().unwrap_or_default(),
            expires: link.expires_at.map(|at| at.format(DATETIME_FORMAT).to_string()),
            expiry_input: link
                .expires_at
                .map(|at| at.format(EXPIRY_INPUT_FORMAT).to_string())
                .unwrap_or_default(),
            is_expired: link.is_expired(now),
            created: link.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackView {
    pub user_id: String,
    pub body: String,
    pub rating: i64,
    pub stars: String,
    pub submitted: String,
}

impl From<&Feedback> for FeedbackView {
    fn from(feedback: &Feedback) -> Self {
        let filled = feedback.rating.clamp(0, MAX_RATING) as usize;
        let empty = MAX_RATING as usize - filled;

        Self {
            user_id: feedback.user_id.clone(),
            body: feedback.body.clone(),
            rating: feedback.rating,
            stars: format!("{}{}", "★".repeat(filled), "☆".repeat(empty)),
            submitted: feedback.submitted_at.format(DATETIME_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudentView {
    pub user_id: String,
    pub full_name: String,
    pub department: String,
    pub year: String,
    pub section: String,
    pub joined: String,
}

impl From<&Account> for StudentView {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.user_id.clone(),
            full_name: account.full_name.clone(),
            department: account.department.clone().unwrap_or_default(),
            year: account.year.clone().unwrap_or_default(),
            section: account.section.clone().unwrap_or_default(),
            joined: account.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub circulars: i64,
    pub achievements: i64,
    pub students: i64,
    pub active_links: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AdminStats {
    pub students: i64,
    pub circulars: i64,
    pub feedback: i64,
    pub active_links: i64,
}

/// A department entry for the admin select box.
#[derive(Debug, Clone)]
pub struct DepartmentOption {
    pub name: String,
    pub code: String,
}

pub fn ug_departments() -> Vec<DepartmentOption> {
    DEPARTMENT_CODES
        .iter()
        .map(|(name, code)| DepartmentOption { name: name.to_string(), code: code.to_string() })
        .collect()
}

pub fn pg_departments() -> Vec<DepartmentOption> {
    PG_DEPARTMENTS
        .iter()
        .map(|name| DepartmentOption { name: name.to_string(), code: department_code(name).to_string() })
        .collect()
}

pub fn circular_categories() -> Vec<String> {
    CIRCULAR_CATEGORIES.iter().map(|c| c.to_string()).collect()
}
