use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "General";

/// Categories offered when posting; edits accept free text.
pub const CIRCULAR_CATEGORIES: &[&str] = &["General", "Exam", "Event"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circular {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub image_filename: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircularDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub image_filename: Option<String>,
}
