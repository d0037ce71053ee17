use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub title: String,
    pub winner_name: String,
    pub winner_image: Option<String>,
    pub awarded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDraft {
    pub title: String,
    pub winner_name: String,
    pub winner_image: Option<String>,
}
