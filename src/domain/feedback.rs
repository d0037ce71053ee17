use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    /// Submitter's account identifier; not enforced as a foreign key.
    pub user_id: String,
    pub body: String,
    pub rating: i64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub user_id: String,
    pub body: String,
    pub rating: i64,
}
