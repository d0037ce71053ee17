use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};

use crate::{
    domain::{Feedback, NewFeedback},
    error::Result,
    repository::FeedbackRepository,
};

#[derive(FromRow)]
struct FeedbackRow {
    id: i64,
    user_id: String,
    body: String,
    rating: i64,
    submitted_at: NaiveDateTime,
}

pub struct SqliteFeedbackRepository {
    pool: SqlitePool,
}

impl SqliteFeedbackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn create(&self, feedback: NewFeedback) -> Result<Feedback> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO feedback (user_id, body, rating, submitted_at) VALUES (?, ?, ?, ?)"
        )
        .bind(&feedback.user_id)
        .bind(&feedback.body)
        .bind(feedback.rating)
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(Feedback {
            id: result.last_insert_rowid(),
            user_id: feedback.user_id,
            body: feedback.body,
            rating: feedback.rating,
            submitted_at: now,
        })
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT id, user_id, body, rating, submitted_at
            FROM feedback
            ORDER BY submitted_at DESC, id DESC
            LIMIT ?
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Feedback {
                id: row.id,
                user_id: row.user_id,
                body: row.body,
                rating: row.rating,
                submitted_at: DateTime::from_naive_utc_and_offset(row.submitted_at, Utc),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM feedback")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
