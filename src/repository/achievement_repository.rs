use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};

use crate::{
    domain::{Achievement, AchievementDraft},
    error::{AppError, Result},
    repository::AchievementRepository,
};

#[derive(FromRow)]
struct AchievementRow {
    id: i64,
    title: String,
    winner_name: String,
    winner_image: Option<String>,
    awarded_at: NaiveDateTime,
}

impl From<AchievementRow> for Achievement {
    fn from(row: AchievementRow) -> Self {
        Achievement {
            id: row.id,
            title: row.title,
            winner_name: row.winner_name,
            winner_image: row.winner_image,
            awarded_at: DateTime::from_naive_utc_and_offset(row.awarded_at, Utc),
        }
    }
}

pub struct SqliteAchievementRepository {
    pool: SqlitePool,
}

impl SqliteAchievementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AchievementRepository for SqliteAchievementRepository {
    async fn create(&self, draft: AchievementDraft) -> Result<Achievement> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            "INSERT INTO achievements (title, winner_name, winner_image, awarded_at) VALUES (?, ?, ?, ?)"
        )
        .bind(&draft.title)
        .bind(&draft.winner_name)
        .bind(&draft.winner_image)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid()).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created achievement".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Achievement>> {
        let row = sqlx::query_as::<_, AchievementRow>(
            "SELECT id, title, winner_name, winner_image, awarded_at FROM achievements WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Achievement::from))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Achievement>> {
        let rows = sqlx::query_as::<_, AchievementRow>(
            r#"
            SELECT id, title, winner_name, winner_image, awarded_at
            FROM achievements
            ORDER BY awarded_at DESC, id DESC
            LIMIT ?
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Achievement::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Achievement>> {
        self.list_recent(-1).await
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM achievements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, draft: AchievementDraft) -> Result<Achievement> {
        let result = sqlx::query(
            "UPDATE achievements SET title = ?, winner_name = ?, winner_image = ? WHERE id = ?"
        )
        .bind(&draft.title)
        .bind(&draft.winner_name)
        .bind(&draft.winner_image)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Achievement {} not found", id)));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated achievement".to_string())
        })
    }
}
