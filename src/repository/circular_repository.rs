use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};

use crate::{
    domain::{Circular, CircularDraft},
    error::{AppError, Result},
    repository::CircularRepository,
};

#[derive(FromRow)]
struct CircularRow {
    id: i64,
    title: String,
    content: String,
    category: String,
    image_filename: Option<String>,
    published_at: NaiveDateTime,
}

impl From<CircularRow> for Circular {
    fn from(row: CircularRow) -> Self {
        Circular {
            id: row.id,
            title: row.title,
            content: row.content,
            category: row.category,
            image_filename: row.image_filename,
            published_at: DateTime::from_naive_utc_and_offset(row.published_at, Utc),
        }
    }
}

pub struct SqliteCircularRepository {
    pool: SqlitePool,
}

impl SqliteCircularRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CircularRepository for SqliteCircularRepository {
    async fn create(&self, draft: CircularDraft) -> Result<Circular> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO circulars (title, content, category, image_filename, published_at)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&draft.category)
        .bind(&draft.image_filename)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid()).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created circular".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Circular>> {
        let row = sqlx::query_as::<_, CircularRow>(
            r#"
            SELECT id, title, content, category, image_filename, published_at
            FROM circulars
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Circular::from))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Circular>> {
        let rows = sqlx::query_as::<_, CircularRow>(
            r#"
            SELECT id, title, content, category, image_filename, published_at
            FROM circulars
            ORDER BY published_at DESC, id DESC
            LIMIT ?
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Circular::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Circular>> {
        // SQLite treats a negative LIMIT as unbounded
        self.list_recent(-1).await
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM circulars")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, draft: CircularDraft) -> Result<Circular> {
        let result = sqlx::query(
            r#"
            UPDATE circulars
            SET title = ?, content = ?, category = ?, image_filename = ?
            WHERE id = ?
            "#
        )
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&draft.category)
        .bind(&draft.image_filename)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Circular {} not found", id)));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated circular".to_string())
        })
    }
}
