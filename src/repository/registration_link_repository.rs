use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};

use crate::{
    domain::{RegistrationLink, RegistrationLinkDraft},
    error::{AppError, Result},
    repository::RegistrationLinkRepository,
};

#[derive(FromRow)]
struct RegistrationLinkRow {
    id: i64,
    title: String,
    url: String,
    department: Option<String>,
    expires_at: Option<NaiveDateTime>,
    is_active: i32,
    created_at: NaiveDateTime,
}

impl From<RegistrationLinkRow> for RegistrationLink {
    fn from(row: RegistrationLinkRow) -> Self {
        RegistrationLink {
            id: row.id,
            title: row.title,
            url: row.url,
            department: row.department,
            expires_at: row.expires_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        }
    }
}

pub struct SqliteRegistrationLinkRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationLinkRepository for SqliteRegistrationLinkRepository {
    async fn create(&self, draft: RegistrationLinkDraft) -> Result<RegistrationLink> {
        let now = Utc::now().naive_utc();
        let expires_at_naive = draft.expires_at.map(|dt| dt.naive_utc());

        let result = sqlx::query(
            r#"
            INSERT INTO registration_links (title, url, department, expires_at, is_active, created_at)
            VALUES (?, ?, ?, ?, 1, ?)
            "#
        )
        .bind(&draft.title)
        .bind(&draft.url)
        .bind(&draft.department)
        .bind(expires_at_naive)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid()).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created registration link".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RegistrationLink>> {
        let row = sqlx::query_as::<_, RegistrationLinkRow>(
            r#"
            SELECT id, title, url, department, expires_at, is_active, created_at
            FROM registration_links
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RegistrationLink::from))
    }

    async fn list_active(&self, limit: Option<i64>) -> Result<Vec<RegistrationLink>> {
        let rows = sqlx::query_as::<_, RegistrationLinkRow>(
            r#"
            SELECT id, title, url, department, expires_at, is_active, created_at
            FROM registration_links
            WHERE is_active = 1
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RegistrationLink::from).collect())
    }

    async fn count_active(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registration_links WHERE is_active = 1"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, draft: RegistrationLinkDraft) -> Result<RegistrationLink> {
        let expires_at_naive = draft.expires_at.map(|dt| dt.naive_utc());

        let result = sqlx::query(
            r#"
            UPDATE registration_links
            SET title = ?, url = ?, department = ?, expires_at = ?
            WHERE id = ?
            "#
        )
        .bind(&draft.title)
        .bind(&draft.url)
        .bind(&draft.department)
        .bind(expires_at_naive)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Registration link {} not found", id)));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated registration link".to_string())
        })
    }

    async fn deactivate(&self, id: i64) -> Result<RegistrationLink> {
        let result = sqlx::query("UPDATE registration_links SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Registration link {} not found", id)));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve deactivated registration link".to_string())
        })
    }
}
