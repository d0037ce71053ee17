use chrono::{DateTime, NaiveDateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::error::Result;

/// A server-side login. Only the SHA-256 of the cookie token is stored.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub account_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct SessionRow {
    id: String,
    account_id: i64,
    token_hash: String,
    expires_at: NaiveDateTime,
    created_at: NaiveDateTime,
    last_used_at: NaiveDateTime,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            account_id: row.account_id,
            token_hash: row.token_hash,
            expires_at: DateTime::from_naive_utc_and_offset(row.expires_at, Utc),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            last_used_at: DateTime::from_naive_utc_and_offset(row.last_used_at, Utc),
        }
    }
}

pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        account_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session> {
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, account_id, token_hash, expires_at, created_at, last_used_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, account_id, token_hash, expires_at, created_at, last_used_at
            "#
        )
        .bind(Uuid::new_v4().to_string())
        .bind(account_id)
        .bind(hash_token(token))
        .bind(expires_at.naive_utc())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Resolves a live session and stamps it as used in the same statement.
    pub async fn touch_by_token(&self, token: &str) -> Result<Option<Session>> {
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            UPDATE sessions SET last_used_at = ?
            WHERE token_hash = ? AND expires_at > ?
            RETURNING id, account_id, token_hash, expires_at, created_at, last_used_at
            "#
        )
        .bind(now)
        .bind(hash_token(token))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    pub async fn delete_by_token(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_by_account(&self, account_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE account_id = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn cleanup_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
