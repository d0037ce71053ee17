use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};

use crate::{
    auth::AuthService,
    domain::{Account, CreateAccountRequest, Role, UpdateStudentRequest},
    error::{AppError, Result},
    repository::AccountRepository,
};

// Database row struct that matches SQLite schema
#[derive(FromRow)]
struct AccountRow {
    id: i64,
    user_id: String,
    full_name: String,
    role: String,
    department: Option<String>,
    year: Option<String>,
    section: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: AccountRow) -> Result<Account> {
        Ok(Account {
            id: row.id,
            user_id: row.user_id,
            full_name: row.full_name,
            role: Role::parse(&row.role)
                .ok_or_else(|| AppError::Database(format!("Invalid role: {}", row.role)))?,
            department: row.department,
            year: row.year,
            section: row.section,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, user_id, full_name, role, department, year, section, created_at
    FROM accounts
"#;

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, request: CreateAccountRequest) -> Result<Account> {
        let password_hash = AuthService::hash_password(&request.password).await?;
        let now_naive = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (
                user_id, password_hash, full_name, role,
                department, year, section, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&request.user_id)
        .bind(&password_hash)
        .bind(&request.full_name)
        .bind(request.role.as_str())
        .bind(&request.department)
        .bind(&request.year)
        .bind(&request.section)
        .bind(now_naive)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("ID {} already exists.", request.user_id))
            }
            other => AppError::Database(other.to_string()),
        })?;

        self.find_by_id(result.last_insert_rowid()).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created account".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{} WHERE id = ?", SELECT_ACCOUNT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_account).transpose()
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{} WHERE user_id = ?", SELECT_ACCOUNT))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_account).transpose()
    }

    async fn find_student(&self, user_id: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            &format!("{} WHERE user_id = ? AND role = ?", SELECT_ACCOUNT)
        )
        .bind(user_id)
        .bind(Role::Student.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_account).transpose()
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            &format!("{} WHERE role = ? ORDER BY created_at DESC, id DESC", SELECT_ACCOUNT)
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_account)
            .collect()
    }

    async fn count_by_role(&self, role: Role) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts WHERE role = ?")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update_student(&self, user_id: &str, update: UpdateStudentRequest) -> Result<Account> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET full_name = ?, department = ?, year = ?, section = ?
            WHERE user_id = ? AND role = ?
            "#
        )
        .bind(&update.full_name)
        .bind(&update.department)
        .bind(&update.year)
        .bind(&update.section)
        .bind(user_id)
        .bind(Role::Student.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Student {} not found", user_id)));
        }

        self.find_student(user_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated account".to_string())
        })
    }

    async fn delete_student(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE user_id = ? AND role = ?")
            .bind(user_id)
            .bind(Role::Student.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
