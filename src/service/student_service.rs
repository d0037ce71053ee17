use std::sync::Arc;
use sqlx::SqlitePool;

use crate::{
    auth::{self, AuthService},
    domain::{
        normalize_user_id, student_id::generate_student_id, Account, CreateAccountRequest, Role,
        UpdateStudentRequest,
    },
    error::{AppError, Result},
    repository::AccountRepository,
};

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub department: String,
    pub serial: String,
    pub full_name: String,
    pub password: String,
    pub year: Option<String>,
    pub section: Option<String>,
}

pub struct StudentService {
    repo: Arc<dyn AccountRepository>,
    auth_service: Arc<AuthService>,
    pool: SqlitePool,
}

impl StudentService {
    pub fn new(repo: Arc<dyn AccountRepository>, auth_service: Arc<AuthService>, pool: SqlitePool) -> Self {
        Self { repo, auth_service, pool }
    }

    /// Derives the identifier from department and serial. A taken
    /// identifier is rejected, never bumped to the next serial.
    pub async fn create_student(&self, student: NewStudent) -> Result<Account> {
        let user_id = generate_student_id(&student.department, &student.serial)?;

        if self.repo.find_by_user_id(&user_id).await?.is_some() {
            tracing::info!(user_id = %user_id, "student creation rejected: duplicate id");
            return Err(AppError::Conflict(format!("ID {} already exists.", user_id)));
        }

        if student.full_name.trim().is_empty() {
            return Err(AppError::Validation("Full name is required.".to_string()));
        }
        if student.password.is_empty() {
            return Err(AppError::Validation("Password is required.".to_string()));
        }

        let account = self.repo.create(CreateAccountRequest {
            user_id,
            full_name: student.full_name.trim().to_string(),
            password: student.password,
            role: Role::Student,
            department: Some(student.department),
            year: student.year,
            section: student.section,
        }).await?;

        tracing::info!(user_id = %account.user_id, "student created");
        Ok(account)
    }

    pub async fn update_student(&self, user_id: &str, update: UpdateStudentRequest) -> Result<Account> {
        if update.full_name.trim().is_empty() {
            return Err(AppError::Validation("Full name is required.".to_string()));
        }
        self.repo.update_student(user_id, update).await
    }

    /// Hard delete. Returns false if there was no such student.
    pub async fn delete_student(&self, user_id: &str) -> Result<bool> {
        let Some(student) = self.repo.find_student(user_id).await? else {
            return Ok(false);
        };

        self.auth_service.invalidate_account_sessions(student.id).await?;
        let deleted = self.repo.delete_student(&student.user_id).await?;
        tracing::info!(user_id = %student.user_id, "student deleted");

        Ok(deleted)
    }

    /// Returns the normalised identifier whose password was replaced.
    pub async fn reset_password(&self, raw_user_id: &str, new_password: &str) -> Result<String> {
        let user_id = normalize_user_id(raw_user_id);

        if self.repo.find_student(&user_id).await?.is_none() {
            return Err(AppError::Validation("Student ID not found.".to_string()));
        }
        if new_password.is_empty() {
            return Err(AppError::Validation("New password cannot be empty.".to_string()));
        }

        let hash = AuthService::hash_password(new_password).await?;
        auth::set_password_hash(&self.pool, &user_id, &hash).await?;
        tracing::info!(user_id = %user_id, "student password reset");

        Ok(user_id)
    }
}
