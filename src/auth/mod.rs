use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

pub mod session;

use session::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "session";

pub struct AuthService {
    session_store: SessionStore,
    session_duration_hours: i64,
    secure_cookies: bool,
}

impl AuthService {
    pub fn new(pool: SqlitePool, session_duration_hours: i64, secure_cookies: bool) -> Self {
        Self {
            session_store: SessionStore::new(pool),
            session_duration_hours,
            secure_cookies,
        }
    }

    pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    pub async fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    pub async fn create_session(&self, account_id: i64) -> Result<(Session, String)> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(self.session_duration_hours);

        let session = self.session_store
            .create(account_id, &token, expires_at)
            .await?;

        Ok((session, token))
    }

    pub async fn validate_session(&self, token: &str) -> Result<Option<Session>> {
        self.session_store.touch_by_token(token).await
    }

    pub async fn invalidate_session(&self, token: &str) -> Result<()> {
        self.session_store.delete_by_token(token).await
    }

    pub async fn invalidate_account_sessions(&self, account_id: i64) -> Result<()> {
        let removed = self.session_store.delete_by_account(account_id).await?;
        tracing::debug!(account_id, removed, "revoked account sessions");
        Ok(())
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.session_store.cleanup_expired().await
    }

    pub fn create_session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.secure_cookies)
            .max_age(cookie::time::Duration::hours(self.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub async fn get_password_hash(pool: &SqlitePool, user_id: &str) -> Result<Option<String>> {
    let result = sqlx::query_scalar::<_, String>(
        "SELECT password_hash FROM accounts WHERE user_id = ?"
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(result)
}

pub async fn set_password_hash(pool: &SqlitePool, user_id: &str, password_hash: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE accounts SET password_hash = ? WHERE user_id = ?")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
