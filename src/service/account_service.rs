use std::sync::Arc;
use sqlx::SqlitePool;

use crate::{
    auth::{self, AuthService},
    config::BootstrapConfig,
    domain::{normalize_user_id, Account, CreateAccountRequest, Role},
    error::{AppError, Result},
    repository::AccountRepository,
};

pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>, pool: SqlitePool) -> Self {
        Self { repo, pool }
    }

    /// Resolves a login attempt. `Ok(None)` covers both an unknown
    /// identifier and a wrong password.
    pub async fn authenticate(&self, raw_user_id: &str, password: &str) -> Result<Option<Account>> {
        let user_id = normalize_user_id(raw_user_id);

        let Some(account) = self.repo.find_by_user_id(&user_id).await? else {
            tracing::info!(user_id = %user_id, "login rejected: unknown account");
            return Ok(None);
        };

        let Some(hash) = auth::get_password_hash(&self.pool, &account.user_id).await? else {
            return Ok(None);
        };

        if AuthService::verify_password(password, &hash).await? {
            tracing::info!(user_id = %account.user_id, role = account.role.as_str(), "login accepted");
            Ok(Some(account))
        } else {
            tracing::info!(user_id = %account.user_id, "login rejected: wrong password");
            Ok(None)
        }
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        let current_hash = auth::get_password_hash(&self.pool, user_id).await?;
        let current_ok = match current_hash {
            Some(hash) => AuthService::verify_password(current_password, &hash).await?,
            None => false,
        };

        if !current_ok {
            return Err(AppError::Validation("Current password is incorrect.".to_string()));
        }

        if new_password != confirm_password {
            return Err(AppError::Validation(
                "New password and confirm password do not match.".to_string(),
            ));
        }

        if new_password.is_empty() {
            return Err(AppError::Validation("New password cannot be empty.".to_string()));
        }

        let new_hash = AuthService::hash_password(new_password).await?;
        auth::set_password_hash(&self.pool, user_id, &new_hash).await?;
        tracing::info!(user_id = %user_id, "password changed");

        Ok(())
    }

    /// Creates the configured administrator when the store has none.
    pub async fn ensure_bootstrap_admin(&self, bootstrap: &BootstrapConfig) -> Result<Option<Account>> {
        if self.repo.count_by_role(Role::Admin).await? > 0 {
            return Ok(None);
        }

        let admin = self.repo.create(CreateAccountRequest {
            user_id: normalize_user_id(&bootstrap.admin_user_id),
            full_name: bootstrap.admin_full_name.clone(),
            password: bootstrap.admin_password.clone(),
            role: Role::Admin,
            department: None,
            year: None,
            section: None,
        }).await?;

        tracing::warn!(
            user_id = %admin.user_id,
            "created bootstrap administrator; change its password from the admin console"
        );

        Ok(Some(admin))
    }
}
