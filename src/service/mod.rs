pub mod account_service;
pub mod registration_link_service;
pub mod student_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use crate::auth::AuthService;
use account_service::AccountService;
use registration_link_service::RegistrationLinkService;
use student_service::StudentService;

pub struct ServiceContext {
    pub account_repo: Arc<dyn AccountRepository>,
    pub circular_repo: Arc<dyn CircularRepository>,
    pub feedback_repo: Arc<dyn FeedbackRepository>,
    pub achievement_repo: Arc<dyn AchievementRepository>,
    pub registration_link_repo: Arc<dyn RegistrationLinkRepository>,
    pub auth_service: Arc<AuthService>,
    pub account_service: Arc<AccountService>,
    pub student_service: Arc<StudentService>,
    pub registration_link_service: Arc<RegistrationLinkService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        circular_repo: Arc<dyn CircularRepository>,
        feedback_repo: Arc<dyn FeedbackRepository>,
        achievement_repo: Arc<dyn AchievementRepository>,
        registration_link_repo: Arc<dyn RegistrationLinkRepository>,
        auth_service: Arc<AuthService>,
        db_pool: SqlitePool,
    ) -> Self {
        let account_service = Arc::new(AccountService::new(account_repo.clone(), db_pool.clone()));
        let student_service = Arc::new(StudentService::new(
            account_repo.clone(),
            auth_service.clone(),
            db_pool.clone(),
        ));
        let registration_link_service =
            Arc::new(RegistrationLinkService::new(registration_link_repo.clone()));

        Self {
            account_repo,
            circular_repo,
            feedback_repo,
            achievement_repo,
            registration_link_repo,
            auth_service,
            account_service,
            student_service,
            registration_link_service,
            db_pool,
        }
    }

    /// Wires every repository to the same SQLite pool.
    pub fn from_pool(db_pool: SqlitePool, auth_service: Arc<AuthService>) -> Self {
        Self::new(
            Arc::new(SqliteAccountRepository::new(db_pool.clone())),
            Arc::new(SqliteCircularRepository::new(db_pool.clone())),
            Arc::new(SqliteFeedbackRepository::new(db_pool.clone())),
            Arc::new(SqliteAchievementRepository::new(db_pool.clone())),
            Arc::new(SqliteRegistrationLinkRepository::new(db_pool.clone())),
            auth_service,
            db_pool,
        )
    }
}
