use async_trait::async_trait;
use crate::domain::*;
use crate::error::Result;

pub mod account_repository;
pub mod achievement_repository;
pub mod circular_repository;
pub mod feedback_repository;
pub mod registration_link_repository;

pub use account_repository::SqliteAccountRepository;
pub use achievement_repository::SqliteAchievementRepository;
pub use circular_repository::SqliteCircularRepository;
pub use feedback_repository::SqliteFeedbackRepository;
pub use registration_link_repository::SqliteRegistrationLinkRepository;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: CreateAccountRequest) -> Result<Account>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>>;
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Account>>;
    async fn find_student(&self, user_id: &str) -> Result<Option<Account>>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>>;
    async fn count_by_role(&self, role: Role) -> Result<i64>;
    async fn update_student(&self, user_id: &str, update: UpdateStudentRequest) -> Result<Account>;
    /// Returns false when no student has that identifier.
    async fn delete_student(&self, user_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait CircularRepository: Send + Sync {
    async fn create(&self, draft: CircularDraft) -> Result<Circular>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Circular>>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Circular>>;
    async fn list_all(&self) -> Result<Vec<Circular>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: i64, draft: CircularDraft) -> Result<Circular>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Stores the rating as given; range checks belong to the caller.
    async fn create(&self, feedback: NewFeedback) -> Result<Feedback>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Feedback>>;
    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait AchievementRepository: Send + Sync {
    async fn create(&self, draft: AchievementDraft) -> Result<Achievement>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Achievement>>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Achievement>>;
    async fn list_all(&self) -> Result<Vec<Achievement>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: i64, draft: AchievementDraft) -> Result<Achievement>;
}

#[async_trait]
pub trait RegistrationLinkRepository: Send + Sync {
    async fn create(&self, draft: RegistrationLinkDraft) -> Result<RegistrationLink>;
    async fn find_by_id(&self, id: i64) -> Result<Option<RegistrationLink>>;
    /// Active links only, newest first.
    async fn list_active(&self, limit: Option<i64>) -> Result<Vec<RegistrationLink>>;
    async fn count_active(&self) -> Result<i64>;
    async fn update(&self, id: i64, draft: RegistrationLinkDraft) -> Result<RegistrationLink>;
    async fn deactivate(&self, id: i64) -> Result<RegistrationLink>;
}
