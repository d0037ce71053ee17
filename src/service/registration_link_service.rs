use std::sync::Arc;

use crate::{
    domain::{parse_expiry, validate_url, RegistrationLink, RegistrationLinkDraft},
    error::{AppError, Result},
    repository::RegistrationLinkRepository,
};

/// Raw form values for a link; validated before anything is written.
#[derive(Debug, Clone, Default)]
pub struct LinkInput {
    pub title: String,
    pub url: String,
    pub department: String,
    pub expiry: String,
}

pub struct RegistrationLinkService {
    repo: Arc<dyn RegistrationLinkRepository>,
}

impl RegistrationLinkService {
    pub fn new(repo: Arc<dyn RegistrationLinkRepository>) -> Self {
        Self { repo }
    }

    fn to_draft(input: LinkInput) -> Result<RegistrationLinkDraft> {
        let url = validate_url(&input.url)?;
        let expires_at = parse_expiry(&input.expiry)?;

        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Link title is required.".to_string()));
        }

        let department = input.department.trim();
        Ok(RegistrationLinkDraft {
            title,
            url,
            department: (!department.is_empty()).then(|| department.to_string()),
            expires_at,
        })
    }

    pub async fn create(&self, input: LinkInput) -> Result<RegistrationLink> {
        let draft = Self::to_draft(input)?;
        let link = self.repo.create(draft).await?;
        tracing::info!(link_id = link.id, url = %link.url, "registration link posted");
        Ok(link)
    }

    pub async fn update(&self, id: i64, input: LinkInput) -> Result<RegistrationLink> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Registration link {} not found", id)));
        }
        let draft = Self::to_draft(input)?;
        self.repo.update(id, draft).await
    }

    pub async fn deactivate(&self, id: i64) -> Result<RegistrationLink> {
        let link = self.repo.deactivate(id).await?;
        tracing::info!(link_id = link.id, "registration link deactivated");
        Ok(link)
    }
}
