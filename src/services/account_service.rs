use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    ContactMessage, ContactRequest, Profile, ProfileUpdateRequest, ServiceResult, Validate,
};
use crate::repositories::AccountRepository;

/// Contact form submissions and customer profile edits
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request))]
    pub async fn submit_contact(&self, request: ContactRequest) -> ServiceResult<ContactMessage> {
        request.validate()?;

        let message = self
            .repository
            .save_contact(ContactMessage::from_request(request))
            .await?;

        crate::info_with_trace!(id = %message.id, "Contact message received");
        Ok(message)
    }

    #[instrument(skip(self, owner, request))]
    pub async fn update_profile(
        &self,
        owner: &str,
        request: ProfileUpdateRequest,
    ) -> ServiceResult<Profile> {
        request.validate()?;

        let profile = self
            .repository
            .upsert_profile(Profile::from_request(owner, request))
            .await?;

        crate::info_with_trace!("Profile updated");
        Ok(profile)
    }

    #[instrument(skip(self, owner))]
    pub async fn get_profile(&self, owner: &str) -> ServiceResult<Option<Profile>> {
        Ok(self.repository.find_profile(owner).await?)
    }
}
