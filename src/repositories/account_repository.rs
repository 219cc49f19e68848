use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::sync::Arc;
use tracing::{info, instrument};

use super::dynamodb::{optional_s, required_s, required_timestamp, DynamoDbTable, Item};
use crate::models::{ContactMessage, Profile, RepositoryResult};
use crate::observability::Metrics;

/// Trait defining the interface for contact messages and customer profiles
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn save_contact(&self, message: ContactMessage) -> RepositoryResult<ContactMessage>;

    /// Insert or replace the profile stored for `profile.owner`
    async fn upsert_profile(&self, profile: Profile) -> RepositoryResult<Profile>;

    async fn find_profile(&self, owner: &str) -> RepositoryResult<Option<Profile>>;
}

/// DynamoDB implementation of the AccountRepository trait
pub struct DynamoDbAccountRepository {
    contacts: DynamoDbTable,
    profiles: DynamoDbTable,
}

impl DynamoDbAccountRepository {
    pub fn new(
        client: Arc<DynamoDbClient>,
        contacts_table: String,
        profiles_table: String,
        region: String,
    ) -> Self {
        Self {
            contacts: DynamoDbTable::new(client.clone(), contacts_table, region.clone()),
            profiles: DynamoDbTable::new(client, profiles_table, region),
        }
    }

    pub fn with_metrics(self, metrics: Arc<Metrics>) -> Self {
        Self {
            contacts: self.contacts.with_metrics(metrics.clone()),
            profiles: self.profiles.with_metrics(metrics),
        }
    }
}

pub fn contact_to_item(message: &ContactMessage) -> Item {
    let mut item = Item::new();
    item.insert("id".to_string(), AttributeValue::S(message.id.clone()));
    item.insert("name".to_string(), AttributeValue::S(message.name.clone()));
    item.insert(
        "message".to_string(),
        AttributeValue::S(message.message.clone()),
    );
    item.insert(
        "created_at".to_string(),
        AttributeValue::S(message.created_at.to_rfc3339()),
    );
    item
}

pub fn profile_to_item(profile: &Profile) -> Item {
    let mut item = Item::new();
    item.insert("owner".to_string(), AttributeValue::S(profile.owner.clone()));
    item.insert("name".to_string(), AttributeValue::S(profile.name.clone()));
    if let Some(ref phone) = profile.phone {
        item.insert("phone".to_string(), AttributeValue::S(phone.clone()));
    }
    item.insert(
        "updated_at".to_string(),
        AttributeValue::S(profile.updated_at.to_rfc3339()),
    );
    item
}

pub fn item_to_profile(item: &Item) -> RepositoryResult<Profile> {
    Ok(Profile {
        owner: required_s(item, "owner")?.clone(),
        name: required_s(item, "name")?.clone(),
        phone: optional_s(item, "phone"),
        updated_at: required_timestamp(item, "updated_at")?,
    })
}

#[async_trait]
impl AccountRepository for DynamoDbAccountRepository {
    #[instrument(skip(self, message), fields(table = %self.contacts.name(), id = %message.id))]
    async fn save_contact(&self, message: ContactMessage) -> RepositoryResult<ContactMessage> {
        self.contacts.put(contact_to_item(&message)).await?;

        info!("Contact message stored");
        Ok(message)
    }

    #[instrument(skip(self, profile), fields(table = %self.profiles.name()))]
    async fn upsert_profile(&self, profile: Profile) -> RepositoryResult<Profile> {
        self.profiles.put(profile_to_item(&profile)).await?;

        info!("Profile saved");
        Ok(profile)
    }

    #[instrument(skip(self, owner), fields(table = %self.profiles.name()))]
    async fn find_profile(&self, owner: &str) -> RepositoryResult<Option<Profile>> {
        match self.profiles.get("owner", owner).await? {
            Some(item) => Ok(Some(item_to_profile(&item)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactRequest, ProfileUpdateRequest};

    #[test]
    fn test_profile_conversion() {
        let profile = Profile::from_request(
            "token-1",
            ProfileUpdateRequest {
                name: "Asha Devi".to_string(),
                phone: "+91 98765 43210".to_string(),
            },
        );

        let item = profile_to_item(&profile);
        assert_eq!(
            item.get("owner"),
            Some(&AttributeValue::S("token-1".to_string()))
        );
        assert_eq!(item_to_profile(&item).unwrap(), profile);
    }

    #[test]
    fn test_profile_without_phone() {
        let profile = Profile::from_request(
            "token-1",
            ProfileUpdateRequest {
                name: "Ravi".to_string(),
                phone: String::new(),
            },
        );

        let item = profile_to_item(&profile);
        assert!(!item.contains_key("phone"));
        assert_eq!(item_to_profile(&item).unwrap().phone, None);
    }

    #[test]
    fn test_contact_to_item() {
        let message = ContactMessage::from_request(ContactRequest {
            name: "Ravi".to_string(),
            message: "Is bulk pricing available?".to_string(),
        });

        let item = contact_to_item(&message);
        assert_eq!(
            item.get("message"),
            Some(&AttributeValue::S("Is bulk pricing available?".to_string()))
        );
        assert!(item.contains_key("created_at"));
    }
}
