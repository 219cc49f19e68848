use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_document_id;

/// Contact form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub message: String,
}

/// Stored contact message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Profile edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// Customer profile keyed by bearer credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing)]
    pub owner: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn from_request(request: ContactRequest) -> Self {
        Self {
            id: new_document_id(),
            name: request.name.trim().to_string(),
            message: request.message.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

impl Profile {
    /// Build a profile from the edit form; a blank phone clears the number
    pub fn from_request(owner: impl Into<String>, request: ProfileUpdateRequest) -> Self {
        let phone = request.phone.trim();
        Self {
            owner: owner.into(),
            name: request.name.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            updated_at: Utc::now(),
        }
    }

    pub fn phone_or_default(&self) -> &str {
        self.phone.as_deref().unwrap_or("Not provided")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_blank_phone_is_cleared() {
        let profile = Profile::from_request(
            "token",
            ProfileUpdateRequest {
                name: "  Asha Devi ".to_string(),
                phone: "   ".to_string(),
            },
        );

        assert_eq!(profile.name, "Asha Devi");
        assert_eq!(profile.phone, None);
        assert_eq!(profile.phone_or_default(), "Not provided");
    }

    #[test]
    fn test_profile_request_accepts_missing_phone() {
        let request: ProfileUpdateRequest = serde_json::from_str(r#"{"name":"Ravi"}"#).unwrap();
        assert_eq!(request.phone, "");
    }

    #[test]
    fn test_contact_message_trims_input() {
        let message = ContactMessage::from_request(ContactRequest {
            name: " Ravi ".to_string(),
            message: " Need seeds \n".to_string(),
        });

        assert_eq!(message.name, "Ravi");
        assert_eq!(message.message, "Need seeds");
    }
}
