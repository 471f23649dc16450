//! Profile domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A student profile with derived marketplace aggregates.
///
/// `rating` is the running mean of all ratings received; `total_sales` and
/// `total_purchases` count orders that reached delivered as seller/buyer.
/// Profiles are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub id_verified: bool,
    pub rating: f64,
    pub total_ratings: i32,
    pub total_sales: i32,
    pub total_purchases: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What other students see when browsing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub id_verified: bool,
    pub rating: f64,
    pub total_ratings: i32,
    pub total_sales: i32,
    pub total_purchases: i32,
}

impl From<Profile> for PublicProfile {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            profile_image_url: p.profile_image_url,
            id_verified: p.id_verified,
            rating: p.rating,
            total_ratings: p.total_ratings,
            total_sales: p.total_sales,
            total_purchases: p.total_purchases,
        }
    }
}

/// Request to create or update the caller's own profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpsertProfileRequest {
    #[validate(length(min = 1, max = 80, message = "Name must be 1-80 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    #[validate(url(message = "profile_image_url must be a valid URL"))]
    pub profile_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_validation() {
        let ok = UpsertProfileRequest {
            name: "Oski Bear".to_string(),
            email: "oski@berkeley.edu".to_string(),
            phone: None,
            profile_image_url: None,
        };
        assert!(ok.validate().is_ok());

        let bad_email = UpsertProfileRequest {
            email: "not-an-email".to_string(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());

        let blank_name = UpsertProfileRequest {
            name: String::new(),
            ..ok
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_public_profile_hides_contact_info() {
        let profile = Profile {
            id: Uuid::new_v4(),
            name: "Oski".to_string(),
            email: "oski@berkeley.edu".to_string(),
            phone: Some("555-0100".to_string()),
            profile_image_url: None,
            id_verified: true,
            rating: 4.5,
            total_ratings: 2,
            total_sales: 3,
            total_purchases: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public: PublicProfile = profile.into();
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("berkeley.edu"));
        assert!(!json.contains("555-0100"));
        assert!(json.contains("\"rating\":4.5"));
    }
}
