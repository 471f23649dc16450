//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Profile;

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_image_url: Option<String>,
    pub id_verified: bool,
    pub rating: f64,
    pub total_ratings: i32,
    pub total_sales: i32,
    pub total_purchases: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            profile_image_url: entity.profile_image_url,
            id_verified: entity.id_verified,
            rating: entity.rating,
            total_ratings: entity.total_ratings,
            total_sales: entity.total_sales,
            total_purchases: entity.total_purchases,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
