//! Rating entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Rating;

/// Database row mapping for the ratings table.
///
/// Uniqueness of (order_id, rater_id) is a table constraint; the repository
/// surfaces violations as duplicate submissions.
#[derive(Debug, Clone, FromRow)]
pub struct RatingEntity {
    pub id: Uuid,
    pub order_id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub score: i32,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RatingEntity> for Rating {
    fn from(entity: RatingEntity) -> Self {
        Self {
            id: entity.id,
            order_id: entity.order_id,
            rater_id: entity.rater_id,
            rated_user_id: entity.rated_user_id,
            score: entity.score,
            review: entity.review,
            created_at: entity.created_at,
        }
    }
}
