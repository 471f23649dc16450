//! Message entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Message;

/// Database row mapping for the messages table.
#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: Uuid,
    pub order_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub text: String,
    pub image_url: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<MessageEntity> for Message {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.id,
            order_id: entity.order_id,
            sender_id: entity.sender_id,
            receiver_id: entity.receiver_id,
            text: entity.text,
            image_url: entity.image_url,
            is_read: entity.is_read,
            created_at: entity.created_at,
        }
    }
}
