//! Message domain models for per-order chat transcripts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A single chat message between an order's buyer and seller.
///
/// Append-only: messages are never edited or deleted; only the read flag
/// flips, once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Message {
    pub id: Uuid,
    pub order_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to append a message to an order's transcript.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AppendMessageRequest {
    #[validate(custom(function = "validate_text"))]
    pub text: String,

    /// Opaque reference into external image storage.
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

fn validate_text(text: &str) -> Result<(), ValidationError> {
    shared::validation::validate_message_text(text)
}

/// A page of an order's transcript, oldest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TranscriptResponse {
    pub data: Vec<Message>,
    /// Cursor for the next page, absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_request_validation() {
        let ok = AppendMessageRequest {
            text: "meet at the north entrance".to_string(),
            image_url: None,
        };
        assert!(ok.validate().is_ok());

        let blank = AppendMessageRequest {
            text: "   ".to_string(),
            image_url: None,
        };
        assert!(blank.validate().is_err());

        let bad_url = AppendMessageRequest {
            text: "receipt attached".to_string(),
            image_url: Some("not a url".to_string()),
        };
        assert!(bad_url.validate().is_err());

        let with_image = AppendMessageRequest {
            text: "receipt attached".to_string(),
            image_url: Some("https://storage.example.edu/receipts/abc.jpg".to_string()),
        };
        assert!(with_image.validate().is_ok());
    }
}
