//! Rating domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A per-order rating left by one participant for the other.
///
/// At most one rating per (order, rater) pair; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rating {
    pub id: Uuid,
    pub order_id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to rate the counterparty on a completed order.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitRatingRequest {
    #[validate(custom(function = "shared::validation::validate_score"))]
    pub score: i32,

    #[validate(length(max = 500, message = "Review must be at most 500 characters"))]
    pub review: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        for score in 1..=5 {
            let req = SubmitRatingRequest { score, review: None };
            assert!(req.validate().is_ok());
        }
        for score in [0, 6, -3, 100] {
            let req = SubmitRatingRequest { score, review: None };
            assert!(req.validate().is_err());
        }
    }

    #[test]
    fn test_review_length() {
        let req = SubmitRatingRequest {
            score: 5,
            review: Some("quick handoff, thanks!".to_string()),
        };
        assert!(req.validate().is_ok());

        let req = SubmitRatingRequest {
            score: 5,
            review: Some("x".repeat(501)),
        };
        assert!(req.validate().is_err());
    }
}
