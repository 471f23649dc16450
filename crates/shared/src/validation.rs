//! Common validation utilities for marketplace fields.

use chrono::{NaiveDate, NaiveTime, Utc};
use validator::ValidationError;

/// Maximum listing price in cents ($500).
const MAX_PRICE_CENTS: i32 = 50_000;

/// Maximum message text length.
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Validates that a price is positive and within the marketplace cap.
pub fn validate_price_cents(price_cents: i32) -> Result<(), ValidationError> {
    if (1..=MAX_PRICE_CENTS).contains(&price_cents) {
        Ok(())
    } else {
        let mut err = ValidationError::new("price_range");
        err.message = Some("Price must be between 1 and 50000 cents".into());
        Err(err)
    }
}

/// Validates that a pickup date is not in the past (UTC calendar date).
pub fn validate_pickup_date(date: NaiveDate) -> Result<(), ValidationError> {
    if date >= Utc::now().date_naive() {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_past");
        err.message = Some("Pickup date cannot be in the past".into());
        Err(err)
    }
}

/// Validates that an optional end time comes after the start time.
pub fn validate_time_window(start: NaiveTime, end: Option<NaiveTime>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end <= start => {
            let mut err = ValidationError::new("time_window");
            err.message = Some("End time must be after start time".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Validates that a rating score is within 1-5.
pub fn validate_score(score: i32) -> Result<(), ValidationError> {
    if (1..=5).contains(&score) {
        Ok(())
    } else {
        let mut err = ValidationError::new("score_range");
        err.message = Some("Score must be between 1 and 5".into());
        Err(err)
    }
}

/// Validates message text: non-blank and within the length cap.
pub fn validate_message_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("message_empty");
        err.message = Some("Message text cannot be empty".into());
        return Err(err);
    }
    if text.len() > MAX_MESSAGE_LENGTH {
        let mut err = ValidationError::new("message_too_long");
        err.message = Some("Message text exceeds the maximum length".into());
        return Err(err);
    }
    Ok(())
}
