//! Listing domain models: dining offers, Grubhub offers, and buyer requests.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use shared::validation::validate_price_cents;

/// Discriminator for the three listing variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    /// Seller has a dining-hall swipe to sell.
    DiningOffer,
    /// Seller has a Grubhub order to sell.
    GrubhubOffer,
    /// Buyer wants a swipe or order.
    BuyerRequest,
}

impl ListingKind {
    /// Offers are posted by sellers; requests by buyers.
    pub fn is_offer(self) -> bool {
        matches!(self, ListingKind::DiningOffer | ListingKind::GrubhubOffer)
    }
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingKind::DiningOffer => write!(f, "dining_offer"),
            ListingKind::GrubhubOffer => write!(f, "grubhub_offer"),
            ListingKind::BuyerRequest => write!(f, "buyer_request"),
        }
    }
}

/// Lifecycle status of a listing.
///
/// Transitions only active → accepted and active → cancelled; terminal
/// states never revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Accepted,
    Cancelled,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingStatus::Active => write!(f, "active"),
            ListingStatus::Accepted => write!(f, "accepted"),
            ListingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A posted offer or buyer request, prior to acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: ListingKind,
    /// Dining hall or restaurant name.
    pub venue: String,
    pub pickup_date: NaiveDate,
    pub start_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub price_cents: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

lazy_static::lazy_static! {
    static ref VENUE_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 .,'&()-]{1,79}$").unwrap();
}

/// Request to create a listing.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateListingRequest {
    pub kind: ListingKind,

    /// Dining hall or restaurant name.
    #[validate(regex(
        path = "*VENUE_REGEX",
        message = "Venue must be 2-80 characters: letters, digits and basic punctuation"
    ))]
    pub venue: String,

    pub pickup_date: NaiveDate,

    pub start_time: NaiveTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,

    #[validate(custom(function = "validate_price_cents"))]
    pub price_cents: i32,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

impl CreateListingRequest {
    /// Cross-field checks the derive cannot express: the pickup date must not
    /// be in the past and the time window must be well-formed.
    pub fn validate_semantics(&self) -> Result<(), ValidationError> {
        shared::validation::validate_pickup_date(self.pickup_date)?;
        shared::validation::validate_time_window(self.start_time, self.end_time)?;
        Ok(())
    }
}

/// Browse filters for active listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListingFilters {
    pub kind: Option<ListingKind>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub venue: Option<String>,
}
