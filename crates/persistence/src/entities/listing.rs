//! Listing entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Listing, ListingKind, ListingStatus};

/// Database representation of the listing kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "listing_kind", rename_all = "snake_case")]
pub enum ListingKindDb {
    DiningOffer,
    GrubhubOffer,
    BuyerRequest,
}

impl From<ListingKindDb> for ListingKind {
    fn from(db_kind: ListingKindDb) -> Self {
        match db_kind {
            ListingKindDb::DiningOffer => ListingKind::DiningOffer,
            ListingKindDb::GrubhubOffer => ListingKind::GrubhubOffer,
            ListingKindDb::BuyerRequest => ListingKind::BuyerRequest,
        }
    }
}

impl From<ListingKind> for ListingKindDb {
    fn from(kind: ListingKind) -> Self {
        match kind {
            ListingKind::DiningOffer => ListingKindDb::DiningOffer,
            ListingKind::GrubhubOffer => ListingKindDb::GrubhubOffer,
            ListingKind::BuyerRequest => ListingKindDb::BuyerRequest,
        }
    }
}

/// Database representation of the listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
pub enum ListingStatusDb {
    Active,
    Accepted,
    Cancelled,
}

impl From<ListingStatusDb> for ListingStatus {
    fn from(db_status: ListingStatusDb) -> Self {
        match db_status {
            ListingStatusDb::Active => ListingStatus::Active,
            ListingStatusDb::Accepted => ListingStatus::Accepted,
            ListingStatusDb::Cancelled => ListingStatus::Cancelled,
        }
    }
}

impl From<ListingStatus> for ListingStatusDb {
    fn from(status: ListingStatus) -> Self {
        match status {
            ListingStatus::Active => ListingStatusDb::Active,
            ListingStatus::Accepted => ListingStatusDb::Accepted,
            ListingStatus::Cancelled => ListingStatusDb::Cancelled,
        }
    }
}

/// Database row mapping for the listings table.
#[derive(Debug, Clone, FromRow)]
pub struct ListingEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: ListingKindDb,
    pub venue: String,
    pub pickup_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub price_cents: i32,
    pub notes: Option<String>,
    pub status: ListingStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ListingEntity> for Listing {
    fn from(entity: ListingEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            kind: entity.kind.into(),
            venue: entity.venue,
            pickup_date: entity.pickup_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            price_cents: entity.price_cents,
            notes: entity.notes,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
