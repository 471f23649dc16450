//! Order domain model and lifecycle status.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::listing::ListingKind;

/// Lifecycle status of an order.
///
/// Statuses only advance along pending → confirmed → completed → delivered,
/// or jump once to cancelled from any non-terminal state. Orders created by
/// accepting a listing start at `confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Delivered is the absorbing success state; cancelled the failure one.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Ratings open up once the seller has completed or the buyer has
    /// confirmed delivery.
    pub fn allows_rating(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Delivered)
    }

    /// Whether moving from `self` to `next` is a defined lifecycle edge.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Completed)
                | (Confirmed, Delivered)
                | (Completed, Delivered)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Completed, Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Role a user plays on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRole {
    Buyer,
    Seller,
}

/// The transactional record created once a listing is accepted.
///
/// Exactly one of the three listing-reference fields is set, matching the
/// kind of the originating listing. Orders are never deleted; they form the
/// audit history behind ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Order {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dining_offer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grubhub_offer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_request_id: Option<Uuid>,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub item_kind: ListingKind,
    pub venue: String,
    pub pickup_date: NaiveDate,
    pub start_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub price_cents: i32,
    pub status: OrderStatus,
    pub buyer_rated: bool,
    pub seller_rated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Role the given user plays on this order, if any.
    pub fn role_of(&self, user_id: Uuid) -> Option<OrderRole> {
        if user_id == self.buyer_id {
            Some(OrderRole::Buyer)
        } else if user_id == self.seller_id {
            Some(OrderRole::Seller)
        } else {
            None
        }
    }

    /// The counterparty of the given participant.
    pub fn counterparty_of(&self, user_id: Uuid) -> Option<Uuid> {
        match self.role_of(user_id)? {
            OrderRole::Buyer => Some(self.seller_id),
            OrderRole::Seller => Some(self.buyer_id),
        }
    }
}

/// Maps a listing kind and id onto the three reference columns.
pub fn listing_refs(
    kind: ListingKind,
    listing_id: Uuid,
) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
    match kind {
        ListingKind::DiningOffer => (Some(listing_id), None, None),
        ListingKind::GrubhubOffer => (None, Some(listing_id), None),
        ListingKind::BuyerRequest => (None, None, Some(listing_id)),
    }
}
