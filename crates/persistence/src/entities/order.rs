//! Order entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgTypeInfo;
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Order, OrderStatus};

use super::listing::ListingKindDb;

/// Database representation of the order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
pub enum OrderStatusDb {
    Pending,
    Confirmed,
    Completed,
    Delivered,
    Cancelled,
}

// Needed to bind &[OrderStatusDb] for `status = ANY($n)` conditions.
impl sqlx::postgres::PgHasArrayType for OrderStatusDb {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_order_status")
    }
}

impl From<OrderStatusDb> for OrderStatus {
    fn from(db_status: OrderStatusDb) -> Self {
        match db_status {
            OrderStatusDb::Pending => OrderStatus::Pending,
            OrderStatusDb::Confirmed => OrderStatus::Confirmed,
            OrderStatusDb::Completed => OrderStatus::Completed,
            OrderStatusDb::Delivered => OrderStatus::Delivered,
            OrderStatusDb::Cancelled => OrderStatus::Cancelled,
        }
    }
}

impl From<OrderStatus> for OrderStatusDb {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => OrderStatusDb::Pending,
            OrderStatus::Confirmed => OrderStatusDb::Confirmed,
            OrderStatus::Completed => OrderStatusDb::Completed,
            OrderStatus::Delivered => OrderStatusDb::Delivered,
            OrderStatus::Cancelled => OrderStatusDb::Cancelled,
        }
    }
}

/// Database row mapping for the orders table.
///
/// Exactly one of the three listing-reference columns is non-null,
/// enforced by a CHECK constraint.
#[derive(Debug, Clone, FromRow)]
pub struct OrderEntity {
    pub id: Uuid,
    pub dining_offer_id: Option<Uuid>,
    pub grubhub_offer_id: Option<Uuid>,
    pub buyer_request_id: Option<Uuid>,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub item_kind: ListingKindDb,
    pub venue: String,
    pub pickup_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub price_cents: i32,
    pub status: OrderStatusDb,
    pub buyer_rated: bool,
    pub seller_rated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderEntity> for Order {
    fn from(entity: OrderEntity) -> Self {
        Self {
            id: entity.id,
            dining_offer_id: entity.dining_offer_id,
            grubhub_offer_id: entity.grubhub_offer_id,
            buyer_request_id: entity.buyer_request_id,
            buyer_id: entity.buyer_id,
            seller_id: entity.seller_id,
            item_kind: entity.item_kind.into(),
            venue: entity.venue,
            pickup_date: entity.pickup_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            price_cents: entity.price_cents,
            status: entity.status.into(),
            buyer_rated: entity.buyer_rated,
            seller_rated: entity.seller_rated,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
