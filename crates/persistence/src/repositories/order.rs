//! Order repository for database operations.
//!
//! The acceptance path and the delivered transition run as single
//! transactions: the compare-and-set on the listing row decides races, and
//! profile counters move together with the status change they belong to.

use domain::models::order::listing_refs;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ListingEntity, OrderEntity, OrderStatusDb};
use crate::metrics::QueryTimer;

/// Repository for order-related database operations.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new OrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Accept a listing, creating a confirmed order.
    ///
    /// Runs one transaction: a compare-and-set flips the listing from active
    /// to accepted, then the order row is inserted with fields copied from
    /// the listing. Returns `Ok(None)` when the CAS finds the listing no
    /// longer active (a concurrent accepter or the owner got there first);
    /// at most one order per listing can ever be created.
    pub async fn accept_listing(
        &self,
        listing: &ListingEntity,
        buyer_id: Uuid,
        seller_id: Uuid,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("accept_listing");

        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            r#"
            UPDATE listings
            SET status = 'accepted', updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(listing.id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        let (dining_offer_id, grubhub_offer_id, buyer_request_id) =
            listing_refs(listing.kind.into(), listing.id);

        let order = sqlx::query_as::<_, OrderEntity>(
            r#"
            INSERT INTO orders (dining_offer_id, grubhub_offer_id, buyer_request_id, buyer_id, seller_id,
                                item_kind, venue, pickup_date, start_time, end_time, price_cents, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'confirmed')
            RETURNING id, dining_offer_id, grubhub_offer_id, buyer_request_id, buyer_id, seller_id,
                      item_kind, venue, pickup_date, start_time, end_time, price_cents, status,
                      buyer_rated, seller_rated, created_at, updated_at
            "#,
        )
        .bind(dining_offer_id)
        .bind(grubhub_offer_id)
        .bind(buyer_request_id)
        .bind(buyer_id)
        .bind(seller_id)
        .bind(listing.kind)
        .bind(&listing.venue)
        .bind(listing.pickup_date)
        .bind(listing.start_time)
        .bind(listing.end_time)
        .bind(listing.price_cents)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(order))
    }

    /// Find order by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_order_by_id");
        let result = sqlx::query_as::<_, OrderEntity>(
            r#"
            SELECT id, dining_offer_id, grubhub_offer_id, buyer_request_id, buyer_id, seller_id,
                   item_kind, venue, pickup_date, start_time, end_time, price_cents, status,
                   buyer_rated, seller_rated, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List orders where the user is buyer or seller, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_orders_for_user");
        let result = sqlx::query_as::<_, OrderEntity>(
            r#"
            SELECT id, dining_offer_id, grubhub_offer_id, buyer_request_id, buyer_id, seller_id,
                   item_kind, venue, pickup_date, start_time, end_time, price_cents, status,
                   buyer_rated, seller_rated, created_at, updated_at
            FROM orders
            WHERE buyer_id = $1 OR seller_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move an order to `to` if its current status is one of `from`.
    ///
    /// The condition makes the transition a compare-and-set: a stale caller
    /// gets `Ok(None)` instead of clobbering a concurrent transition.
    pub async fn transition(
        &self,
        id: Uuid,
        from: &[OrderStatusDb],
        to: OrderStatusDb,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("transition_order");
        let result = sqlx::query_as::<_, OrderEntity>(
            r#"
            UPDATE orders
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = ANY($2)
            RETURNING id, dining_offer_id, grubhub_offer_id, buyer_request_id, buyer_id, seller_id,
                      item_kind, venue, pickup_date, start_time, end_time, price_cents, status,
                      buyer_rated, seller_rated, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move an order to delivered and bump both profiles' trade counters.
    ///
    /// Counters move in the same transaction as the status change so they
    /// count each order exactly once.
    pub async fn mark_delivered(
        &self,
        id: Uuid,
        from: &[OrderStatusDb],
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_order_delivered");

        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, OrderEntity>(
            r#"
            UPDATE orders
            SET status = 'delivered', updated_at = NOW()
            WHERE id = $1 AND status = ANY($2)
            RETURNING id, dining_offer_id, grubhub_offer_id, buyer_request_id, buyer_id, seller_id,
                      item_kind, venue, pickup_date, start_time, end_time, price_cents, status,
                      buyer_rated, seller_rated, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(from)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order) = order else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE profiles
            SET total_sales = total_sales + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(order.seller_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE profiles
            SET total_purchases = total_purchases + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(order.buyer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(order))
    }
}
