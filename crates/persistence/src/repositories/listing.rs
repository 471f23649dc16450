//! Listing repository for database operations.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ListingEntity, ListingKindDb};
use crate::metrics::QueryTimer;

/// Repository for listing-related database operations.
#[derive(Clone)]
pub struct ListingRepository {
    pool: PgPool,
}

impl ListingRepository {
    /// Creates a new ListingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new listing with status active.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_listing(
        &self,
        owner_id: Uuid,
        kind: ListingKindDb,
        venue: &str,
        pickup_date: NaiveDate,
        start_time: NaiveTime,
        end_time: Option<NaiveTime>,
        price_cents: i32,
        notes: Option<&str>,
    ) -> Result<ListingEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_listing");
        let result = sqlx::query_as::<_, ListingEntity>(
            r#"
            INSERT INTO listings (owner_id, kind, venue, pickup_date, start_time, end_time, price_cents, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, owner_id, kind, venue, pickup_date, start_time, end_time, price_cents, notes, status, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(kind)
        .bind(venue)
        .bind(pickup_date)
        .bind(start_time)
        .bind(end_time)
        .bind(price_cents)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find listing by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ListingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_listing_by_id");
        let result = sqlx::query_as::<_, ListingEntity>(
            r#"
            SELECT id, owner_id, kind, venue, pickup_date, start_time, end_time, price_cents, notes, status, created_at, updated_at
            FROM listings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List active listings matching the browse filters, soonest pickup first.
    pub async fn list_active(
        &self,
        kind: Option<ListingKindDb>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        venue: Option<&str>,
    ) -> Result<Vec<ListingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_listings");
        let result = sqlx::query_as::<_, ListingEntity>(
            r#"
            SELECT id, owner_id, kind, venue, pickup_date, start_time, end_time, price_cents, notes, status, created_at, updated_at
            FROM listings
            WHERE status = 'active'
              AND ($1::listing_kind IS NULL OR kind = $1)
              AND ($2::date IS NULL OR pickup_date >= $2)
              AND ($3::date IS NULL OR pickup_date <= $3)
              AND ($4::text IS NULL OR venue ILIKE '%' || $4 || '%')
            ORDER BY pickup_date ASC, start_time ASC
            "#,
        )
        .bind(kind)
        .bind(date_from)
        .bind(date_to)
        .bind(venue)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Cancel a listing while it is still active.
    ///
    /// Conditional on status so a listing claimed concurrently is not
    /// clobbered; returns the number of rows updated (0 = lost the race or
    /// already terminal).
    pub async fn cancel_listing(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("cancel_listing");
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: ListingRepository tests require a database connection and are
    // covered by the integration tests in the api crate.
}
