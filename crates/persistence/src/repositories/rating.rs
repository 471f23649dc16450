//! Rating repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RatingEntity;
use crate::metrics::QueryTimer;

/// Repository for rating-related database operations.
#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// Creates a new RatingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a rating and fold it into the rated user's aggregate.
    ///
    /// Runs one transaction: the rating row, the order's rated flag, and the
    /// profile aggregate all commit together. The aggregate is recomputed
    /// arithmetically inside the UPDATE so concurrent submissions against the
    /// same profile serialize on the row and never lose a score. A duplicate
    /// (order_id, rater_id) pair trips the table's unique constraint and
    /// surfaces as `sqlx::Error::Database` with code 23505.
    pub async fn submit(
        &self,
        order_id: Uuid,
        rater_id: Uuid,
        rated_user_id: Uuid,
        score: i32,
        review: Option<&str>,
        rater_is_buyer: bool,
    ) -> Result<RatingEntity, sqlx::Error> {
        let timer = QueryTimer::new("submit_rating");

        let mut tx = self.pool.begin().await?;

        let rating = sqlx::query_as::<_, RatingEntity>(
            r#"
            INSERT INTO ratings (order_id, rater_id, rated_user_id, score, review)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, order_id, rater_id, rated_user_id, score, review, created_at
            "#,
        )
        .bind(order_id)
        .bind(rater_id)
        .bind(rated_user_id)
        .bind(score)
        .bind(review)
        .fetch_one(&mut *tx)
        .await?;

        if rater_is_buyer {
            sqlx::query("UPDATE orders SET buyer_rated = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(order_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("UPDATE orders SET seller_rated = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(order_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            UPDATE profiles
            SET rating = (rating * total_ratings + $2) / (total_ratings + 1),
                total_ratings = total_ratings + 1,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(rated_user_id)
        .bind(score as f64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(rating)
    }

    /// Ratings received by a user, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RatingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_ratings_for_user");
        let result = sqlx::query_as::<_, RatingEntity>(
            r#"
            SELECT id, order_id, rater_id, rated_user_id, score, review, created_at
            FROM ratings
            WHERE rated_user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: RatingRepository tests require a database connection and are
    // covered by the integration tests in the api crate, including the
    // concurrent-submission aggregate check.
}
