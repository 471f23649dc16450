//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for profile-related database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find profile by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, name, email, phone, profile_image_url, id_verified,
                   rating, total_ratings, total_sales, total_purchases, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert or update the caller's profile.
    ///
    /// The id comes from the verified token, so first write creates the row
    /// and later writes only touch the editable fields. Aggregates and
    /// counters are never writable through this path.
    pub async fn upsert(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        phone: Option<&str>,
        profile_image_url: Option<&str>,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (id, name, email, phone, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                profile_image_url = EXCLUDED.profile_image_url,
                updated_at = NOW()
            RETURNING id, name, email, phone, profile_image_url, id_verified,
                      rating, total_ratings, total_sales, total_purchases, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(profile_image_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Ensure a bare profile row exists for the user.
    ///
    /// Called on first authenticated write so counters and ratings have a
    /// row to land on even before the user fills in their profile.
    pub async fn ensure_exists(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("ensure_profile_exists");
        sqlx::query(
            r#"
            INSERT INTO profiles (id, name, email)
            VALUES ($1, '', '')
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Note: ProfileRepository tests require a database connection and are
    // covered by the integration tests in the api crate.
}
