//! Message repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MessageEntity;
use crate::metrics::QueryTimer;

/// Repository for order chat messages.
///
/// The transcript is append-only; the only mutation after insert is the
/// one-way read flag.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Creates a new MessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a message to an order's transcript.
    pub async fn append(
        &self,
        order_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<MessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("append_message");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO messages (order_id, sender_id, receiver_id, text, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, order_id, sender_id, receiver_id, text, image_url, is_read, created_at
            "#,
        )
        .bind(order_id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(text)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find message by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_message_by_id");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, order_id, sender_id, receiver_id, text, image_url, is_read, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Page through an order's transcript, oldest first.
    ///
    /// `after` is the (created_at, id) pair of the last message on the
    /// previous page; ties on the timestamp break on the id so the order is
    /// total and no message is skipped or repeated across pages.
    pub async fn list_for_order(
        &self,
        order_id: Uuid,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_messages_for_order");
        let (after_at, after_id) = match after {
            Some((at, id)) => (Some(at), Some(id)),
            None => (None, None),
        };
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, order_id, sender_id, receiver_id, text, image_url, is_read, created_at
            FROM messages
            WHERE order_id = $1
              AND ($2::timestamptz IS NULL OR (created_at, id) > ($2, $3))
            ORDER BY created_at ASC, id ASC
            LIMIT $4
            "#,
        )
        .bind(order_id)
        .bind(after_at)
        .bind(after_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a single message read.
    ///
    /// Only the receiver's id matches, so senders cannot mark their own
    /// messages; already-read messages are left alone and report 0 rows.
    pub async fn mark_read(&self, id: Uuid, receiver_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_message_read");
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE id = $1 AND receiver_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Mark every unread message addressed to the user on an order as read.
    pub async fn mark_all_read(
        &self,
        order_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_all_messages_read");
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE order_id = $1 AND receiver_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(order_id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Unread messages addressed to the user across all orders, newest first.
    pub async fn unread_for(&self, receiver_id: Uuid) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("unread_messages_for_user");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, order_id, sender_id, receiver_id, text, image_url, is_read, created_at
            FROM messages
            WHERE receiver_id = $1 AND is_read = FALSE
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(receiver_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
