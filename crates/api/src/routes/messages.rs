//! Per-order messaging routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::lifecycle;
use domain::models::{AppendMessageRequest, Message, Order, TranscriptResponse};
use persistence::repositories::{MessageRepository, OrderRepository};
use serde::{Deserialize, Serialize};
use shared::pagination::{decode_cursor, encode_cursor};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Transcript query parameters.
#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// List response wrapper for unread messages.
#[derive(Debug, Serialize)]
pub struct UnreadMessagesResponse {
    pub data: Vec<Message>,
}

/// Count of messages flipped by a bulk read.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

async fn fetch_order_for_participant(
    state: &AppState,
    order_id: Uuid,
    user_id: Uuid,
) -> Result<Order, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let order: Order = repo
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?
        .into();

    lifecycle::ensure_participant(&order, user_id)?;
    Ok(order)
}

/// Page through an order's transcript, oldest first.
///
/// GET /api/v1/orders/:id/messages
pub async fn get_transcript(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(order_id): Path<Uuid>,
    Query(query): Query<TranscriptQuery>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    fetch_order_for_participant(&state, order_id, user_auth.user_id).await?;

    let after = match query.cursor.as_deref() {
        Some(cursor) => Some(
            decode_cursor(cursor)
                .map_err(|e| ApiError::Validation(format!("Invalid cursor: {}", e)))?,
        ),
        None => None,
    };

    let limit = query
        .limit
        .unwrap_or(state.config.limits.default_page_size)
        .clamp(1, state.config.limits.max_page_size);

    let repo = MessageRepository::new(state.pool.clone());

    // Fetch one past the page to learn whether another page exists.
    let mut entities = repo.list_for_order(order_id, after, limit + 1).await?;

    let next_cursor = if entities.len() as i64 > limit {
        entities.truncate(limit as usize);
        entities
            .last()
            .map(|m| encode_cursor(m.created_at, m.id))
    } else {
        None
    };

    Ok(Json(TranscriptResponse {
        data: entities.into_iter().map(Message::from).collect(),
        next_cursor,
    }))
}

/// Append a message to an order's transcript.
///
/// POST /api/v1/orders/:id/messages
///
/// The receiver is always the counterparty; messaging stays open in every
/// order state so disputes can be resolved after cancellation.
pub async fn send_message(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(order_id): Path<Uuid>,
    Json(request): Json<AppendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    request.validate()?;

    let order = fetch_order_for_participant(&state, order_id, user_auth.user_id).await?;

    // Participant checked above, so the counterparty exists.
    let receiver_id = order
        .counterparty_of(user_auth.user_id)
        .ok_or(domain::error::DomainError::NotParticipant)?;

    let repo = MessageRepository::new(state.pool.clone());
    let message = repo
        .append(
            order_id,
            user_auth.user_id,
            receiver_id,
            &request.text,
            request.image_url.as_deref(),
        )
        .await?;

    info!(
        order_id = %order_id,
        message_id = %message.id,
        sender_id = %user_auth.user_id,
        "Message sent"
    );

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Mark every unread message addressed to the caller on an order as read.
///
/// POST /api/v1/orders/:id/messages/read
pub async fn mark_all_read(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(order_id): Path<Uuid>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    fetch_order_for_participant(&state, order_id, user_auth.user_id).await?;

    let repo = MessageRepository::new(state.pool.clone());
    let updated = repo.mark_all_read(order_id, user_auth.user_id).await?;

    Ok(Json(MarkAllReadResponse { updated }))
}

/// Mark a single message read. Receiver only; idempotent.
///
/// POST /api/v1/messages/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = MessageRepository::new(state.pool.clone());

    let message = repo
        .find_by_id(message_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    if message.receiver_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the receiver can mark a message read".to_string(),
        ));
    }

    // Zero rows just means it was already read.
    repo.mark_read(message_id, user_auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Unread messages addressed to the caller, across all orders, newest first.
///
/// GET /api/v1/messages/unread
pub async fn unread_messages(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<UnreadMessagesResponse>, ApiError> {
    let repo = MessageRepository::new(state.pool.clone());
    let messages = repo.unread_for(user_auth.user_id).await?;

    Ok(Json(UnreadMessagesResponse {
        data: messages.into_iter().map(Message::from).collect(),
    }))
}
