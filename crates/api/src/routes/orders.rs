//! Order lifecycle routes.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::lifecycle;
use domain::models::{Order, OrderStatus};
use persistence::entities::OrderStatusDb;
use persistence::repositories::OrderRepository;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_order_transition;

/// List response wrapper.
#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub data: Vec<Order>,
}

fn db_statuses(statuses: &[OrderStatus]) -> Vec<OrderStatusDb> {
    statuses.iter().map(|s| (*s).into()).collect()
}

async fn fetch_order(repo: &OrderRepository, id: Uuid) -> Result<Order, ApiError> {
    let order = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;
    Ok(order.into())
}

/// List the caller's orders, newest first.
///
/// GET /api/v1/orders
pub async fn list_orders(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ListOrdersResponse>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let orders = repo.list_for_user(user_auth.user_id).await?;

    Ok(Json(ListOrdersResponse {
        data: orders.into_iter().map(Order::from).collect(),
    }))
}

/// Fetch a single order. Participants only.
///
/// GET /api/v1/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let order = fetch_order(&repo, order_id).await?;

    lifecycle::ensure_participant(&order, user_auth.user_id)?;

    Ok(Json(order))
}

/// Seller marks the order fulfilled on their side.
///
/// POST /api/v1/orders/:id/complete
pub async fn complete_order(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let order = fetch_order(&repo, order_id).await?;

    lifecycle::ensure_seller(&order, user_auth.user_id)?;
    lifecycle::guard_transition(&order, OrderStatus::Completed)?;

    let updated = repo
        .transition(
            order_id,
            &db_statuses(lifecycle::COMPLETE_FROM),
            OrderStatus::Completed.into(),
        )
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Order is no longer in a completable state".to_string())
        })?;

    record_order_transition("completed");
    info!(order_id = %order_id, user_id = %user_auth.user_id, "Order completed");

    Ok(Json(updated.into()))
}

/// Buyer confirms delivery; the absorbing success state.
///
/// POST /api/v1/orders/:id/deliver
///
/// Trade counters on both profiles move with this transition, once.
pub async fn deliver_order(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let order = fetch_order(&repo, order_id).await?;

    lifecycle::ensure_buyer(&order, user_auth.user_id)?;
    lifecycle::guard_transition(&order, OrderStatus::Delivered)?;

    let updated = repo
        .mark_delivered(order_id, &db_statuses(lifecycle::DELIVER_FROM))
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Order is no longer in a deliverable state".to_string())
        })?;

    record_order_transition("delivered");
    info!(order_id = %order_id, user_id = %user_auth.user_id, "Order delivered");

    Ok(Json(updated.into()))
}

/// Either party backs out before delivery.
///
/// POST /api/v1/orders/:id/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let order = fetch_order(&repo, order_id).await?;

    lifecycle::ensure_participant(&order, user_auth.user_id)?;
    lifecycle::guard_transition(&order, OrderStatus::Cancelled)?;

    let updated = repo
        .transition(
            order_id,
            &db_statuses(lifecycle::CANCEL_FROM),
            OrderStatus::Cancelled.into(),
        )
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Order is no longer in a cancellable state".to_string())
        })?;

    record_order_transition("cancelled");
    info!(order_id = %order_id, user_id = %user_auth.user_id, "Order cancelled");

    Ok(Json(updated.into()))
}
