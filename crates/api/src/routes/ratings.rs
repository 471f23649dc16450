//! Rating submission route.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::lifecycle;
use domain::models::{Order, OrderRole, Rating, SubmitRatingRequest};
use persistence::repositories::{OrderRepository, ProfileRepository, RatingRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_rating_submitted;

/// Rate the counterparty on a completed or delivered order.
///
/// POST /api/v1/orders/:id/ratings
///
/// One rating per participant per order. The unique constraint settles a
/// race between two submissions from the same rater; the profile aggregate
/// is folded in atomically with the insert.
pub async fn submit_rating(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(order_id): Path<Uuid>,
    Json(request): Json<SubmitRatingRequest>,
) -> Result<(StatusCode, Json<Rating>), ApiError> {
    request.validate()?;

    let order_repo = OrderRepository::new(state.pool.clone());
    let order: Order = order_repo
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?
        .into();

    let rated_user_id = lifecycle::resolve_rating(&order, user_auth.user_id)?;
    let rater_is_buyer = matches!(order.role_of(user_auth.user_id), Some(OrderRole::Buyer));

    let profile_repo = ProfileRepository::new(state.pool.clone());
    profile_repo.ensure_exists(rated_user_id).await?;

    let rating_repo = RatingRepository::new(state.pool.clone());
    let rating = rating_repo
        .submit(
            order_id,
            user_auth.user_id,
            rated_user_id,
            request.score,
            request.review.as_deref(),
            rater_is_buyer,
        )
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict("You have already rated this order".to_string())
            }
            _ => ApiError::from(e),
        })?;

    record_rating_submitted();
    info!(
        order_id = %order_id,
        rating_id = %rating.id,
        rater_id = %user_auth.user_id,
        rated_user_id = %rated_user_id,
        score = request.score,
        "Rating submitted"
    );

    Ok((StatusCode::CREATED, Json(rating.into())))
}
