//! Listing routes: posting, browsing, cancelling, and accepting.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::lifecycle;
use domain::models::{CreateListingRequest, Listing, ListingFilters, Order};
use persistence::entities::ListingKindDb;
use persistence::repositories::{ListingRepository, OrderRepository, ProfileRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_listing_created, record_order_created};

/// List response wrapper.
#[derive(Debug, Serialize)]
pub struct ListListingsResponse {
    pub data: Vec<Listing>,
}

/// Browse active listings.
///
/// GET /api/v1/listings
///
/// Optional filters: kind, date_from, date_to, venue (substring match).
pub async fn list_listings(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(filters): Query<ListingFilters>,
) -> Result<Json<ListListingsResponse>, ApiError> {
    let repo = ListingRepository::new(state.pool.clone());

    let listings = repo
        .list_active(
            filters.kind.map(ListingKindDb::from),
            filters.date_from,
            filters.date_to,
            filters.venue.as_deref(),
        )
        .await?;

    Ok(Json(ListListingsResponse {
        data: listings.into_iter().map(Listing::from).collect(),
    }))
}

/// Post a new offer or buyer request.
///
/// POST /api/v1/listings
pub async fn create_listing(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    request.validate()?;
    request.validate_semantics()?;

    let profile_repo = ProfileRepository::new(state.pool.clone());
    profile_repo.ensure_exists(user_auth.user_id).await?;

    let repo = ListingRepository::new(state.pool.clone());
    let listing = repo
        .create_listing(
            user_auth.user_id,
            request.kind.into(),
            &request.venue,
            request.pickup_date,
            request.start_time,
            request.end_time,
            request.price_cents,
            request.notes.as_deref(),
        )
        .await?;

    record_listing_created(&request.kind.to_string());
    info!(
        listing_id = %listing.id,
        kind = %request.kind,
        user_id = %user_auth.user_id,
        "Listing created"
    );

    Ok((StatusCode::CREATED, Json(listing.into())))
}

/// Cancel an active listing. Owner only.
///
/// POST /api/v1/listings/:id/cancel
pub async fn cancel_listing(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(listing_id): Path<Uuid>,
) -> Result<Json<Listing>, ApiError> {
    let repo = ListingRepository::new(state.pool.clone());

    let listing: Listing = repo
        .find_by_id(listing_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))?
        .into();

    lifecycle::ensure_owner(&listing, user_auth.user_id)?;
    lifecycle::ensure_listing_active(&listing)?;

    // Conditional on status; a concurrent accept wins and we report it.
    let updated = repo.cancel_listing(listing_id).await?;
    if updated == 0 {
        return Err(ApiError::Conflict(
            "This listing has already been claimed".to_string(),
        ));
    }

    let listing: Listing = repo
        .find_by_id(listing_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))?
        .into();

    info!(listing_id = %listing_id, user_id = %user_auth.user_id, "Listing cancelled");

    Ok(Json(listing))
}

/// Accept an active listing, creating a confirmed order.
///
/// POST /api/v1/listings/:id/accept
///
/// Accepting an offer makes the caller the buyer; accepting a buyer request
/// makes the caller the seller. At most one acceptance ever succeeds.
pub async fn accept_listing(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(listing_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let listing_repo = ListingRepository::new(state.pool.clone());

    let entity = listing_repo
        .find_by_id(listing_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Listing not found".to_string()))?;
    let listing: Listing = entity.clone().into();

    lifecycle::ensure_listing_active(&listing)?;
    let parties = lifecycle::resolve_parties(&listing, user_auth.user_id)?;

    // Both parties need profile rows for the delivery counters and ratings.
    let profile_repo = ProfileRepository::new(state.pool.clone());
    profile_repo.ensure_exists(parties.buyer_id).await?;
    profile_repo.ensure_exists(parties.seller_id).await?;

    let order_repo = OrderRepository::new(state.pool.clone());
    let order = order_repo
        .accept_listing(&entity, parties.buyer_id, parties.seller_id)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("This listing has already been claimed".to_string())
        })?;

    record_order_created();
    info!(
        order_id = %order.id,
        listing_id = %listing_id,
        buyer_id = %parties.buyer_id,
        seller_id = %parties.seller_id,
        "Order created from listing"
    );

    Ok((StatusCode::CREATED, Json(order.into())))
}
