//! Profile routes.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{Profile, PublicProfile, Rating, UpsertProfileRequest};
use persistence::repositories::{ProfileRepository, RatingRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// List response wrapper.
#[derive(Debug, Serialize)]
pub struct ListRatingsResponse {
    pub data: Vec<Rating>,
}

/// Fetch a public profile with marketplace aggregates.
///
/// GET /api/v1/profiles/:id
pub async fn get_profile(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PublicProfile>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());

    let profile: Profile = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?
        .into();

    Ok(Json(profile.into()))
}

/// Ratings received by a user, newest first.
///
/// GET /api/v1/profiles/:id/ratings
pub async fn get_profile_ratings(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ListRatingsResponse>, ApiError> {
    let repo = RatingRepository::new(state.pool.clone());
    let ratings = repo.list_for_user(user_id).await?;

    Ok(Json(ListRatingsResponse {
        data: ratings.into_iter().map(Rating::from).collect(),
    }))
}

/// Create or update the caller's own profile.
///
/// PUT /api/v1/profiles/me
///
/// The full profile (contact fields included) is only ever returned to its
/// owner here; aggregates stay read-only.
pub async fn upsert_my_profile(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    request.validate()?;

    let repo = ProfileRepository::new(state.pool.clone());
    let profile = repo
        .upsert(
            user_auth.user_id,
            &request.name,
            &request.email,
            request.phone.as_deref(),
            request.profile_image_url.as_deref(),
        )
        .await?;

    info!(user_id = %user_auth.user_id, "Profile updated");

    Ok(Json(profile.into()))
}
