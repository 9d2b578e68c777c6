//! Venue routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::handlers::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{CreateVenueRequest, Venue};
use crate::state::AppState;

pub async fn list_venues(State(state): State<AppState>) -> ApiResult<Vec<Venue>> {
    Ok(Json(state.services.venue_service.list().await?))
}

pub async fn get_venue(State(state): State<AppState>, Path(venue_id): Path<Uuid>) -> ApiResult<Venue> {
    Ok(Json(state.services.venue_service.get(venue_id).await?))
}

pub async fn create_venue(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateVenueRequest>,
) -> Result<(StatusCode, Json<Venue>), ApiError> {
    let venue = state.services.venue_service.create(user.id(), request).await?;
    Ok((StatusCode::CREATED, Json(venue)))
}
