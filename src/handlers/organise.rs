//! Organiser tooling

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::handlers::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{CreateEventRequest, EventListing, UpdateEventRequest};
use crate::state::AppState;
use crate::views::{Toast, WithToast};

pub async fn list_mine(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<EventListing>> {
    Ok(Json(state.services.event_service.list_mine(user.id()).await?))
}

pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<WithToast<EventListing>>), ApiError> {
    let listing = state.services.event_service.create(user.id(), request).await?;
    Ok((
        StatusCode::CREATED,
        Json(WithToast::new(listing, Toast::success("Event published."))),
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> ApiResult<WithToast<EventListing>> {
    let listing = state.services.event_service.update(user.id(), event_id, request).await?;
    Ok(Json(WithToast::new(listing, Toast::success("Event updated."))))
}

pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
) -> ApiResult<Toast> {
    state.services.event_service.delete(user.id(), event_id).await?;
    Ok(Json(Toast::success("Event deleted.")))
}
