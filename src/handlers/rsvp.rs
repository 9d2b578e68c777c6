//! RSVP toggle

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::handlers::ApiResult;
use crate::middleware::AuthUser;
use crate::models::RsvpRequest;
use crate::services::RsvpOutcome;
use crate::state::AppState;

pub async fn submit_rsvp(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
    Json(request): Json<RsvpRequest>,
) -> ApiResult<RsvpOutcome> {
    let outcome = state
        .services
        .rsvp_service
        .toggle(user.id(), event_id, request)
        .await?;
    Ok(Json(outcome))
}
