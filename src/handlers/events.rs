//! Public event pages

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::filters::{EventFilters, FilterQuery};
use crate::handlers::ApiResult;
use crate::middleware::{AuthUser, MaybeAuthUser};
use crate::services::MyRsvps;
use crate::state::AppState;
use crate::views::{EventDetail, EventListPage};

pub async fn list_events(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(query): Query<FilterQuery>,
) -> ApiResult<EventListPage> {
    let filters = EventFilters::from_query(&query)?;
    let page = query.page.unwrap_or(1);
    let listing = state.services.event_service.list(&filters, viewer.id(), page).await?;
    Ok(Json(listing))
}

pub async fn list_vibes(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(Json(state.services.event_service.vibes().await?))
}

pub async fn event_detail(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(event_id): Path<Uuid>,
) -> ApiResult<EventDetail> {
    Ok(Json(state.services.event_service.detail(event_id, viewer.id()).await?))
}

pub async fn my_rsvps(State(state): State<AppState>, user: AuthUser) -> ApiResult<MyRsvps> {
    Ok(Json(state.services.event_service.my_rsvps(user.id()).await?))
}
