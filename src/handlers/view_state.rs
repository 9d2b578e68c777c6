//! Scroll and filter preservation

use axum::extract::{Path, State};
use axum::Json;

use crate::handlers::ApiResult;
use crate::middleware::AuthUser;
use crate::state::{AppState, SaveViewStateRequest, ViewState};

pub async fn load(State(state): State<AppState>, user: AuthUser, Path(page): Path<String>) -> ApiResult<Option<ViewState>> {
    Ok(Json(state.services.view_state.load(user.id(), &page).await?))
}

pub async fn save(
    State(state): State<AppState>,
    user: AuthUser,
    Path(page): Path<String>,
    Json(request): Json<SaveViewStateRequest>,
) -> ApiResult<ViewState> {
    let view_state = ViewState::new(&page, request.scroll_y, request.filters_query);
    state.services.view_state.save(user.id(), &view_state).await?;
    Ok(Json(view_state))
}

pub async fn clear(State(state): State<AppState>, user: AuthUser, Path(page): Path<String>) -> ApiResult<()> {
    state.services.view_state.clear(user.id(), &page).await?;
    Ok(Json(()))
}
