//! Profile routes

use axum::extract::{Path, State};
use axum::Json;

use crate::handlers::ApiResult;
use crate::middleware::AuthUser;
use crate::models::{UpdateProfileRequest, UserProfile};
use crate::services::ProfilePage;
use crate::state::AppState;
use crate::views::{Toast, WithToast};

pub async fn public_profile(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<ProfilePage> {
    Ok(Json(state.services.profile_service.page(&username).await?))
}

pub async fn own_profile(State(state): State<AppState>, user: AuthUser) -> ApiResult<UserProfile> {
    Ok(Json(state.services.profile_service.ensure_profile(user.id()).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<WithToast<UserProfile>> {
    let profile = state.services.profile_service.update(user.id(), request).await?;
    Ok(Json(WithToast::new(profile, Toast::success("Profile saved."))))
}
