//! Friend routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::handlers::{ensure_enabled, ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::{FriendRequestBody, Friendship, RespondFriendRequest};
use crate::services::IncomingRequest;
use crate::state::AppState;
use crate::views::{ProfileCard, Toast, WithToast};

const FEATURE: &str = "Friends";

pub async fn list_friends(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<ProfileCard>> {
    ensure_enabled(state.settings.features.friends, FEATURE)?;
    let services = &state.services;
    let friends = services.friend_service.list_friends(user.id()).await?;
    Ok(Json(friends.iter().map(|p| services.profile_service.card(p)).collect()))
}

pub async fn send_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<FriendRequestBody>,
) -> Result<(StatusCode, Json<WithToast<Friendship>>), ApiError> {
    ensure_enabled(state.settings.features.friends, FEATURE)?;
    let request = state.services.friend_service.send_request(user.id(), body.addressee_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(WithToast::new(request, Toast::success("Friend request sent."))),
    ))
}

pub async fn list_incoming(State(state): State<AppState>, user: AuthUser) -> ApiResult<Vec<IncomingRequest>> {
    ensure_enabled(state.settings.features.friends, FEATURE)?;
    Ok(Json(state.services.friend_service.list_incoming(user.id()).await?))
}

pub async fn respond(
    State(state): State<AppState>,
    user: AuthUser,
    Path(request_id): Path<Uuid>,
    Json(body): Json<RespondFriendRequest>,
) -> ApiResult<WithToast<Friendship>> {
    ensure_enabled(state.settings.features.friends, FEATURE)?;
    let friendship = state.services.friend_service.respond(user.id(), request_id, body.accept).await?;
    let toast = if body.accept {
        Toast::success("Friend request accepted.")
    } else {
        Toast::info("Friend request declined.")
    };
    Ok(Json(WithToast::new(friendship, toast)))
}

pub async fn remove(State(state): State<AppState>, user: AuthUser, Path(friendship_id): Path<Uuid>) -> ApiResult<Toast> {
    ensure_enabled(state.settings.features.friends, FEATURE)?;
    state.services.friend_service.remove(user.id(), friendship_id).await?;
    Ok(Json(Toast::info("Friend removed.")))
}
