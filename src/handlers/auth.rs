//! Sign-in, sign-up and sign-out

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::handlers::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::services::{AuthSession, Credentials, SignUpOutcome};
use crate::state::AppState;
use crate::views::{ProfileCard, Toast, WithToast};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session: AuthSession,
    pub profile: ProfileCard,
}

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<WithToast<LoginResponse>> {
    state.login_limiter.check(&credentials.email)?;

    let services = &state.services;
    let session = services.auth_service.sign_in(&credentials).await?;
    let profile = services.profile_service.ensure_profile(session.user_id).await?;

    Ok(Json(WithToast::new(
        LoginResponse {
            profile: services.profile_service.card(&profile),
            session,
        },
        Toast::success("Welcome back!"),
    )))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<WithToast<SignUpOutcome>>), ApiError> {
    state.login_limiter.check(&credentials.email)?;

    let services = &state.services;
    let outcome = services.auth_service.sign_up(&credentials).await?;
    services.profile_service.ensure_profile(outcome.user_id).await?;

    let toast = if outcome.confirmation_required {
        Toast::info("Check your email to confirm your account.")
    } else {
        Toast::success("Account created.")
    };
    Ok((StatusCode::CREATED, Json(WithToast::new(outcome, toast))))
}

pub async fn logout(State(state): State<AppState>, user: AuthUser) -> ApiResult<Toast> {
    state.services.auth_service.sign_out(&user.0.access_token).await?;
    Ok(Json(Toast::info("Signed out.")))
}
