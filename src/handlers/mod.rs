//! HTTP handlers
//!
//! Every route returns JSON. Failures are rendered by [`ApiError`] as an
//! error string plus a toast the client can show as-is.

pub mod auth;
pub mod events;
pub mod friends;
pub mod organise;
pub mod plans;
pub mod profile;
pub mod rsvp;
pub mod venues;
pub mod view_state;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{extract::State, Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, warn};

use crate::config::ServerConfig;
use crate::middleware::log_requests;
use crate::services::ServiceHealthStatus;
use crate::state::AppState;
use crate::utils::errors::{EventBuddyError, ErrorSeverity};
use crate::views::Toast;

pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError(pub EventBuddyError);

impl From<EventBuddyError> for ApiError {
    fn from(error: EventBuddyError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %error, severity = %error.severity(), "Request failed");
        } else if error.severity() != ErrorSeverity::Info {
            warn!(error = %error, status = status.as_u16(), "Request rejected");
        }

        // Internal details stay in the logs
        let message = if status.is_server_error() {
            "internal error".to_string()
        } else {
            error.to_string()
        };
        let body = Json(json!({
            "error": message,
            "toast": Toast::error(error.toast_message()),
        }));

        let mut response = (status, body).into_response();
        let retry_after = match &error {
            EventBuddyError::RateLimitExceeded { retry_after_seconds } => *retry_after_seconds,
            EventBuddyError::Auth(crate::utils::errors::AuthError::RateLimited { retry_after_seconds }) => {
                *retry_after_seconds
            }
            _ => None,
        };
        if let Some(seconds) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

/// Fail with 503 when a feature flag is off
pub fn ensure_enabled(enabled: bool, feature: &str) -> Result<(), ApiError> {
    if enabled {
        Ok(())
    } else {
        Err(EventBuddyError::ServiceUnavailable(format!("{} are disabled", feature)).into())
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server);

    Router::new()
        .route("/health", get(health))
        .route("/events", get(events::list_events))
        .route("/events/vibes", get(events::list_vibes))
        .route("/events/:id", get(events::event_detail))
        .route("/events/:id/rsvp", post(rsvp::submit_rsvp))
        .route("/me/rsvps", get(events::my_rsvps))
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/organise/events", get(organise::list_mine).post(organise::create_event))
        .route("/organise/events/:id", put(organise::update_event).delete(organise::delete_event))
        .route("/venues", get(venues::list_venues).post(venues::create_venue))
        .route("/venues/:id", get(venues::get_venue))
        .route("/profile/edit", get(profile::own_profile).put(profile::update_profile))
        .route("/profile/:username", get(profile::public_profile))
        .route("/friends", get(friends::list_friends).post(friends::send_request))
        .route("/friends/requests", get(friends::list_incoming))
        .route("/friends/requests/:id", post(friends::respond))
        .route("/friends/:id", axum::routing::delete(friends::remove))
        .route("/plans", get(plans::list_plans).post(plans::create_plan))
        .route("/plans/:id", axum::routing::delete(plans::delete_plan))
        .route(
            "/view-state/:page",
            get(view_state::load).put(view_state::save).delete(view_state::clear),
        )
        .layer(axum::middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<ServiceHealthStatus>) {
    let status = state.services.health_check().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}
