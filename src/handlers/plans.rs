//! Casual plan routes

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::{ensure_enabled, ApiError, ApiResult};
use crate::middleware::{AuthUser, MaybeAuthUser};
use crate::models::{CasualPlan, CreatePlanRequest};
use crate::state::AppState;
use crate::utils::errors::EventBuddyError;
use crate::views::{Toast, WithToast};

const FEATURE: &str = "Casual plans";

#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    /// Only the caller's own plans
    #[serde(default)]
    pub mine: bool,
}

pub async fn list_plans(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Vec<CasualPlan>> {
    ensure_enabled(state.settings.features.casual_plans, FEATURE)?;
    let plans = &state.services.plan_service;

    let result = if query.mine {
        let user_id = viewer.id().ok_or(EventBuddyError::Unauthorized)?;
        plans.list_by_creator(user_id).await?
    } else {
        plans.list_upcoming().await?
    };
    Ok(Json(result))
}

pub async fn create_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<WithToast<CasualPlan>>), ApiError> {
    ensure_enabled(state.settings.features.casual_plans, FEATURE)?;
    let plan = state.services.plan_service.create(user.id(), request).await?;
    Ok((StatusCode::CREATED, Json(WithToast::new(plan, Toast::success("Plan posted.")))))
}

pub async fn delete_plan(State(state): State<AppState>, user: AuthUser, Path(plan_id): Path<Uuid>) -> ApiResult<Toast> {
    ensure_enabled(state.settings.features.casual_plans, FEATURE)?;
    state.services.plan_service.delete(user.id(), plan_id).await?;
    Ok(Json(Toast::info("Plan deleted.")))
}
