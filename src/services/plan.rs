//! Casual plan service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::{CasualPlan, CreatePlanRequest};
use crate::utils::errors::{EventBuddyError, Result};
use crate::utils::helpers::normalize_whitespace;

/// Upcoming plans returned per request
const UPCOMING_LIMIT: i64 = 100;

#[derive(Clone, Debug)]
pub struct PlanService {
    database: Arc<DatabaseService>,
    grace: Duration,
}

impl PlanService {
    pub fn new(database: Arc<DatabaseService>, grace_minutes: i64) -> Self {
        Self {
            database,
            grace: Duration::minutes(grace_minutes),
        }
    }

    pub async fn create(&self, creator_id: Uuid, request: CreatePlanRequest) -> Result<CasualPlan> {
        let request = validate_plan(request, Utc::now())?;
        let plan = self.database.plans.create(creator_id, request).await?;
        info!(plan_id = %plan.id, creator_id = %creator_id, "Casual plan created");
        Ok(plan)
    }

    /// Plans that have not yet passed their grace period
    pub async fn list_upcoming(&self) -> Result<Vec<CasualPlan>> {
        self.database
            .plans
            .list_starting_after(Utc::now() - self.grace, UPCOMING_LIMIT)
            .await
    }

    pub async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<CasualPlan>> {
        self.database.plans.list_by_creator(creator_id).await
    }

    pub async fn delete(&self, user_id: Uuid, plan_id: Uuid) -> Result<()> {
        let plan = self
            .database
            .plans
            .find_by_id(plan_id)
            .await?
            .ok_or(EventBuddyError::PlanNotFound { plan_id })?;

        if plan.creator_id != user_id {
            return Err(EventBuddyError::PermissionDenied(
                "Only the creator can delete this plan.".to_string(),
            ));
        }

        self.database.plans.delete(plan_id).await?;
        info!(plan_id = %plan_id, "Casual plan deleted");
        Ok(())
    }
}

pub fn validate_plan(request: CreatePlanRequest, now: chrono::DateTime<Utc>) -> Result<CreatePlanRequest> {
    let title = normalize_whitespace(&request.title);
    if title.is_empty() {
        return Err(EventBuddyError::InvalidInput("Give your plan a title.".to_string()));
    }
    if request.starts_at <= now {
        return Err(EventBuddyError::InvalidInput("Plans must start in the future.".to_string()));
    }
    if matches!(request.max_people, Some(max) if max < 2) {
        return Err(EventBuddyError::InvalidInput(
            "A plan needs room for at least 2 people.".to_string(),
        ));
    }

    let clean = |value: Option<String>| value.map(|v| normalize_whitespace(&v)).filter(|v| !v.is_empty());
    Ok(CreatePlanRequest {
        title,
        description: clean(request.description),
        location: clean(request.location),
        starts_at: request.starts_at,
        max_people: request.max_people,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(hours_ahead: i64, max_people: Option<i32>) -> CreatePlanRequest {
        CreatePlanRequest {
            title: " Coffee  after work ".to_string(),
            description: None,
            location: Some("  ".to_string()),
            starts_at: Utc::now() + Duration::hours(hours_ahead),
            max_people,
        }
    }

    #[test]
    fn test_valid_plan_is_normalized() {
        let plan = validate_plan(request(2, Some(4)), Utc::now()).unwrap();
        assert_eq!(plan.title, "Coffee after work");
        assert_eq!(plan.location, None);
    }

    #[test]
    fn test_invalid_plans_are_rejected() {
        assert_matches!(validate_plan(request(-1, None), Utc::now()), Err(EventBuddyError::InvalidInput(_)));
        assert_matches!(validate_plan(request(2, Some(1)), Utc::now()), Err(EventBuddyError::InvalidInput(_)));

        let mut untitled = request(2, None);
        untitled.title = " ".to_string();
        assert_matches!(validate_plan(untitled, Utc::now()), Err(EventBuddyError::InvalidInput(_)));
    }
}
