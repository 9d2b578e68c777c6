//! Casual plan repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::plan::{CasualPlan, CreatePlanRequest};
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, creator_id: Uuid, request: CreatePlanRequest) -> Result<CasualPlan, EventBuddyError> {
        let plan = sqlx::query_as::<_, CasualPlan>(
            r#"
            INSERT INTO casual_plans (id, creator_id, title, description, location, starts_at, max_people, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, creator_id, title, description, location, starts_at, max_people, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(creator_id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.location)
        .bind(request.starts_at)
        .bind(request.max_people)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(plan)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CasualPlan>, EventBuddyError> {
        let plan = sqlx::query_as::<_, CasualPlan>(
            "SELECT id, creator_id, title, description, location, starts_at, max_people, created_at FROM casual_plans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    /// Plans starting after `after`, soonest first
    pub async fn list_starting_after(&self, after: DateTime<Utc>, limit: i64) -> Result<Vec<CasualPlan>, EventBuddyError> {
        let plans = sqlx::query_as::<_, CasualPlan>(
            "SELECT id, creator_id, title, description, location, starts_at, max_people, created_at FROM casual_plans WHERE starts_at > $1 ORDER BY starts_at ASC LIMIT $2",
        )
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    pub async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<CasualPlan>, EventBuddyError> {
        let plans = sqlx::query_as::<_, CasualPlan>(
            "SELECT id, creator_id, title, description, location, starts_at, max_people, created_at FROM casual_plans WHERE creator_id = $1 ORDER BY starts_at DESC",
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), EventBuddyError> {
        sqlx::query("DELETE FROM casual_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
