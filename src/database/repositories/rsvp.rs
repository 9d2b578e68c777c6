//! RSVP repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::rsvp::{Rsvp, RsvpCounts, RsvpStatus};
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct RsvpRepository {
    pool: PgPool,
}

impl RsvpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace the user's RSVP; `None` records an explicit "no RSVP"
    pub async fn upsert(&self, event_id: Uuid, user_id: Uuid, status: Option<RsvpStatus>) -> Result<Rsvp, EventBuddyError> {
        let rsvp = sqlx::query_as::<_, Rsvp>(
            r#"
            INSERT INTO rsvps (event_id, user_id, status, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_id, user_id)
            DO UPDATE SET status = EXCLUDED.status, updated_at = EXCLUDED.updated_at
            RETURNING event_id, user_id, status, updated_at
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(rsvp)
    }

    pub async fn find(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Rsvp>, EventBuddyError> {
        let rsvp = sqlx::query_as::<_, Rsvp>(
            "SELECT event_id, user_id, status, updated_at FROM rsvps WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rsvp)
    }

    /// All of a user's RSVP rows with a status set
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Rsvp>, EventBuddyError> {
        let rsvps = sqlx::query_as::<_, Rsvp>(
            "SELECT event_id, user_id, status, updated_at FROM rsvps WHERE user_id = $1 AND status IS NOT NULL",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rsvps)
    }

    pub async fn counts(&self, event_id: Uuid) -> Result<RsvpCounts, EventBuddyError> {
        let (going, interested): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'going'),
                   COUNT(*) FILTER (WHERE status = 'interested')
            FROM rsvps WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RsvpCounts::new(going, interested))
    }
}
