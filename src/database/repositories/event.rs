//! Event repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::EventBuddyError;

/// Event columns plus RSVP counts derived from the `rsvps` table
const EVENT_SELECT: &str = r#"
    SELECT e.id, e.title, e.description, e.category, e.start_date, e.start_time, e.end_date, e.end_time,
           e.venue_id, e.organiser_id, e.tags, e.image_url, e.gallery_urls, e.is_published,
           (SELECT COUNT(*) FROM rsvps r WHERE r.event_id = e.id AND r.status = 'going') AS going_count,
           (SELECT COUNT(*) FROM rsvps r WHERE r.event_id = e.id AND r.status = 'interested') AS interested_count,
           e.created_at, e.updated_at
    FROM events e
"#;

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event; `request` must already be validated and normalized
    pub async fn create(&self, organiser_id: Uuid, request: CreateEventRequest) -> Result<Event, EventBuddyError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, category, start_date, start_time, end_date, end_time,
                                venue_id, organiser_id, tags, image_url, gallery_urls, is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.category)
        .bind(request.start_date)
        .bind(request.start_time)
        .bind(request.end_date)
        .bind(request.end_time)
        .bind(request.venue_id)
        .bind(organiser_id)
        .bind(request.tags)
        .bind(request.image_url)
        .bind(request.gallery_urls)
        .bind(request.is_published.unwrap_or(true))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or(EventBuddyError::EventNotFound { event_id: id })
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, EventBuddyError> {
        let event = sqlx::query_as::<_, Event>(&format!("{} WHERE e.id = $1", EVENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(&self, id: Uuid, request: UpdateEventRequest) -> Result<Event, EventBuddyError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                start_date = COALESCE($5, start_date),
                start_time = COALESCE($6, start_time),
                end_date = COALESCE($7, end_date),
                end_time = COALESCE($8, end_time),
                venue_id = COALESCE($9, venue_id),
                tags = COALESCE($10, tags),
                image_url = COALESCE($11, image_url),
                gallery_urls = COALESCE($12, gallery_urls),
                is_published = COALESCE($13, is_published),
                updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.category)
        .bind(request.start_date)
        .bind(request.start_time)
        .bind(request.end_date)
        .bind(request.end_time)
        .bind(request.venue_id)
        .bind(request.tags)
        .bind(request.image_url)
        .bind(request.gallery_urls)
        .bind(request.is_published)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EventBuddyError::EventNotFound { event_id: id });
        }

        self.find_by_id(id)
            .await?
            .ok_or(EventBuddyError::EventNotFound { event_id: id })
    }

    /// Delete event
    pub async fn delete(&self, id: Uuid) -> Result<(), EventBuddyError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Published events whose last day is on or after `from`.
    /// Time-of-day visibility is applied afterwards by the filter pipeline.
    pub async fn list_published_from(&self, from: NaiveDate) -> Result<Vec<Event>, EventBuddyError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "{} WHERE e.is_published = true AND COALESCE(e.end_date, e.start_date) >= $1 ORDER BY e.start_date ASC, e.start_time ASC NULLS FIRST",
            EVENT_SELECT
        ))
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events created by an organiser, newest first, including past and unpublished ones
    pub async fn list_by_organiser(&self, organiser_id: Uuid) -> Result<Vec<Event>, EventBuddyError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "{} WHERE e.organiser_id = $1 ORDER BY e.start_date DESC",
            EVENT_SELECT
        ))
        .bind(organiser_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, EventBuddyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
