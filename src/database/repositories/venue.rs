//! Venue repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::venue::{CreateVenueRequest, Venue};
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, created_by: Uuid, request: CreateVenueRequest) -> Result<Venue, EventBuddyError> {
        let venue = sqlx::query_as::<_, Venue>(
            r#"
            INSERT INTO venues (id, name, address_line, city, postcode, latitude, longitude, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, address_line, city, postcode, latitude, longitude, created_by, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name)
        .bind(request.address_line)
        .bind(request.city)
        .bind(request.postcode)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(venue)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Venue>, EventBuddyError> {
        let venue = sqlx::query_as::<_, Venue>(
            "SELECT id, name, address_line, city, postcode, latitude, longitude, created_by, created_at FROM venues WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(venue)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Venue>, EventBuddyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let venues = sqlx::query_as::<_, Venue>(
            "SELECT id, name, address_line, city, postcode, latitude, longitude, created_by, created_at FROM venues WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(venues)
    }

    /// List venues alphabetically
    pub async fn list(&self) -> Result<Vec<Venue>, EventBuddyError> {
        let venues = sqlx::query_as::<_, Venue>(
            "SELECT id, name, address_line, city, postcode, latitude, longitude, created_by, created_at FROM venues ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(venues)
    }
}
