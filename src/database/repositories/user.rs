//! Profile repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{UpdateProfileRequest, UserProfile};
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an empty profile for `id` if none exists, then return it
    pub async fn ensure(&self, id: Uuid) -> Result<UserProfile, EventBuddyError> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO profiles (id, created_at, updated_at) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| EventBuddyError::ProfileNotFound(id.to_string()))
    }

    /// Find profile by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, EventBuddyError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, username, display_name, avatar_url, status, location, created_at, updated_at FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find profile by username (stored lowercase)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserProfile>, EventBuddyError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT id, username, display_name, avatar_url, status, location, created_at, updated_at FROM profiles WHERE username = $1",
        )
        .bind(username.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserProfile>, EventBuddyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = sqlx::query_as::<_, UserProfile>(
            "SELECT id, username, display_name, avatar_url, status, location, created_at, updated_at FROM profiles WHERE id = ANY($1) ORDER BY username ASC NULLS LAST",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Whether another profile already owns `username`
    pub async fn username_taken(&self, username: &str, excluding: Uuid) -> Result<bool, EventBuddyError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM profiles WHERE username = $1 AND id <> $2",
        )
        .bind(username)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Update profile
    pub async fn update(&self, id: Uuid, request: UpdateProfileRequest) -> Result<UserProfile, EventBuddyError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE profiles
            SET username = COALESCE($2, username),
                display_name = COALESCE($3, display_name),
                avatar_url = COALESCE($4, avatar_url),
                status = COALESCE($5, status),
                location = COALESCE($6, location),
                updated_at = $7
            WHERE id = $1
            RETURNING id, username, display_name, avatar_url, status, location, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.username)
        .bind(request.display_name)
        .bind(request.avatar_url)
        .bind(request.status)
        .bind(request.location)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| EventBuddyError::ProfileNotFound(id.to_string()))
    }

    /// Count total profiles
    pub async fn count(&self) -> Result<i64, EventBuddyError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
