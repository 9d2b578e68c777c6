//! Friendship repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::friend::{FriendStatus, Friendship};
use crate::models::user::UserProfile;
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct FriendRepository {
    pool: PgPool,
}

impl FriendRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, requester_id: Uuid, addressee_id: Uuid) -> Result<Friendship, EventBuddyError> {
        let friendship = sqlx::query_as::<_, Friendship>(
            r#"
            INSERT INTO friendships (id, requester_id, addressee_id, status, created_at)
            VALUES ($1, $2, $3, 'pending', $4)
            RETURNING id, requester_id, addressee_id, status, created_at, responded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(requester_id)
        .bind(addressee_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(friendship)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Friendship>, EventBuddyError> {
        let friendship = sqlx::query_as::<_, Friendship>(
            "SELECT id, requester_id, addressee_id, status, created_at, responded_at FROM friendships WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    /// Most recent relation between two users in either direction
    pub async fn find_between(&self, a: Uuid, b: Uuid) -> Result<Option<Friendship>, EventBuddyError> {
        let friendship = sqlx::query_as::<_, Friendship>(
            r#"
            SELECT id, requester_id, addressee_id, status, created_at, responded_at
            FROM friendships
            WHERE (requester_id = $1 AND addressee_id = $2) OR (requester_id = $2 AND addressee_id = $1)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    pub async fn update_status(&self, id: Uuid, status: FriendStatus) -> Result<Friendship, EventBuddyError> {
        let friendship = sqlx::query_as::<_, Friendship>(
            r#"
            UPDATE friendships
            SET status = $2, responded_at = $3
            WHERE id = $1
            RETURNING id, requester_id, addressee_id, status, created_at, responded_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        friendship.ok_or(EventBuddyError::FriendRequestNotFound { request_id: id })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), EventBuddyError> {
        sqlx::query("DELETE FROM friendships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Accepted relations involving the user
    pub async fn list_accepted(&self, user_id: Uuid) -> Result<Vec<Friendship>, EventBuddyError> {
        let friendships = sqlx::query_as::<_, Friendship>(
            r#"
            SELECT id, requester_id, addressee_id, status, created_at, responded_at
            FROM friendships
            WHERE (requester_id = $1 OR addressee_id = $1) AND status = 'accepted'
            ORDER BY responded_at DESC NULLS LAST
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    /// Pending requests addressed to the user
    pub async fn list_incoming(&self, user_id: Uuid) -> Result<Vec<Friendship>, EventBuddyError> {
        let friendships = sqlx::query_as::<_, Friendship>(
            r#"
            SELECT id, requester_id, addressee_id, status, created_at, responded_at
            FROM friendships
            WHERE addressee_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    /// Profiles of the user's friends who are going to an event
    pub async fn friends_going(&self, event_id: Uuid, user_id: Uuid) -> Result<Vec<UserProfile>, EventBuddyError> {
        let profiles = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT p.id, p.username, p.display_name, p.avatar_url, p.status, p.location, p.created_at, p.updated_at
            FROM profiles p
            INNER JOIN rsvps r ON r.user_id = p.id AND r.event_id = $1 AND r.status = 'going'
            INNER JOIN friendships f ON f.status = 'accepted'
                AND ((f.requester_id = $2 AND f.addressee_id = p.id) OR (f.addressee_id = $2 AND f.requester_id = p.id))
            ORDER BY p.username ASC NULLS LAST
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }
}
