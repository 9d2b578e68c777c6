//! Friend service implementation

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::{FriendStatus, Friendship, UserProfile};
use crate::utils::errors::{EventBuddyError, Result};

/// A pending request with the requester's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingRequest {
    pub request: Friendship,
    pub requester: Option<UserProfile>,
}

#[derive(Clone, Debug)]
pub struct FriendService {
    database: Arc<DatabaseService>,
}

impl FriendService {
    pub fn new(database: Arc<DatabaseService>) -> Self {
        Self { database }
    }

    pub async fn send_request(&self, requester_id: Uuid, addressee_id: Uuid) -> Result<Friendship> {
        if requester_id == addressee_id {
            return Err(EventBuddyError::InvalidInput(
                "You cannot send a friend request to yourself.".to_string(),
            ));
        }

        if self.database.profiles.find_by_id(addressee_id).await?.is_none() {
            return Err(EventBuddyError::ProfileNotFound(addressee_id.to_string()));
        }

        if let Some(existing) = self.database.friends.find_between(requester_id, addressee_id).await? {
            check_can_request(&existing)?;
        }

        let friendship = self.database.friends.create(requester_id, addressee_id).await?;
        info!(request_id = %friendship.id, requester_id = %requester_id, addressee_id = %addressee_id, "Friend request sent");
        Ok(friendship)
    }

    /// Accept or decline; only the addressee may respond, and only once
    pub async fn respond(&self, user_id: Uuid, request_id: Uuid, accept: bool) -> Result<Friendship> {
        let request = self
            .database
            .friends
            .find_by_id(request_id)
            .await?
            .ok_or(EventBuddyError::FriendRequestNotFound { request_id })?;

        check_can_respond(&request, user_id)?;

        let status = if accept { FriendStatus::Accepted } else { FriendStatus::Declined };
        let updated = self.database.friends.update_status(request_id, status).await?;
        info!(request_id = %request_id, status = %status, "Friend request answered");
        Ok(updated)
    }

    /// Remove a friendship or withdraw a request; either party may do so
    pub async fn remove(&self, user_id: Uuid, friendship_id: Uuid) -> Result<()> {
        let friendship = self
            .database
            .friends
            .find_by_id(friendship_id)
            .await?
            .ok_or(EventBuddyError::FriendRequestNotFound { request_id: friendship_id })?;

        if !friendship.involves(user_id) {
            return Err(EventBuddyError::PermissionDenied(
                "That friendship is not yours to remove.".to_string(),
            ));
        }

        self.database.friends.delete(friendship_id).await
    }

    pub async fn list_friends(&self, user_id: Uuid) -> Result<Vec<UserProfile>> {
        let friendships = self.database.friends.list_accepted(user_id).await?;
        let ids: Vec<Uuid> = friendships.iter().map(|f| f.other_party(user_id)).collect();
        self.database.profiles.find_by_ids(&ids).await
    }

    pub async fn list_incoming(&self, user_id: Uuid) -> Result<Vec<IncomingRequest>> {
        let requests = self.database.friends.list_incoming(user_id).await?;
        let ids: Vec<Uuid> = requests.iter().map(|r| r.requester_id).collect();
        let profiles = self.database.profiles.find_by_ids(&ids).await?;

        Ok(requests
            .into_iter()
            .map(|request| {
                let requester = profiles.iter().find(|p| p.id == request.requester_id).cloned();
                IncomingRequest { request, requester }
            })
            .collect())
    }

    pub async fn friends_going(&self, event_id: Uuid, viewer: Uuid) -> Result<Vec<UserProfile>> {
        self.database.friends.friends_going(event_id, viewer).await
    }
}

/// A new request is blocked by a pending or accepted relation
fn check_can_request(existing: &Friendship) -> Result<()> {
    match existing.status() {
        Some(FriendStatus::Pending) => Err(EventBuddyError::Conflict(
            "A friend request is already pending.".to_string(),
        )),
        Some(FriendStatus::Accepted) => Err(EventBuddyError::Conflict(
            "You are already friends.".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_can_respond(request: &Friendship, user_id: Uuid) -> Result<()> {
    if request.addressee_id != user_id {
        return Err(EventBuddyError::PermissionDenied(
            "Only the recipient can answer this request.".to_string(),
        ));
    }
    if request.status() != Some(FriendStatus::Pending) {
        return Err(EventBuddyError::Conflict(
            "This request has already been answered.".to_string(),
        ));
    }
    Ok(())
}
