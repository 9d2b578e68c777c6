//! Profile service implementation
//!
//! Profiles are keyed by the auth provider's user id and created the first
//! time a user signs in.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::{UpdateProfileRequest, UserProfile};
use crate::services::event::EventService;
use crate::utils::errors::{EventBuddyError, Result};
use crate::utils::helpers::{is_http_url, normalize_whitespace};
use crate::utils::logging::log_user_action;
use crate::views::{EventCard, ProfileCard};

/// Public profile page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePage {
    pub profile: ProfileCard,
    pub going: Vec<EventCard>,
}

#[derive(Clone, Debug)]
pub struct ProfileService {
    database: Arc<DatabaseService>,
    events: EventService,
    username_pattern: Regex,
    placeholder_avatar: String,
}

impl ProfileService {
    pub fn new(database: Arc<DatabaseService>, events: EventService, placeholder_avatar: String) -> Result<Self> {
        Ok(Self {
            database,
            events,
            username_pattern: username_pattern()?,
            placeholder_avatar,
        })
    }

    pub fn card(&self, profile: &UserProfile) -> ProfileCard {
        ProfileCard::from_profile(profile, &self.placeholder_avatar)
    }

    /// Create an empty profile on first sign-in
    pub async fn ensure_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        debug!(user_id = %user_id, "Ensuring profile exists");
        self.database.profiles.ensure(user_id).await
    }

    pub async fn get(&self, user_id: Uuid) -> Result<UserProfile> {
        self.database
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| EventBuddyError::ProfileNotFound(user_id.to_string()))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<UserProfile> {
        let username = username.trim().trim_start_matches('@').to_lowercase();
        self.database
            .profiles
            .find_by_username(&username)
            .await?
            .ok_or(EventBuddyError::ProfileNotFound(username))
    }

    /// Public page: card plus upcoming events the user is going to
    pub async fn page(&self, username: &str) -> Result<ProfilePage> {
        let profile = self.get_by_username(username).await?;
        let rsvps = self.events.my_rsvps(profile.id).await?;

        Ok(ProfilePage {
            profile: self.card(&profile),
            going: rsvps.going,
        })
    }

    pub async fn update(&self, user_id: Uuid, request: UpdateProfileRequest) -> Result<UserProfile> {
        let username = request
            .username
            .as_deref()
            .map(|u| validate_username(&self.username_pattern, u))
            .transpose()?;

        if let Some(username) = &username {
            if self.database.profiles.username_taken(username, user_id).await? {
                return Err(EventBuddyError::Conflict("Username is already taken".to_string()));
            }
        }

        let avatar_url = request.avatar_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        if let Some(url) = &avatar_url {
            if !is_http_url(url) {
                return Err(EventBuddyError::InvalidInput("Avatar must be an http(s) URL.".to_string()));
            }
        }

        let clean = |value: Option<String>| value.map(|v| normalize_whitespace(&v));
        let request = UpdateProfileRequest {
            username,
            display_name: clean(request.display_name),
            avatar_url,
            status: clean(request.status),
            location: clean(request.location),
        };

        self.database.profiles.ensure(user_id).await?;
        let profile = match self.database.profiles.update(user_id, request).await {
            Err(EventBuddyError::Database(sqlx::Error::Database(db))) if db.is_unique_violation() => {
                return Err(EventBuddyError::Conflict("Username is already taken".to_string()));
            }
            other => other?,
        };

        log_user_action(user_id, "profile_updated", profile.username.as_deref());
        Ok(profile)
    }
}

fn username_pattern() -> Result<Regex> {
    Regex::new(r"^[a-z0-9_]{3,30}$").map_err(|e| EventBuddyError::Config(e.to_string()))
}

/// Lowercase and check a requested username
pub fn validate_username(pattern: &Regex, username: &str) -> Result<String> {
    let username = username.trim().trim_start_matches('@').to_lowercase();
    if pattern.is_match(&username) {
        Ok(username)
    } else {
        Err(EventBuddyError::InvalidInput(
            "Usernames are 3-30 characters: letters, numbers and underscores.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_usernames_are_lowercased() {
        let pattern = username_pattern().unwrap();
        assert_eq!(validate_username(&pattern, "@Dana_K").unwrap(), "dana_k");
        assert_eq!(validate_username(&pattern, " abc ").unwrap(), "abc");
    }

    #[test]
    fn test_invalid_usernames_are_rejected() {
        let pattern = username_pattern().unwrap();
        let long = "x".repeat(31);
        for bad in ["ab", "dana k", "dana-k", "émile", long.as_str()] {
            assert_matches!(validate_username(&pattern, bad), Err(EventBuddyError::InvalidInput(_)));
        }
    }
}
