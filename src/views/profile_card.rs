//! Public profile view

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserProfile;

pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCard {
    pub id: Uuid,
    pub handle: String,
    pub display_name: String,
    pub avatar_url: String,
    pub status: Option<String>,
    pub location: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ProfileCard {
    pub fn from_profile(profile: &UserProfile, placeholder_avatar: &str) -> Self {
        let username = non_blank(&profile.username);

        Self {
            id: profile.id,
            handle: username
                .map(|u| format!("@{}", u))
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            display_name: non_blank(&profile.display_name)
                .or(username)
                .unwrap_or(ANONYMOUS)
                .to_string(),
            avatar_url: non_blank(&profile.avatar_url)
                .unwrap_or(placeholder_avatar)
                .to_string(),
            status: non_blank(&profile.status).map(str::to_string),
            location: non_blank(&profile.location).map(str::to_string),
        }
    }
}
