//! RSVP model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Going,
    Interested,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Going => "going",
            RsvpStatus::Interested => "interested",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "going" => Ok(RsvpStatus::Going),
            "interested" => Ok(RsvpStatus::Interested),
            other => Err(format!("Unknown RSVP status: {}", other)),
        }
    }
}

/// Status after the user clicks `clicked` while holding `current`.
/// Clicking the active status clears it.
pub fn next_status(current: Option<RsvpStatus>, clicked: RsvpStatus) -> Option<RsvpStatus> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Rsvp {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Rsvp {
    /// Unknown stored values are treated as no RSVP
    pub fn status(&self) -> Option<RsvpStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpCounts {
    pub going: i64,
    pub interested: i64,
}

impl RsvpCounts {
    pub fn new(going: i64, interested: i64) -> Self {
        Self { going, interested }
    }

    /// Counts after one user's status moves from `from` to `to`
    pub fn apply_transition(self, from: Option<RsvpStatus>, to: Option<RsvpStatus>) -> Self {
        let mut counts = self;
        if from == to {
            return counts;
        }
        match from {
            Some(RsvpStatus::Going) => counts.going = (counts.going - 1).max(0),
            Some(RsvpStatus::Interested) => counts.interested = (counts.interested - 1).max(0),
            None => {}
        }
        match to {
            Some(RsvpStatus::Going) => counts.going += 1,
            Some(RsvpStatus::Interested) => counts.interested += 1,
            None => {}
        }
        counts
    }
}

/// Body of `POST /events/:id/rsvp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpRequest {
    pub status: RsvpStatus,
    /// Page the click came from, for scroll restoration
    pub page: Option<String>,
    pub scroll_y: Option<f64>,
}
