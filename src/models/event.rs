//! Event model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::venue::Venue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub venue_id: Option<Uuid>,
    pub organiser_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub is_published: bool,
    pub going_count: i64,
    pub interested_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Local start datetime; all-day events start at midnight
    pub fn starts_at(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time.unwrap_or(NaiveTime::MIN))
    }

    /// Last calendar day the event runs on
    pub fn last_day(&self) -> NaiveDate {
        match self.end_date {
            Some(end) if end >= self.start_date => end,
            _ => self.start_date,
        }
    }

    pub fn category(&self) -> Option<EventCategory> {
        self.category.parse().ok()
    }
}

/// An event joined with its venue, the unit the filter pipeline works on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventListing {
    pub event: Event,
    pub venue: Option<Venue>,
}

impl EventListing {
    pub fn new(event: Event, venue: Option<Venue>) -> Self {
        Self { event, venue }
    }

    pub fn id(&self) -> Uuid {
        self.event.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Music,
    Nightlife,
    FoodAndDrink,
    Arts,
    Comedy,
    Sports,
    Wellness,
    Community,
    Markets,
    Family,
    Other,
}

impl EventCategory {
    pub const ALL: [EventCategory; 11] = [
        EventCategory::Music,
        EventCategory::Nightlife,
        EventCategory::FoodAndDrink,
        EventCategory::Arts,
        EventCategory::Comedy,
        EventCategory::Sports,
        EventCategory::Wellness,
        EventCategory::Community,
        EventCategory::Markets,
        EventCategory::Family,
        EventCategory::Other,
    ];

    /// Stored and query-string form
    pub fn slug(&self) -> &'static str {
        match self {
            EventCategory::Music => "music",
            EventCategory::Nightlife => "nightlife",
            EventCategory::FoodAndDrink => "food_and_drink",
            EventCategory::Arts => "arts",
            EventCategory::Comedy => "comedy",
            EventCategory::Sports => "sports",
            EventCategory::Wellness => "wellness",
            EventCategory::Community => "community",
            EventCategory::Markets => "markets",
            EventCategory::Family => "family",
            EventCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Music => "Music",
            EventCategory::Nightlife => "Nightlife",
            EventCategory::FoodAndDrink => "Food & Drink",
            EventCategory::Arts => "Arts",
            EventCategory::Comedy => "Comedy",
            EventCategory::Sports => "Sports",
            EventCategory::Wellness => "Wellness",
            EventCategory::Community => "Community",
            EventCategory::Markets => "Markets",
            EventCategory::Family => "Family",
            EventCategory::Other => "Other",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .replace('&', "and")
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        EventCategory::ALL
            .iter()
            .copied()
            .find(|category| category.slug() == normalized)
            .ok_or_else(|| format!("Unknown category: {}", value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub venue_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub gallery_urls: Vec<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub venue_id: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub gallery_urls: Option<Vec<String>>,
    pub is_published: Option<bool>,
}
