//! Event card and detail views

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{EventListing, RsvpStatus, Venue};

use super::ProfileCard;

pub const TIME_TBA: &str = "Time TBA";
pub const VENUE_TBA: &str = "Venue TBA";
pub const NO_DESCRIPTION: &str = "No description yet.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCard {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub date_label: String,
    pub time_label: String,
    pub venue_label: String,
    pub image_url: String,
    pub going_count: i64,
    pub interested_count: i64,
    pub tags: Vec<String>,
    pub viewer_status: Option<RsvpStatus>,
}

impl EventCard {
    pub fn from_listing(listing: &EventListing, viewer_status: Option<RsvpStatus>, placeholder_image: &str) -> Self {
        let event = &listing.event;
        let category = event
            .category()
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| event.category.clone());

        Self {
            id: event.id,
            title: event.title.clone(),
            category,
            date_label: date_label(event.start_date, event.end_date),
            time_label: time_label(event.start_time, event.end_time),
            venue_label: venue_label(listing.venue.as_ref()),
            image_url: event
                .image_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .unwrap_or(placeholder_image)
                .to_string(),
            going_count: event.going_count,
            interested_count: event.interested_count,
            tags: event.tags.clone(),
            viewer_status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub card: EventCard,
    pub description: String,
    pub venue: Option<Venue>,
    pub venue_address: Option<String>,
    pub gallery: Vec<String>,
    pub friends_going: Vec<ProfileCard>,
    pub organiser_id: Option<Uuid>,
    /// The viewer has an RSVP write still pending
    pub rsvp_pending: bool,
}

impl EventDetail {
    pub fn new(card: EventCard, listing: &EventListing, friends_going: Vec<ProfileCard>, rsvp_pending: bool) -> Self {
        let event = &listing.event;
        Self {
            card,
            description: event
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(NO_DESCRIPTION)
                .to_string(),
            venue_address: listing.venue.as_ref().and_then(Venue::address),
            venue: listing.venue.clone(),
            gallery: event.gallery_urls.clone(),
            friends_going,
            organiser_id: event.organiser_id,
            rsvp_pending,
        }
    }
}

/// `Sat 14 Jun`, or `Fri 13 Jun – Sun 15 Jun` across days
pub fn date_label(start: NaiveDate, end: Option<NaiveDate>) -> String {
    let format = |date: NaiveDate| date.format("%a %-d %b").to_string();
    match end {
        Some(end) if end > start => format!("{} – {}", format(start), format(end)),
        _ => format(start),
    }
}

/// `19:00`, `19:00 – 23:00` or `Time TBA`
pub fn time_label(start: Option<NaiveTime>, end: Option<NaiveTime>) -> String {
    let format = |time: NaiveTime| time.format("%H:%M").to_string();
    match (start, end) {
        (Some(start), Some(end)) => format!("{} – {}", format(start), format(end)),
        (Some(start), None) => format(start),
        (None, _) => TIME_TBA.to_string(),
    }
}

pub fn venue_label(venue: Option<&Venue>) -> String {
    match venue {
        Some(venue) => match venue.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => format!("{}, {}", venue.name, city),
            None => venue.name.clone(),
        },
        None => VENUE_TBA.to_string(),
    }
}
