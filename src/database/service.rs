//! Database service layer
//!
//! This module provides a high-level interface to database operations

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::{
    DatabasePool, EventRepository, FriendRepository, PlanRepository, ProfileRepository, RsvpRepository,
    VenueRepository,
};
use crate::models::*;
use crate::utils::errors::EventBuddyError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub events: EventRepository,
    pub venues: VenueRepository,
    pub profiles: ProfileRepository,
    pub rsvps: RsvpRepository,
    pub friends: FriendRepository,
    pub plans: PlanRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            venues: VenueRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            rsvps: RsvpRepository::new(pool.clone()),
            friends: FriendRepository::new(pool.clone()),
            plans: PlanRepository::new(pool),
        }
    }

    /// Attach venues to events with one venue lookup
    pub async fn attach_venues(&self, events: Vec<Event>) -> Result<Vec<EventListing>, EventBuddyError> {
        let mut venue_ids: Vec<Uuid> = events.iter().filter_map(|e| e.venue_id).collect();
        venue_ids.sort();
        venue_ids.dedup();

        let venues: HashMap<Uuid, Venue> = self
            .venues
            .find_by_ids(&venue_ids)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        Ok(events
            .into_iter()
            .map(|event| {
                let venue = event.venue_id.and_then(|id| venues.get(&id).cloned());
                EventListing::new(event, venue)
            })
            .collect())
    }

    /// Published listings that may still be visible on or after `from`
    pub async fn published_listings(&self, from: NaiveDate) -> Result<Vec<EventListing>, EventBuddyError> {
        let events = self.events.list_published_from(from).await?;
        self.attach_venues(events).await
    }

    /// Map of event id to the user's current status
    pub async fn user_rsvp_map(&self, user_id: Uuid) -> Result<HashMap<Uuid, RsvpStatus>, EventBuddyError> {
        let rsvps = self.rsvps.list_for_user(user_id).await?;
        Ok(rsvps
            .into_iter()
            .filter_map(|r| r.status().map(|s| (r.event_id, s)))
            .collect())
    }

    /// Get system statistics
    pub async fn get_system_stats(&self) -> Result<serde_json::Value, EventBuddyError> {
        let events = self.events.count().await?;
        let profiles = self.profiles.count().await?;

        Ok(serde_json::json!({
            "events": events,
            "profiles": profiles,
        }))
    }
}
