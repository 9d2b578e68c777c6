//! Event service implementation
//!
//! Public listing and detail pages plus organiser tooling. Listings are read
//! through the Redis cache when it is enabled; any cache failure falls back
//! to the database.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EventsConfig, FeaturesConfig};
use crate::database::DatabaseService;
use crate::filters::{self, EventFilters};
use crate::models::{
    CreateEventRequest, EventCategory, EventListing, RsvpCounts, RsvpStatus, UpdateEventRequest,
};
use crate::services::redis::{user_rsvps_key, RedisService, LISTINGS_KEY};
use crate::state::{InFlightRegistry, OptimisticOverlay};
use crate::utils::errors::{EventBuddyError, Result};
use crate::utils::helpers::{is_http_url, local_now, normalize_tags, normalize_whitespace};
use crate::utils::logging::log_event_action;
use crate::views::{EventCard, EventDetail, EventListPage, ProfileCard};

pub const MAX_TITLE_CHARS: usize = 120;

/// The viewer's upcoming RSVPs, split by status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MyRsvps {
    pub going: Vec<EventCard>,
    pub interested: Vec<EventCard>,
}

#[derive(Clone, Debug)]
pub struct EventService {
    database: Arc<DatabaseService>,
    cache: Option<RedisService>,
    overlay: OptimisticOverlay,
    in_flight: InFlightRegistry,
    config: EventsConfig,
    features: FeaturesConfig,
}

impl EventService {
    pub fn new(
        database: Arc<DatabaseService>,
        cache: Option<RedisService>,
        overlay: OptimisticOverlay,
        in_flight: InFlightRegistry,
        config: EventsConfig,
        features: FeaturesConfig,
    ) -> Self {
        Self {
            database,
            cache,
            overlay,
            in_flight,
            config,
            features,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        local_now(self.config.utc_offset_minutes)
    }

    pub fn grace(&self) -> Duration {
        Duration::minutes(self.config.ended_grace_minutes)
    }

    /// Published listings, from cache when possible
    pub async fn published_listings(&self) -> Result<Vec<EventListing>> {
        if let Some(cache) = &self.cache {
            match cache.get::<Vec<EventListing>>(LISTINGS_KEY).await {
                Ok(Some(listings)) => return Ok(listings),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Listing cache read failed, using database"),
            }
        }

        // Overnight events that started yesterday can still be running
        let from = self.now().date() - Duration::days(1);
        let listings = self.database.published_listings(from).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache
                .set(LISTINGS_KEY, &listings, Some(self.config.listing_cache_ttl_seconds))
                .await
            {
                warn!(error = %e, "Failed to cache listings");
            }
        }

        Ok(listings)
    }

    /// The viewer's statuses with pending optimistic ones applied
    pub async fn viewer_statuses(&self, viewer: Uuid) -> Result<HashMap<Uuid, RsvpStatus>> {
        let stored = self.database.user_rsvp_map(viewer).await?;
        Ok(self.overlay.merge(viewer, stored))
    }

    /// Adjust stored counts for a viewer's pending status
    fn overlay_counts(&self, listing: &mut EventListing, viewer: Uuid, stored: Option<RsvpStatus>) {
        if let Some(pending) = self.overlay.get(viewer, listing.id()) {
            let counts = RsvpCounts::new(listing.event.going_count, listing.event.interested_count)
                .apply_transition(stored, pending);
            listing.event.going_count = counts.going;
            listing.event.interested_count = counts.interested;
        }
    }

    /// Filtered, paginated event list
    pub async fn list(&self, filters: &EventFilters, viewer: Option<Uuid>, page: usize) -> Result<EventListPage> {
        let now = self.now();
        let mut listings = self.published_listings().await?;

        let statuses = match viewer {
            Some(viewer) => {
                let stored = self.database.user_rsvp_map(viewer).await?;
                for listing in listings.iter_mut() {
                    let stored_status = stored.get(&listing.id()).copied();
                    self.overlay_counts(listing, viewer, stored_status);
                }
                self.overlay.merge(viewer, stored)
            }
            None => HashMap::new(),
        };

        let result = filters::apply(&listings, filters, now, self.grace());
        let vibes = filters::available_vibes(&listings, now, self.grace());
        debug!(
            total_visible = result.total_visible,
            matches = result.matches.len(),
            active_filters = filters.active_count(),
            "Event list filtered"
        );

        Ok(EventListPage::build(
            &result,
            filters,
            &statuses,
            vibes,
            page,
            self.config.page_size,
            &self.config.placeholder_image_url,
        ))
    }

    /// Vibe chips for the currently visible listings
    pub async fn vibes(&self) -> Result<Vec<String>> {
        let listings = self.published_listings().await?;
        Ok(filters::available_vibes(&listings, self.now(), self.grace()))
    }

    /// Published event joined with its venue
    pub async fn find_listing(&self, event_id: Uuid) -> Result<EventListing> {
        let event = self
            .database
            .events
            .find_by_id(event_id)
            .await?
            .filter(|event| event.is_published)
            .ok_or(EventBuddyError::EventNotFound { event_id })?;

        let venue = match event.venue_id {
            Some(venue_id) => self.database.venues.find_by_id(venue_id).await?,
            None => None,
        };

        Ok(EventListing::new(event, venue))
    }

    pub async fn detail(&self, event_id: Uuid, viewer: Option<Uuid>) -> Result<EventDetail> {
        let database = &self.database;
        let friends_enabled = self.features.friends;

        let (mut listing, stored_status, friends) = futures::try_join!(
            self.find_listing(event_id),
            async {
                match viewer {
                    Some(viewer) => Ok::<_, EventBuddyError>(
                        database
                            .rsvps
                            .find(event_id, viewer)
                            .await?
                            .and_then(|rsvp| rsvp.status()),
                    ),
                    None => Ok(None),
                }
            },
            async {
                match viewer {
                    Some(viewer) if friends_enabled => database.friends.friends_going(event_id, viewer).await,
                    _ => Ok(Vec::new()),
                }
            },
        )?;

        let (status, pending) = match viewer {
            Some(viewer) => {
                self.overlay_counts(&mut listing, viewer, stored_status);
                let status = match self.overlay.get(viewer, event_id) {
                    Some(pending) => pending,
                    None => stored_status,
                };
                (status, self.in_flight.is_in_flight(viewer, event_id))
            }
            None => (None, false),
        };

        let card = EventCard::from_listing(&listing, status, &self.config.placeholder_image_url);
        let friends_going = friends
            .iter()
            .map(|profile| ProfileCard::from_profile(profile, &self.config.placeholder_avatar_url))
            .collect();

        Ok(EventDetail::new(card, &listing, friends_going, pending))
    }

    /// Cache for a user's RSVP list; bypassed while any of their writes is pending
    fn rsvp_list_cache(&self, user_id: Uuid) -> Option<&RedisService> {
        if self.overlay.for_user(user_id).is_empty() {
            self.cache.as_ref()
        } else {
            None
        }
    }

    /// The viewer's upcoming Going and Interested events
    pub async fn my_rsvps(&self, user_id: Uuid) -> Result<MyRsvps> {
        let key = user_rsvps_key(user_id);

        if let Some(cache) = self.rsvp_list_cache(user_id) {
            match cache.get::<MyRsvps>(&key).await {
                Ok(Some(cached)) => return Ok(cached),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "RSVP list cache read failed"),
            }
        }

        let now = self.now();
        let statuses = self.viewer_statuses(user_id).await?;
        let listings = self.published_listings().await?;
        let mut upcoming: Vec<EventListing> = listings
            .into_iter()
            .filter(|listing| statuses.contains_key(&listing.id()))
            .filter(|listing| filters::is_visible(&listing.event, now, self.grace()))
            .collect();
        filters::sort_listings(&mut upcoming);

        let mut result = MyRsvps::default();
        for listing in &upcoming {
            let status = statuses.get(&listing.id()).copied();
            let card = EventCard::from_listing(listing, status, &self.config.placeholder_image_url);
            match status {
                Some(RsvpStatus::Going) => result.going.push(card),
                Some(RsvpStatus::Interested) => result.interested.push(card),
                None => {}
            }
        }

        if let Some(cache) = self.rsvp_list_cache(user_id) {
            if let Err(e) = cache.set(&key, &result, None).await {
                warn!(error = %e, "Failed to cache RSVP list");
            }
        }

        Ok(result)
    }

    async fn invalidate(&self, event_id: Uuid) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate_event(event_id).await {
                warn!(event_id = %event_id, error = %e, "Failed to invalidate event caches");
            }
        }
    }

    /// Create an event owned by `organiser_id`
    pub async fn create(&self, organiser_id: Uuid, request: CreateEventRequest) -> Result<EventListing> {
        let request = validate_create(request)?;
        if let Some(venue_id) = request.venue_id {
            self.ensure_venue(venue_id).await?;
        }

        let event = self.database.events.create(organiser_id, request).await?;
        log_event_action(event.id, "created", organiser_id, Some(&event.title));
        info!(event_id = %event.id, organiser_id = %organiser_id, "Event created");

        self.invalidate(event.id).await;
        let mut listings = self.database.attach_venues(vec![event]).await?;
        listings
            .pop()
            .ok_or_else(|| EventBuddyError::ServiceUnavailable("event vanished after insert".to_string()))
    }

    /// Update an event; only its organiser may do so
    pub async fn update(&self, organiser_id: Uuid, event_id: Uuid, request: UpdateEventRequest) -> Result<EventListing> {
        let existing = self
            .database
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventBuddyError::EventNotFound { event_id })?;
        ensure_organiser(existing.organiser_id, organiser_id)?;

        let request = validate_update(&existing, request)?;
        if let Some(venue_id) = request.venue_id {
            self.ensure_venue(venue_id).await?;
        }

        let event = self.database.events.update(event_id, request).await?;
        log_event_action(event_id, "updated", organiser_id, None);

        self.invalidate(event_id).await;
        let mut listings = self.database.attach_venues(vec![event]).await?;
        listings.pop().ok_or(EventBuddyError::EventNotFound { event_id })
    }

    /// Delete an event; only its organiser may do so
    pub async fn delete(&self, organiser_id: Uuid, event_id: Uuid) -> Result<()> {
        let existing = self
            .database
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventBuddyError::EventNotFound { event_id })?;
        ensure_organiser(existing.organiser_id, organiser_id)?;

        self.database.events.delete(event_id).await?;
        log_event_action(event_id, "deleted", organiser_id, Some(&existing.title));

        self.invalidate(event_id).await;
        Ok(())
    }

    /// Every event the organiser created, past and unpublished included
    pub async fn list_mine(&self, organiser_id: Uuid) -> Result<Vec<EventListing>> {
        let events = self.database.events.list_by_organiser(organiser_id).await?;
        self.database.attach_venues(events).await
    }

    async fn ensure_venue(&self, venue_id: Uuid) -> Result<()> {
        self.database
            .venues
            .find_by_id(venue_id)
            .await?
            .map(|_| ())
            .ok_or(EventBuddyError::VenueNotFound { venue_id })
    }
}

fn ensure_organiser(owner: Option<Uuid>, caller: Uuid) -> Result<()> {
    if owner == Some(caller) {
        Ok(())
    } else {
        Err(EventBuddyError::PermissionDenied(
            "Only the organiser can change this event.".to_string(),
        ))
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = normalize_whitespace(title);
    if title.is_empty() {
        return Err(EventBuddyError::InvalidInput("Title is required.".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(EventBuddyError::InvalidInput(format!(
            "Title must be at most {} characters.",
            MAX_TITLE_CHARS
        )));
    }
    Ok(title)
}

fn validate_category(category: &str) -> Result<String> {
    category
        .parse::<EventCategory>()
        .map(|c| c.slug().to_string())
        .map_err(EventBuddyError::InvalidInput)
}

fn validate_urls(image_url: Option<&str>, gallery: &[String]) -> Result<()> {
    let invalid = image_url
        .into_iter()
        .chain(gallery.iter().map(String::as_str))
        .find(|url| !is_http_url(url));

    match invalid {
        Some(url) => Err(EventBuddyError::InvalidInput(format!("Not a valid image URL: {}", url))),
        None => Ok(()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Validate and normalize a new event
pub fn validate_create(request: CreateEventRequest) -> Result<CreateEventRequest> {
    let title = validate_title(&request.title)?;
    let category = validate_category(&request.category)?;

    if let Some(end_date) = request.end_date {
        if end_date < request.start_date {
            return Err(EventBuddyError::InvalidInput(
                "The event cannot end before it starts.".to_string(),
            ));
        }
    }

    let image_url = non_blank(request.image_url);
    validate_urls(image_url.as_deref(), &request.gallery_urls)?;

    Ok(CreateEventRequest {
        title,
        category,
        description: non_blank(request.description),
        tags: normalize_tags(&request.tags),
        image_url,
        ..request
    })
}

/// Validate an update against the stored event it changes
pub fn validate_update(existing: &crate::models::Event, request: UpdateEventRequest) -> Result<UpdateEventRequest> {
    let title = request.title.as_deref().map(validate_title).transpose()?;
    let category = request.category.as_deref().map(validate_category).transpose()?;

    let start_date = request.start_date.unwrap_or(existing.start_date);
    let end_date = request.end_date.or(existing.end_date);
    if matches!(end_date, Some(end) if end < start_date) {
        return Err(EventBuddyError::InvalidInput(
            "The event cannot end before it starts.".to_string(),
        ));
    }

    let image_url = non_blank(request.image_url);
    validate_urls(image_url.as_deref(), request.gallery_urls.as_deref().unwrap_or_default())?;

    Ok(UpdateEventRequest {
        title,
        category,
        description: non_blank(request.description),
        tags: request.tags.map(|tags| normalize_tags(&tags)),
        image_url,
        ..request
    })
}
