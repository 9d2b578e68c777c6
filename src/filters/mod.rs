//! Event filtering pipeline
//!
//! Listings pass through visibility first, then category, venue, date range,
//! free-text search and vibes, in that order. Every stage is an independent
//! predicate and an empty criterion never excludes anything, so clearing the
//! filters yields exactly the visible listings.

pub mod date_range;
pub mod visibility;

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{EventCategory, EventListing};
use crate::utils::errors::{EventBuddyError, Result};
use crate::utils::helpers::{normalize_tag, normalize_whitespace, split_csv};

pub use date_range::DateRange;
pub use visibility::{has_ended, is_visible, visible_until};

/// Raw filter parameters as they arrive on the query string.
/// Multi-valued parameters are comma-separated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub venue: Option<String>,
    pub when: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub q: Option<String>,
    pub vibe: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilters {
    pub categories: BTreeSet<EventCategory>,
    pub venues: BTreeSet<Uuid>,
    pub date_range: DateRange,
    pub search: String,
    pub vibes: BTreeSet<String>,
}

impl EventFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse query parameters, rejecting malformed values
    pub fn from_query(query: &FilterQuery) -> Result<Self> {
        let mut filters = EventFilters::new();

        if let Some(categories) = &query.category {
            for slug in split_csv(categories) {
                let category = slug
                    .parse::<EventCategory>()
                    .map_err(EventBuddyError::InvalidInput)?;
                filters.categories.insert(category);
            }
        }

        if let Some(venues) = &query.venue {
            for id in split_csv(venues) {
                let venue_id = Uuid::parse_str(&id)
                    .map_err(|_| EventBuddyError::InvalidInput(format!("Invalid venue id: {}", id)))?;
                filters.venues.insert(venue_id);
            }
        }

        filters.date_range = DateRange::parse(query.when.as_deref(), query.from, query.to)
            .map_err(EventBuddyError::InvalidInput)?;

        if let Some(search) = &query.q {
            filters.set_search(search);
        }

        if let Some(vibes) = &query.vibe {
            for vibe in split_csv(vibes) {
                if let Some(vibe) = normalize_tag(&vibe) {
                    filters.vibes.insert(vibe);
                }
            }
        }

        Ok(filters)
    }

    /// Serialize back to a query string, used when persisting view state
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();

        if !self.categories.is_empty() {
            let slugs: Vec<&str> = self.categories.iter().map(|c| c.slug()).collect();
            parts.push(format!("category={}", slugs.join(",")));
        }
        if !self.venues.is_empty() {
            let ids: Vec<String> = self.venues.iter().map(Uuid::to_string).collect();
            parts.push(format!("venue={}", ids.join(",")));
        }
        match self.date_range {
            DateRange::Any => {}
            DateRange::Custom { from, to } => {
                parts.push("when=custom".to_string());
                if let Some(from) = from {
                    parts.push(format!("from={}", from));
                }
                if let Some(to) = to {
                    parts.push(format!("to={}", to));
                }
            }
            preset => parts.push(format!("when={}", preset.slug())),
        }
        if !self.search.is_empty() {
            let encoded: String = url::form_urlencoded::byte_serialize(self.search.as_bytes()).collect();
            parts.push(format!("q={}", encoded));
        }
        if !self.vibes.is_empty() {
            let vibes: Vec<String> = self
                .vibes
                .iter()
                .map(|v| url::form_urlencoded::byte_serialize(v.as_bytes()).collect())
                .collect();
            parts.push(format!("vibe={}", vibes.join(",")));
        }

        parts.join("&")
    }

    pub fn toggle_category(&mut self, category: EventCategory) {
        if !self.categories.remove(&category) {
            self.categories.insert(category);
        }
    }

    pub fn toggle_venue(&mut self, venue_id: Uuid) {
        if !self.venues.remove(&venue_id) {
            self.venues.insert(venue_id);
        }
    }

    pub fn toggle_vibe(&mut self, vibe: &str) {
        if let Some(vibe) = normalize_tag(vibe) {
            if !self.vibes.remove(&vibe) {
                self.vibes.insert(vibe);
            }
        }
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = normalize_whitespace(search);
    }

    /// Reset every criterion
    pub fn clear(&mut self) {
        *self = EventFilters::default();
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Number of criteria groups currently restricting the list
    pub fn active_count(&self) -> usize {
        [
            !self.categories.is_empty(),
            !self.venues.is_empty(),
            self.date_range != DateRange::Any,
            !self.search.is_empty(),
            !self.vibes.is_empty(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    fn matches_category(&self, listing: &EventListing) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        listing
            .event
            .category()
            .map_or(false, |category| self.categories.contains(&category))
    }

    fn matches_venue(&self, listing: &EventListing) -> bool {
        if self.venues.is_empty() {
            return true;
        }
        listing
            .event
            .venue_id
            .map_or(false, |venue_id| self.venues.contains(&venue_id))
    }

    fn matches_date(&self, listing: &EventListing, today: NaiveDate) -> bool {
        self.date_range
            .overlaps(today, listing.event.start_date, listing.event.last_day())
    }

    fn matches_search(&self, listing: &EventListing) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        searchable_fields(listing)
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_vibes(&self, listing: &EventListing) -> bool {
        if self.vibes.is_empty() {
            return true;
        }
        listing
            .event
            .tags
            .iter()
            .filter_map(|tag| normalize_tag(tag))
            .any(|tag| self.vibes.contains(&tag))
    }

    /// Whether a visible listing passes every criterion
    pub fn matches(&self, listing: &EventListing, today: NaiveDate) -> bool {
        self.matches_category(listing)
            && self.matches_venue(listing)
            && self.matches_date(listing, today)
            && self.matches_search(listing)
            && self.matches_vibes(listing)
    }
}

fn searchable_fields(listing: &EventListing) -> Vec<&str> {
    let event = &listing.event;
    let mut fields = vec![event.title.as_str()];
    if let Some(description) = &event.description {
        fields.push(description);
    }
    if let Some(category) = event.category() {
        fields.push(category.label());
    }
    if let Some(venue) = &listing.venue {
        fields.push(&venue.name);
        if let Some(city) = &venue.city {
            fields.push(city);
        }
    }
    fields.extend(event.tags.iter().map(String::as_str));
    fields
}

/// Output of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    /// Listings that pass visibility alone
    pub total_visible: usize,
    pub matches: Vec<EventListing>,
}

/// Run the full pipeline over `listings` at local time `now`
pub fn apply(
    listings: &[EventListing],
    filters: &EventFilters,
    now: NaiveDateTime,
    grace: Duration,
) -> FilterResult {
    let today = now.date();
    let visible: Vec<&EventListing> = listings
        .iter()
        .filter(|listing| is_visible(&listing.event, now, grace))
        .collect();

    let mut matches: Vec<EventListing> = visible
        .iter()
        .filter(|listing| filters.matches(listing, today))
        .map(|listing| (*listing).clone())
        .collect();
    sort_listings(&mut matches);

    FilterResult {
        total_visible: visible.len(),
        matches,
    }
}

/// Chronological order, ties broken by title
pub fn sort_listings(listings: &mut [EventListing]) {
    listings.sort_by(|a, b| {
        a.event
            .starts_at()
            .cmp(&b.event.starts_at())
            .then_with(|| a.event.title.cmp(&b.event.title))
    });
}

/// Distinct vibes across visible listings, for the filter chip list
pub fn available_vibes(
    listings: &[EventListing],
    now: NaiveDateTime,
    grace: Duration,
) -> Vec<String> {
    listings
        .iter()
        .filter(|listing| is_visible(&listing.event, now, grace))
        .flat_map(|listing| listing.event.tags.iter())
        .filter_map(|tag| normalize_tag(tag))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use crate::models::{Event, EventListing, Venue};

    pub fn event_on(date: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Untitled".to_string(),
            description: None,
            category: "music".to_string(),
            start_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: None,
            end_date: None,
            end_time: None,
            venue_id: None,
            organiser_id: None,
            tags: vec![],
            image_url: None,
            gallery_urls: vec![],
            is_published: true,
            going_count: 0,
            interested_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn venue(name: &str, city: Option<&str>) -> Venue {
        Venue {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address_line: None,
            city: city.map(str::to_string),
            postcode: None,
            latitude: None,
            longitude: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    pub fn listing(title: &str, date: &str, category: &str, tags: &[&str]) -> EventListing {
        let mut event = event_on(date);
        event.title = title.to_string();
        event.category = category.to_string();
        event.tags = tags.iter().map(|t| t.to_string()).collect();
        EventListing::new(event, None)
    }
}
