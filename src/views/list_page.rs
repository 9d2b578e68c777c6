//! Paginated event list view

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filters::{EventFilters, FilterResult};
use crate::models::RsvpStatus;
use crate::utils::helpers::calculate_offset;

use super::EventCard;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventListPage {
    pub cards: Vec<EventCard>,
    pub total_visible: usize,
    pub filtered_count: usize,
    pub active_filter_count: usize,
    pub filters_query: String,
    pub vibes: Vec<String>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

impl EventListPage {
    pub fn build(
        result: &FilterResult,
        filters: &EventFilters,
        statuses: &HashMap<Uuid, RsvpStatus>,
        vibes: Vec<String>,
        page: usize,
        page_size: usize,
        placeholder_image: &str,
    ) -> Self {
        let page = page.max(1);
        let offset = calculate_offset(page, page_size);
        let cards: Vec<EventCard> = result
            .matches
            .iter()
            .skip(offset)
            .take(page_size)
            .map(|listing| EventCard::from_listing(listing, statuses.get(&listing.id()).copied(), placeholder_image))
            .collect();

        Self {
            has_more: offset.saturating_add(cards.len()) < result.matches.len(),
            cards,
            total_visible: result.total_visible,
            filtered_count: result.matches.len(),
            active_filter_count: filters.active_count(),
            filters_query: filters.to_query_string(),
            vibes,
            page,
            page_size,
        }
    }
}
