//! Venue service implementation

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::{CreateVenueRequest, Venue};
use crate::utils::errors::{EventBuddyError, Result};
use crate::utils::helpers::normalize_whitespace;

#[derive(Clone, Debug)]
pub struct VenueService {
    database: Arc<DatabaseService>,
}

impl VenueService {
    pub fn new(database: Arc<DatabaseService>) -> Self {
        Self { database }
    }

    pub async fn list(&self) -> Result<Vec<Venue>> {
        self.database.venues.list().await
    }

    pub async fn get(&self, venue_id: Uuid) -> Result<Venue> {
        self.database
            .venues
            .find_by_id(venue_id)
            .await?
            .ok_or(EventBuddyError::VenueNotFound { venue_id })
    }

    pub async fn create(&self, user_id: Uuid, request: CreateVenueRequest) -> Result<Venue> {
        let request = validate_venue(request)?;
        let venue = self.database.venues.create(user_id, request).await?;
        info!(venue_id = %venue.id, user_id = %user_id, "Venue created");
        Ok(venue)
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| normalize_whitespace(&v)).filter(|v| !v.is_empty())
}

pub fn validate_venue(request: CreateVenueRequest) -> Result<CreateVenueRequest> {
    let name = normalize_whitespace(&request.name);
    if name.is_empty() {
        return Err(EventBuddyError::InvalidInput("Venue name is required.".to_string()));
    }
    if let Some(latitude) = request.latitude {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(EventBuddyError::InvalidInput(
                "Latitude must be between -90 and 90.".to_string(),
            ));
        }
    }
    if let Some(longitude) = request.longitude {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(EventBuddyError::InvalidInput(
                "Longitude must be between -180 and 180.".to_string(),
            ));
        }
    }

    Ok(CreateVenueRequest {
        name,
        address_line: trimmed(request.address_line),
        city: trimmed(request.city),
        postcode: trimmed(request.postcode),
        latitude: request.latitude,
        longitude: request.longitude,
    })
}
