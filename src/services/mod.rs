//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod event;
pub mod friend;
pub mod plan;
pub mod profile;
pub mod redis;
pub mod rsvp;
pub mod venue;

// Re-export commonly used services
pub use auth::{AuthContext, AuthService, AuthSession, Credentials, SignUpOutcome};
pub use event::{EventService, MyRsvps};
pub use friend::{FriendService, IncomingRequest};
pub use plan::PlanService;
pub use profile::{ProfilePage, ProfileService};
pub use redis::{CacheEntry, RedisService};
pub use rsvp::{RsvpOutcome, RsvpService};
pub use venue::VenueService;

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::settings::Settings;
use crate::database::{DatabasePool, DatabaseService};
use crate::state::{InFlightRegistry, OptimisticOverlay, ViewStateStore};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub pool: DatabasePool,
    pub database: Arc<DatabaseService>,
    pub redis_service: Option<RedisService>,
    pub auth_service: AuthService,
    pub event_service: EventService,
    pub rsvp_service: RsvpService,
    pub venue_service: VenueService,
    pub profile_service: ProfileService,
    pub friend_service: FriendService,
    pub plan_service: PlanService,
    pub view_state: ViewStateStore,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, pool: DatabasePool, view_state: ViewStateStore) -> Result<Self> {
        let database = Arc::new(DatabaseService::new(pool.clone()));
        let redis_service = if settings.features.redis_cache {
            Some(RedisService::new(&settings.redis)?)
        } else {
            info!("Redis cache disabled, reading listings from the database");
            None
        };

        let overlay = OptimisticOverlay::new();
        let in_flight = InFlightRegistry::new();

        let event_service = EventService::new(
            database.clone(),
            redis_service.clone(),
            overlay.clone(),
            in_flight.clone(),
            settings.events.clone(),
            settings.features.clone(),
        );
        let rsvp_service = RsvpService::new(
            database.clone(),
            redis_service.clone(),
            overlay,
            in_flight,
            view_state.clone(),
            settings.events.clone(),
            &settings.rsvp,
        );
        let profile_service = ProfileService::new(
            database.clone(),
            event_service.clone(),
            settings.events.placeholder_avatar_url.clone(),
        )?;

        Ok(Self {
            auth_service: AuthService::new(settings.auth.clone())?,
            venue_service: VenueService::new(database.clone()),
            friend_service: FriendService::new(database.clone()),
            plan_service: PlanService::new(database.clone(), settings.events.ended_grace_minutes),
            event_service,
            rsvp_service,
            profile_service,
            redis_service,
            view_state,
            database,
            pool,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = crate::database::health_check(&self.pool).await.is_ok();
        let redis_healthy = match &self.redis_service {
            Some(redis) => Some(redis.health_check().await.unwrap_or(false)),
            None => None,
        };

        ServiceHealthStatus {
            database_healthy,
            redis_healthy,
            view_state_persistent: self.view_state.is_persistent(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    /// `None` when the cache is disabled
    pub redis_healthy: Option<bool>,
    pub view_state_persistent: bool,
}

impl ServiceHealthStatus {
    /// Only the database is critical; Redis failures degrade to fallbacks
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if self.redis_healthy == Some(false) {
            issues.push("Redis connection failed".to_string());
        }

        issues
    }
}
