//! Test context wiring settings, database and services together

use sqlx::postgres::PgPoolOptions;

use event_buddy::config::Settings;
use event_buddy::database::DatabaseService;
use event_buddy::services::{EventService, RsvpService, ServiceFactory};
use event_buddy::state::{AppState, InFlightRegistry, OptimisticOverlay, ViewStateStore};

use super::{TestDatabase, TEST_API_KEY, TEST_JWT_SECRET};

/// Settings for tests: no Redis, no settle delay, local time at UTC
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.features.redis_cache = false;
    settings.rsvp.settle_delay_ms = 0;
    settings.events.utc_offset_minutes = 0;
    settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    settings.auth.jwt_audience = None;
    settings.auth.api_key = TEST_API_KEY.to_string();
    settings.auth.timeout_seconds = 5;
    settings.server.allowed_origins = vec!["*".to_string()];
    settings
}

pub struct TestContext {
    pub db: TestDatabase,
    pub settings: Settings,
    pub services: ServiceFactory,
}

impl TestContext {
    pub async fn new(db: TestDatabase) -> anyhow::Result<Self> {
        Self::with_settings(db, test_settings()).await
    }

    pub async fn with_settings(db: TestDatabase, settings: Settings) -> anyhow::Result<Self> {
        let services = ServiceFactory::new(&settings, db.pool.clone(), ViewStateStore::in_memory(60))?;
        Ok(Self { db, settings, services })
    }

    pub fn database(&self) -> &DatabaseService {
        &self.services.database
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.settings.clone(), self.services.clone())
    }

    /// Event service reading through the given overlay and registry
    pub fn event_service(&self, overlay: OptimisticOverlay, in_flight: InFlightRegistry) -> EventService {
        EventService::new(
            self.services.database.clone(),
            None,
            overlay,
            in_flight,
            self.settings.events.clone(),
            self.settings.features.clone(),
        )
    }

    /// RSVP service sharing the given overlay and registry
    pub fn rsvp_service(
        &self,
        overlay: OptimisticOverlay,
        in_flight: InFlightRegistry,
        settle_delay_ms: u64,
    ) -> RsvpService {
        let mut rsvp = self.settings.rsvp.clone();
        rsvp.settle_delay_ms = settle_delay_ms;
        RsvpService::new(
            self.services.database.clone(),
            None,
            overlay,
            in_flight,
            self.services.view_state.clone(),
            self.settings.events.clone(),
            &rsvp,
        )
    }
}

/// App state over a pool that never connects, for routes that fail before
/// touching the database
pub fn offline_state(settings: Settings) -> AppState {
    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy("postgresql://nobody@127.0.0.1:1/none")
        .expect("lazy pool");
    let services =
        ServiceFactory::new(&settings, pool, ViewStateStore::in_memory(60)).expect("services");
    AppState::new(settings, services)
}

