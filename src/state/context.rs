//! Application context shared by every request handler

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabasePool;
use crate::middleware::rate_limit::LoginRateLimiter;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

use super::storage::ViewStateStore;

/// Axum state; cheap to clone
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub services: Arc<ServiceFactory>,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn new(settings: Settings, services: ServiceFactory) -> Self {
        let login_limiter = LoginRateLimiter::new(&settings.rate_limit);
        Self {
            settings: Arc::new(settings),
            services: Arc::new(services),
            login_limiter,
        }
    }

    /// Build every service on top of an existing pool
    pub async fn from_pool(settings: Settings, pool: DatabasePool) -> Result<Self> {
        let view_state = ViewStateStore::connect_or_memory(&settings.redis, settings.features.redis_cache).await;
        let services = ServiceFactory::new(&settings, pool, view_state)?;
        Ok(Self::new(settings, services))
    }
}
