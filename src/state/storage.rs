//! View state storage
//!
//! Keeps each user's last scroll position and filter query per page so a
//! list can be restored after it is re-fetched. Entries live in Redis with a
//! TTL; without Redis an in-process map is used instead.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::RedisConfig;
use crate::utils::errors::{EventBuddyError, Result};

/// Longest page name accepted as a storage key
const MAX_PAGE_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub page: String,
    pub scroll_y: f64,
    /// Filter query string active when the state was saved
    pub filters_query: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ViewState {
    pub fn new(page: &str, scroll_y: f64, filters_query: Option<String>) -> Self {
        Self {
            page: page.to_string(),
            scroll_y: scroll_y.max(0.0),
            filters_query,
            updated_at: Utc::now(),
        }
    }
}

/// Body of `PUT /view-state/:page`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveViewStateRequest {
    pub scroll_y: f64,
    pub filters_query: Option<String>,
}

#[derive(Clone)]
enum Backend {
    Redis(redis::aio::ConnectionManager),
    Memory(Arc<RwLock<HashMap<String, (ViewState, DateTime<Utc>)>>>),
}

#[derive(Clone)]
pub struct ViewStateStore {
    backend: Backend,
    prefix: String,
    ttl_seconds: u64,
}

impl std::fmt::Debug for ViewStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.backend {
            Backend::Redis(_) => "redis",
            Backend::Memory(_) => "memory",
        };
        f.debug_struct("ViewStateStore")
            .field("backend", &backend)
            .field("prefix", &self.prefix)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl ViewStateStore {
    /// Connect to Redis
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            backend: Backend::Redis(connection_manager),
            prefix: config.prefix.clone(),
            ttl_seconds: config.ttl_seconds,
        })
    }

    /// In-process store
    pub fn in_memory(ttl_seconds: u64) -> Self {
        Self {
            backend: Backend::Memory(Arc::new(RwLock::new(HashMap::new()))),
            prefix: String::new(),
            ttl_seconds,
        }
    }

    /// Redis when reachable, otherwise in-process
    pub async fn connect_or_memory(config: &RedisConfig, use_redis: bool) -> Self {
        if use_redis {
            match Self::connect(config).await {
                Ok(store) => return store,
                Err(e) => warn!(error = %e, "Redis unavailable, keeping view state in memory"),
            }
        }
        Self::in_memory(config.ttl_seconds)
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, Backend::Redis(_))
    }

    fn key(&self, user_id: Uuid, page: &str) -> String {
        format!("{}view_state:{}:{}", self.prefix, user_id, page)
    }

    fn validate_page(page: &str) -> Result<()> {
        let valid = !page.is_empty()
            && page.len() <= MAX_PAGE_NAME_LEN
            && page
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else {
            Err(EventBuddyError::InvalidInput(format!("Invalid page name: {}", page)))
        }
    }

    pub async fn save(&self, user_id: Uuid, state: &ViewState) -> Result<()> {
        Self::validate_page(&state.page)?;
        let key = self.key(user_id, &state.page);
        debug!(user_id = %user_id, key = %key, scroll_y = state.scroll_y, "Saving view state");

        match &self.backend {
            Backend::Redis(manager) => {
                let serialized = serde_json::to_string(state)?;
                let mut conn = manager.clone();
                if let Err(e) = conn.set_ex::<_, _, ()>(&key, serialized, self.ttl_seconds).await {
                    error!(user_id = %user_id, error = %e, "Failed to save view state to Redis");
                    return Err(e.into());
                }
            }
            Backend::Memory(map) => {
                let now = Utc::now();
                let expires_at = now + chrono::Duration::seconds(self.ttl_seconds as i64);
                let mut entries = map.write().await;
                entries.retain(|_, (_, entry_expires_at)| *entry_expires_at > now);
                entries.insert(key, (state.clone(), expires_at));
            }
        }

        Ok(())
    }

    /// Update the scroll position, keeping the filter query already stored for the page
    pub async fn save_scroll(&self, user_id: Uuid, page: &str, scroll_y: f64) -> Result<ViewState> {
        let filters_query = self
            .load(user_id, page)
            .await?
            .and_then(|existing| existing.filters_query);
        let state = ViewState::new(page, scroll_y, filters_query);
        self.save(user_id, &state).await?;
        Ok(state)
    }

    pub async fn load(&self, user_id: Uuid, page: &str) -> Result<Option<ViewState>> {
        Self::validate_page(page)?;
        let key = self.key(user_id, page);

        match &self.backend {
            Backend::Redis(manager) => {
                let mut conn = manager.clone();
                let serialized: Option<String> = conn.get(&key).await?;
                match serialized {
                    Some(data) => Ok(Some(serde_json::from_str(&data)?)),
                    None => {
                        debug!(user_id = %user_id, page = page, "No view state stored");
                        Ok(None)
                    }
                }
            }
            Backend::Memory(map) => {
                let now = Utc::now();
                let found = map.read().await.get(&key).cloned();
                match found {
                    Some((state, expires_at)) if expires_at > now => Ok(Some(state)),
                    Some(_) => {
                        map.write().await.remove(&key);
                        Ok(None)
                    }
                    None => Ok(None),
                }
            }
        }
    }

    pub async fn clear(&self, user_id: Uuid, page: &str) -> Result<()> {
        Self::validate_page(page)?;
        let key = self.key(user_id, page);

        match &self.backend {
            Backend::Redis(manager) => {
                let mut conn = manager.clone();
                let _: u32 = conn.del(&key).await?;
            }
            Backend::Memory(map) => {
                map.write().await.remove(&key);
            }
        }

        debug!(user_id = %user_id, page = page, "View state cleared");
        Ok(())
    }
}
