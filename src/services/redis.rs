//! Redis cache service
//!
//! Caches published listings and per-user RSVP lists.
//! Every RSVP or organiser mutation invalidates the affected keys.

use redis::{AsyncCommands, Client, RedisResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RedisConfig;
use crate::utils::errors::Result;
use crate::utils::logging::log_cache_operation;

/// Key of the cached published listings
pub const LISTINGS_KEY: &str = "events:listings";

pub fn user_rsvps_key(user_id: Uuid) -> String {
    format!("rsvps:user:{}", user_id)
}

#[derive(Clone, Debug)]
pub struct RedisService {
    client: Client,
    prefix: String,
    default_ttl: u64,
}

/// Cache entry with TTL information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub ttl_seconds: u64,
}

impl RedisService {
    /// Create a new RedisService; no connection is made until first use
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;

        Ok(Self {
            client,
            prefix: config.prefix.clone(),
            default_ttl: config.ttl_seconds,
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_tokio_connection().await?)
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Set a value in Redis with TTL
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let mut conn = self.get_connection().await?;
        let full_key = self.full_key(key);
        let entry = CacheEntry {
            data: value,
            created_at: chrono::Utc::now(),
            ttl_seconds: ttl_seconds.unwrap_or(self.default_ttl),
        };
        let serialized = serde_json::to_string(&entry)?;

        let _: () = conn.set_ex(&full_key, serialized, entry.ttl_seconds).await?;

        debug!(key = %full_key, ttl = entry.ttl_seconds, "Value set in Redis");
        Ok(())
    }

    /// Get a value from Redis
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut conn = self.get_connection().await?;
        let full_key = self.full_key(key);

        let result: Option<String> = conn.get(&full_key).await?;
        log_cache_operation("get", &full_key, result.is_some());

        match result {
            Some(data) => {
                let entry = serde_json::from_str::<CacheEntry<T>>(&data)?;
                Ok(Some(entry.data))
            }
            None => Ok(None),
        }
    }

    /// Delete keys, returning how many existed
    pub async fn delete_many(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_connection().await?;
        let full_keys: Vec<String> = keys.iter().map(|k| self.full_key(k)).collect();
        let deleted: u64 = conn.del(&full_keys).await?;

        debug!(keys = ?full_keys, deleted = deleted, "Cache keys invalidated");
        Ok(deleted)
    }

    /// Drop the listings cache after an organiser edit
    pub async fn invalidate_event(&self, event_id: Uuid) -> Result<u64> {
        let deleted = self.delete_many(&[LISTINGS_KEY.to_string()]).await?;
        debug!(event_id = %event_id, deleted = deleted, "Event caches invalidated");
        Ok(deleted)
    }

    /// Drop everything an RSVP change makes stale
    pub async fn invalidate_rsvp(&self, event_id: Uuid, user_id: Uuid) -> Result<u64> {
        let deleted = self
            .delete_many(&[
                LISTINGS_KEY.to_string(),
                user_rsvps_key(user_id),
            ])
            .await?;
        info!(event_id = %event_id, user_id = %user_id, deleted = deleted, "RSVP caches invalidated");
        Ok(deleted)
    }

    /// Health check for Redis connection
    pub async fn health_check(&self) -> Result<bool> {
        match self.get_connection().await {
            Ok(mut conn) => {
                let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
                match result {
                    Ok(response) => {
                        debug!(response = %response, "Redis health check successful");
                        Ok(response == "PONG")
                    }
                    Err(e) => {
                        warn!(error = %e, "Redis health check failed");
                        Ok(false)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Redis connection failed");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        let id = Uuid::nil();
        assert_eq!(LISTINGS_KEY, "events:listings");
        assert_eq!(user_rsvps_key(id), format!("rsvps:user:{}", id));
    }

    #[test]
    fn test_service_creation_does_not_connect() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            prefix: "test:".to_string(),
            ttl_seconds: 60,
        };
        let service = RedisService::new(&config).unwrap();
        assert_eq!(service.full_key("events:listings"), "test:events:listings");
    }

    #[test]
    fn test_cache_entry_serialization() {
        let entry = CacheEntry {
            data: vec!["a".to_string(), "b".to_string()],
            created_at: chrono::Utc::now(),
            ttl_seconds: 300,
        };

        let serialized = serde_json::to_string(&entry).unwrap();
        let deserialized: CacheEntry<Vec<String>> = serde_json::from_str(&serialized).unwrap();

        assert_eq!(entry.data, deserialized.data);
        assert_eq!(entry.ttl_seconds, deserialized.ttl_seconds);
    }

    #[tokio::test]
    async fn test_unreachable_redis_reports_unhealthy() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            prefix: "test:".to_string(),
            ttl_seconds: 60,
        };
        let service = RedisService::new(&config).unwrap();
        assert!(!service.health_check().await.unwrap());
    }
}
