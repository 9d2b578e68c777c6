//! RSVP service implementation
//!
//! Toggles a user's attendance intent. One write per (user, event) may be in
//! flight; its optimistic status is visible to reads until the write lands
//! and is reverted if the write fails.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::{EventsConfig, RsvpConfig};
use crate::database::DatabaseService;
use crate::filters::has_ended;
use crate::models::{next_status, RsvpCounts, RsvpRequest, RsvpStatus};
use crate::services::redis::RedisService;
use crate::state::{InFlightGuard, InFlightRegistry, OptimisticOverlay, ViewStateStore};
use crate::utils::errors::{EventBuddyError, Result};
use crate::utils::helpers::local_now;
use crate::utils::logging::log_rsvp_action;
use crate::views::Toast;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpOutcome {
    pub event_id: Uuid,
    pub status: Option<RsvpStatus>,
    pub previous: Option<RsvpStatus>,
    pub counts: RsvpCounts,
    pub toast: Toast,
}

pub fn toast_for(status: Option<RsvpStatus>) -> Toast {
    match status {
        Some(RsvpStatus::Going) => Toast::success("You're going!"),
        Some(RsvpStatus::Interested) => Toast::success("Marked as interested."),
        None => Toast::info("RSVP removed."),
    }
}

#[derive(Clone, Debug)]
pub struct RsvpService {
    database: Arc<DatabaseService>,
    cache: Option<RedisService>,
    overlay: OptimisticOverlay,
    in_flight: InFlightRegistry,
    view_state: ViewStateStore,
    events: EventsConfig,
    settle_delay: Duration,
}

impl RsvpService {
    pub fn new(
        database: Arc<DatabaseService>,
        cache: Option<RedisService>,
        overlay: OptimisticOverlay,
        in_flight: InFlightRegistry,
        view_state: ViewStateStore,
        events: EventsConfig,
        rsvp: &RsvpConfig,
    ) -> Self {
        Self {
            database,
            cache,
            overlay,
            in_flight,
            view_state,
            events,
            settle_delay: Duration::from_millis(rsvp.settle_delay_ms),
        }
    }

    /// Current status, pending writes first
    pub async fn status(&self, user_id: Uuid, event_id: Uuid) -> Result<Option<RsvpStatus>> {
        if let Some(pending) = self.overlay.get(user_id, event_id) {
            return Ok(pending);
        }
        Ok(self
            .database
            .rsvps
            .find(event_id, user_id)
            .await?
            .and_then(|rsvp| rsvp.status()))
    }

    /// Toggle the user's RSVP. The write runs to completion even if the
    /// caller stops waiting for it.
    pub async fn toggle(&self, user_id: Uuid, event_id: Uuid, request: RsvpRequest) -> Result<RsvpOutcome> {
        let guard = self
            .in_flight
            .try_acquire(user_id, event_id)
            .ok_or(EventBuddyError::RsvpInProgress { event_id })?;

        let service = self.clone();
        tokio::spawn(async move { service.submit(guard, user_id, event_id, request).await })
            .await
            .map_err(|e| EventBuddyError::ServiceUnavailable(format!("RSVP task failed: {}", e)))?
    }

    async fn submit(
        &self,
        guard: InFlightGuard,
        user_id: Uuid,
        event_id: Uuid,
        request: RsvpRequest,
    ) -> Result<RsvpOutcome> {
        let event = self
            .database
            .events
            .find_by_id(event_id)
            .await?
            .filter(|event| event.is_published)
            .ok_or(EventBuddyError::EventNotFound { event_id })?;

        let now = local_now(self.events.utc_offset_minutes);
        if has_ended(&event, now, ChronoDuration::minutes(self.events.ended_grace_minutes)) {
            return Err(EventBuddyError::InvalidInput("This event has already ended.".to_string()));
        }

        if let Some(page) = request.page.as_deref() {
            let scroll_y = request.scroll_y.unwrap_or(0.0);
            if let Err(e) = self.view_state.save_scroll(user_id, page, scroll_y).await {
                warn!(user_id = %user_id, error = %e, "Failed to save view state before RSVP");
            }
        }

        let stored = self
            .database
            .rsvps
            .find(event_id, user_id)
            .await?
            .and_then(|rsvp| rsvp.status());
        let current = self.overlay.get(user_id, event_id).unwrap_or(stored);
        let next = next_status(current, request.status);

        let previous_overlay = self.overlay.set(user_id, event_id, next);
        debug!(user_id = %user_id, event_id = %event_id, ?current, ?next, "Optimistic RSVP recorded");

        if let Err(e) = self.database.rsvps.upsert(event_id, user_id, next).await {
            self.overlay.restore(user_id, event_id, previous_overlay);
            error!(user_id = %user_id, event_id = %event_id, error = %e, "RSVP write failed, reverted");
            return Err(e);
        }

        self.overlay.clear(user_id, event_id);
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate_rsvp(event_id, user_id).await {
                warn!(event_id = %event_id, error = %e, "Failed to invalidate caches after RSVP");
            }
        }
        log_rsvp_action(event_id, user_id, current.map(|s| s.as_str()), next.map(|s| s.as_str()));

        let counts = RsvpCounts::new(event.going_count, event.interested_count).apply_transition(stored, next);
        self.release_after_settle(guard).await;

        Ok(RsvpOutcome {
            event_id,
            status: next,
            previous: current,
            counts,
            toast: toast_for(next),
        })
    }

    /// Hold the slot a little longer to absorb double clicks
    async fn release_after_settle(&self, guard: InFlightGuard) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        drop(guard);
    }
}
