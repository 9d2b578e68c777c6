//! Rate limiting middleware
//!
//! Throttles sign-in attempts per email address so password guessing is
//! slowed down before the auth provider is even contacted.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tracing::{debug, warn};

use crate::config::RateLimitConfig;
use crate::utils::errors::{EventBuddyError, Result};
use crate::utils::logging::mask_email;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

#[derive(Clone)]
pub struct LoginRateLimiter {
    limiter: Arc<KeyedLimiter>,
    clock: DefaultClock,
}

impl std::fmt::Debug for LoginRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRateLimiter").finish_non_exhaustive()
    }
}

impl LoginRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_minute = NonZeroU32::new(config.login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.login_burst).unwrap_or(per_minute);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            clock: DefaultClock::default(),
        }
    }

    /// Record an attempt for `email`, failing once its quota is spent
    pub fn check(&self, email: &str) -> Result<()> {
        let key = email.trim().to_lowercase();
        match self.limiter.check_key(&key) {
            Ok(()) => {
                debug!(email = %mask_email(&key), "Login attempt allowed");
                Ok(())
            }
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                // Round up so the message never says "0 seconds"
                let seconds = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                warn!(email = %mask_email(&key), retry_after_seconds = seconds, "Login attempts throttled");
                Err(EventBuddyError::RateLimitExceeded {
                    retry_after_seconds: Some(seconds.max(1)),
                })
            }
        }
    }

    /// Drop state for keys whose quota has fully replenished
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }
}
