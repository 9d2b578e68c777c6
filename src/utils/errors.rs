//! Error handling for EventBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for EventBuddy application
#[derive(Error, Debug)]
pub enum EventBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Auth provider error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("Venue not found: {venue_id}")]
    VenueNotFound { venue_id: Uuid },

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Plan not found: {plan_id}")]
    PlanNotFound { plan_id: Uuid },

    #[error("Friend request not found: {request_id}")]
    FriendRequestNotFound { request_id: Uuid },

    #[error("RSVP already in progress for event {event_id}")]
    RsvpInProgress { event_id: Uuid },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded { retry_after_seconds: Option<u64> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Errors reported by the hosted authentication provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Email not confirmed")]
    EmailNotConfirmed,

    #[error("User already registered")]
    UserAlreadyExists,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Rate limited")]
    RateLimited { retry_after_seconds: Option<u64> },

    #[error("Provider rejected request: {0}")]
    Provider(String),
}

impl AuthError {
    /// Inline message shown next to the login/signup form
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Incorrect email or password.".to_string(),
            AuthError::EmailNotConfirmed => {
                "Please confirm your email address before signing in.".to_string()
            }
            AuthError::UserAlreadyExists => {
                "An account with this email already exists.".to_string()
            }
            AuthError::WeakPassword(reason) => format!("Password is too weak: {}", reason),
            AuthError::RateLimited { retry_after_seconds } => {
                rate_limit_message(*retry_after_seconds)
            }
            AuthError::Provider(message) => message.clone(),
        }
    }
}

/// Result type alias for EventBuddy operations
pub type Result<T> = std::result::Result<T, EventBuddyError>;

/// Message shown whenever a caller is throttled
pub fn rate_limit_message(retry_after_seconds: Option<u64>) -> String {
    match retry_after_seconds {
        Some(seconds) => format!(
            "Too many attempts. Please wait {} seconds and try again.",
            seconds
        ),
        None => "Too many attempts. Please wait a moment and try again.".to_string(),
    }
}

impl EventBuddyError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventBuddyError::Database(_) => ErrorSeverity::Critical,
            EventBuddyError::Migration(_) => ErrorSeverity::Critical,
            EventBuddyError::Config(_) => ErrorSeverity::Critical,
            EventBuddyError::PermissionDenied(_) => ErrorSeverity::Warning,
            EventBuddyError::Unauthorized => ErrorSeverity::Warning,
            EventBuddyError::Auth(_) => ErrorSeverity::Warning,
            EventBuddyError::Token(_) => ErrorSeverity::Warning,
            EventBuddyError::RateLimitExceeded { .. } => ErrorSeverity::Warning,
            EventBuddyError::RsvpInProgress { .. } => ErrorSeverity::Info,
            EventBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            EventBuddyError::Conflict(_) => ErrorSeverity::Info,
            EventBuddyError::EventNotFound { .. }
            | EventBuddyError::VenueNotFound { .. }
            | EventBuddyError::ProfileNotFound(_)
            | EventBuddyError::PlanNotFound { .. }
            | EventBuddyError::FriendRequestNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status code used when the error reaches a handler
    pub fn status_code(&self) -> u16 {
        match self {
            EventBuddyError::Unauthorized | EventBuddyError::Token(_) => 401,
            EventBuddyError::Auth(AuthError::RateLimited { .. }) => 429,
            EventBuddyError::Auth(AuthError::UserAlreadyExists) => 409,
            EventBuddyError::Auth(_) => 400,
            EventBuddyError::PermissionDenied(_) => 403,
            EventBuddyError::EventNotFound { .. }
            | EventBuddyError::VenueNotFound { .. }
            | EventBuddyError::ProfileNotFound(_)
            | EventBuddyError::PlanNotFound { .. }
            | EventBuddyError::FriendRequestNotFound { .. } => 404,
            EventBuddyError::RsvpInProgress { .. } | EventBuddyError::Conflict(_) => 409,
            EventBuddyError::RateLimitExceeded { .. } => 429,
            EventBuddyError::InvalidInput(_) | EventBuddyError::UrlParse(_) => 400,
            EventBuddyError::ServiceUnavailable(_) => 503,
            _ => 500,
        }
    }

    /// Message suitable for a toast notification
    pub fn toast_message(&self) -> String {
        match self {
            EventBuddyError::Auth(e) => e.user_message(),
            EventBuddyError::Unauthorized | EventBuddyError::Token(_) => {
                "Please sign in to continue.".to_string()
            }
            EventBuddyError::PermissionDenied(reason) => reason.clone(),
            EventBuddyError::EventNotFound { .. } => "That event could not be found.".to_string(),
            EventBuddyError::VenueNotFound { .. } => "That venue could not be found.".to_string(),
            EventBuddyError::ProfileNotFound(_) => "That profile could not be found.".to_string(),
            EventBuddyError::PlanNotFound { .. } => "That plan could not be found.".to_string(),
            EventBuddyError::FriendRequestNotFound { .. } => {
                "That friend request could not be found.".to_string()
            }
            EventBuddyError::RsvpInProgress { .. } => {
                "Hang on, your last RSVP is still being saved.".to_string()
            }
            EventBuddyError::Conflict(reason) => reason.clone(),
            EventBuddyError::RateLimitExceeded { retry_after_seconds } => {
                rate_limit_message(*retry_after_seconds)
            }
            EventBuddyError::InvalidInput(reason) => reason.clone(),
            EventBuddyError::ServiceUnavailable(_) => {
                "The service is temporarily unavailable. Please try again.".to_string()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
