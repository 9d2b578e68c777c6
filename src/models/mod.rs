//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod friend;
pub mod plan;
pub mod rsvp;
pub mod user;
pub mod venue;

// Re-export commonly used models
pub use event::{CreateEventRequest, Event, EventCategory, EventListing, UpdateEventRequest};
pub use friend::{FriendRequestBody, FriendStatus, Friendship, RespondFriendRequest};
pub use plan::{CasualPlan, CreatePlanRequest};
pub use rsvp::{next_status, Rsvp, RsvpCounts, RsvpRequest, RsvpStatus};
pub use user::{UpdateProfileRequest, UserProfile};
pub use venue::{CreateVenueRequest, Venue};
