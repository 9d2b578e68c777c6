//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod event;
pub mod friend;
pub mod plan;
pub mod rsvp;
pub mod user;
pub mod venue;

// Re-export repositories
pub use event::EventRepository;
pub use friend::FriendRepository;
pub use plan::PlanRepository;
pub use rsvp::RsvpRepository;
pub use user::ProfileRepository;
pub use venue::VenueRepository;
