//! State management module
//!
//! Per-process request state: in-flight RSVP tracking, the optimistic
//! overlay, view state storage and the shared application context.

pub mod context;
pub mod inflight;
pub mod optimistic;
pub mod storage;

// Re-export commonly used state components
pub use context::AppState;
pub use inflight::{InFlightGuard, InFlightRegistry};
pub use optimistic::OptimisticOverlay;
pub use storage::{SaveViewStateRequest, ViewState, ViewStateStore};
