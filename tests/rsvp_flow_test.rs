//! RSVP submission flow: toggling, in-flight rejection and rollback

#[macro_use]
mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;
use uuid::Uuid;

use event_buddy::filters::EventFilters;
use event_buddy::models::{RsvpCounts, RsvpRequest, RsvpStatus};
use event_buddy::state::{InFlightRegistry, OptimisticOverlay, ViewState};
use event_buddy::EventBuddyError;
use helpers::*;

fn click(status: RsvpStatus) -> RsvpRequest {
    RsvpRequest {
        status,
        page: None,
        scroll_y: None,
    }
}

#[tokio::test]
#[serial]
async fn test_toggle_going_then_clear() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let organiser = seed_user(ctx.database()).await;
    let user = seed_user(ctx.database()).await;
    let event = seed_event(ctx.database(), organiser).await;
    let rsvp = &ctx.services.rsvp_service;

    let outcome = rsvp.toggle(user, event.id, click(RsvpStatus::Going)).await.unwrap();
    assert_eq!(outcome.status, Some(RsvpStatus::Going));
    assert_eq!(outcome.previous, None);
    assert_eq!(outcome.counts, RsvpCounts::new(1, 0));
    assert_eq!(outcome.toast.message, "You're going!");
    assert_eq!(rsvp.status(user, event.id).await.unwrap(), Some(RsvpStatus::Going));

    // Switching moves the count across
    let outcome = rsvp.toggle(user, event.id, click(RsvpStatus::Interested)).await.unwrap();
    assert_eq!(outcome.status, Some(RsvpStatus::Interested));
    assert_eq!(outcome.counts, RsvpCounts::new(0, 1));

    // Clicking the active status clears it
    let outcome = rsvp.toggle(user, event.id, click(RsvpStatus::Interested)).await.unwrap();
    assert_eq!(outcome.status, None);
    assert_eq!(outcome.previous, Some(RsvpStatus::Interested));
    assert_eq!(outcome.counts, RsvpCounts::default());
    assert_eq!(outcome.toast.message, "RSVP removed.");
    assert_eq!(rsvp.status(user, event.id).await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn test_second_click_while_in_flight_is_rejected() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let organiser = seed_user(ctx.database()).await;
    let user = seed_user(ctx.database()).await;
    let event = seed_event(ctx.database(), organiser).await;

    let in_flight = InFlightRegistry::new();
    let service = ctx.rsvp_service(OptimisticOverlay::new(), in_flight.clone(), 300);

    let first = service.toggle(user, event.id, click(RsvpStatus::Going));
    let second = async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        service.toggle(user, event.id, click(RsvpStatus::Going)).await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap().status, Some(RsvpStatus::Going));
    assert_matches!(second, Err(EventBuddyError::RsvpInProgress { event_id }) if event_id == event.id);

    // The slot is free once the settle delay has passed
    assert!(in_flight.is_empty());
    let cleared = service.toggle(user, event.id, click(RsvpStatus::Going)).await.unwrap();
    assert_eq!(cleared.status, None);
}

#[tokio::test]
#[serial]
async fn test_other_events_are_not_blocked() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let organiser = seed_user(ctx.database()).await;
    let user = seed_user(ctx.database()).await;
    let first = seed_event(ctx.database(), organiser).await;
    let second = seed_event(ctx.database(), organiser).await;

    let in_flight = InFlightRegistry::new();
    let service = ctx.rsvp_service(OptimisticOverlay::new(), in_flight.clone(), 0);
    let _held = in_flight.try_acquire(user, first.id).unwrap();

    assert_matches!(
        service.toggle(user, first.id, click(RsvpStatus::Going)).await,
        Err(EventBuddyError::RsvpInProgress { .. })
    );
    let outcome = service.toggle(user, second.id, click(RsvpStatus::Interested)).await.unwrap();
    assert_eq!(outcome.status, Some(RsvpStatus::Interested));
}

#[tokio::test]
#[serial]
async fn test_failed_write_reverts_optimistic_status() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let organiser = seed_user(ctx.database()).await;
    let event = seed_event(ctx.database(), organiser).await;

    // No profile row, so the write trips the foreign key
    let ghost = Uuid::new_v4();
    let overlay = OptimisticOverlay::new();
    let in_flight = InFlightRegistry::new();
    let service = ctx.rsvp_service(overlay.clone(), in_flight.clone(), 0);

    let result = service.toggle(ghost, event.id, click(RsvpStatus::Going)).await;
    assert_matches!(result, Err(EventBuddyError::Database(_)));

    assert_eq!(overlay.get(ghost, event.id), None);
    assert_eq!(service.status(ghost, event.id).await.unwrap(), None);
    assert!(in_flight.is_empty());
    assert_eq!(ctx.db.count_records("rsvps").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_unknown_draft_and_ended_events_are_refused() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let organiser = seed_user(ctx.database()).await;
    let user = seed_user(ctx.database()).await;
    let rsvp = &ctx.services.rsvp_service;

    let missing = Uuid::new_v4();
    assert_matches!(
        rsvp.toggle(user, missing, click(RsvpStatus::Going)).await,
        Err(EventBuddyError::EventNotFound { event_id }) if event_id == missing
    );

    let mut draft = event_request(days_from_today(5), "music");
    draft.is_published = Some(false);
    let draft = seed_event_with(ctx.database(), organiser, draft).await;
    assert_matches!(
        rsvp.toggle(user, draft.id, click(RsvpStatus::Going)).await,
        Err(EventBuddyError::EventNotFound { .. })
    );

    let past = seed_event_with(ctx.database(), organiser, event_request(days_from_today(-3), "music")).await;
    assert_matches!(
        rsvp.toggle(user, past.id, click(RsvpStatus::Going)).await,
        Err(EventBuddyError::InvalidInput(message)) if message == "This event has already ended."
    );
}

#[tokio::test]
#[serial]
async fn test_rsvp_saves_view_state_for_the_page() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let organiser = seed_user(ctx.database()).await;
    let user = seed_user(ctx.database()).await;
    let event = seed_event(ctx.database(), organiser).await;
    ctx.services
        .view_state
        .save(user, &ViewState::new("events", 100.0, Some("category=music".to_string())))
        .await
        .unwrap();

    let request = RsvpRequest {
        status: RsvpStatus::Going,
        page: Some("events".to_string()),
        scroll_y: Some(840.0),
    };
    ctx.services.rsvp_service.toggle(user, event.id, request).await.unwrap();

    let saved = ctx.services.view_state.load(user, "events").await.unwrap().unwrap();
    assert_eq!(saved.scroll_y, 840.0);
    assert_eq!(saved.filters_query.as_deref(), Some("category=music"));
}

#[tokio::test]
#[serial]
async fn test_listing_and_my_rsvps_reflect_the_write() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let organiser = seed_user(ctx.database()).await;
    let user = seed_user(ctx.database()).await;
    let going = seed_event(ctx.database(), organiser).await;
    let maybe = seed_event_with(ctx.database(), organiser, event_request(days_from_today(9), "comedy")).await;

    let rsvp = &ctx.services.rsvp_service;
    rsvp.toggle(user, going.id, click(RsvpStatus::Going)).await.unwrap();
    rsvp.toggle(user, maybe.id, click(RsvpStatus::Interested)).await.unwrap();

    let page = ctx
        .services
        .event_service
        .list(&EventFilters::new(), Some(user), 1)
        .await
        .unwrap();
    let card = page.cards.iter().find(|c| c.id == going.id).unwrap();
    assert_eq!(card.viewer_status, Some(RsvpStatus::Going));
    assert_eq!(card.going_count, 1);

    let mine = ctx.services.event_service.my_rsvps(user).await.unwrap();
    assert_eq!(mine.going.len(), 1);
    assert_eq!(mine.interested.len(), 1);
    assert_eq!(mine.interested[0].id, maybe.id);

    let detail = ctx.services.event_service.detail(going.id, Some(user)).await.unwrap();
    assert_eq!(detail.card.viewer_status, Some(RsvpStatus::Going));
    assert!(!detail.rsvp_pending);

    // Anonymous viewers get counts but no status
    let anonymous = ctx.services.event_service.detail(going.id, None).await.unwrap();
    assert_eq!(anonymous.card.viewer_status, None);
    assert_eq!(anonymous.card.going_count, 1);
}

#[tokio::test]
#[serial]
async fn test_reads_see_pending_status_before_write_lands() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let organiser = seed_user(ctx.database()).await;
    let user = seed_user(ctx.database()).await;
    let event = seed_event(ctx.database(), organiser).await;

    let overlay = OptimisticOverlay::new();
    let in_flight = InFlightRegistry::new();
    let events = ctx.event_service(overlay.clone(), in_flight.clone());
    let _guard = in_flight.try_acquire(user, event.id).unwrap();
    overlay.set(user, event.id, Some(RsvpStatus::Going));
    assert_eq!(ctx.db.count_records("rsvps").await.unwrap(), 0);

    let page = events.list(&EventFilters::new(), Some(user), 1).await.unwrap();
    let card = page.cards.iter().find(|c| c.id == event.id).unwrap();
    assert_eq!(card.viewer_status, Some(RsvpStatus::Going));
    assert_eq!(card.going_count, 1);

    let detail = events.detail(event.id, Some(user)).await.unwrap();
    assert_eq!(detail.card.viewer_status, Some(RsvpStatus::Going));
    assert_eq!(detail.card.going_count, 1);
    assert!(detail.rsvp_pending);

    let mine = events.my_rsvps(user).await.unwrap();
    assert_eq!(mine.going.len(), 1);
    assert_eq!(mine.going[0].id, event.id);

    // Other viewers only see stored counts
    let stranger = events.detail(event.id, Some(Uuid::new_v4())).await.unwrap();
    assert_eq!(stranger.card.viewer_status, None);
    assert_eq!(stranger.card.going_count, 0);

    overlay.clear(user, event.id);
    let detail = events.detail(event.id, Some(user)).await.unwrap();
    assert_eq!(detail.card.viewer_status, None);
    assert_eq!(detail.card.going_count, 0);
}
