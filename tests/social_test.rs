//! Friends, casual plans, profiles and organiser tooling

#[macro_use]
mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;
use uuid::Uuid;

use event_buddy::models::{FriendStatus, UpdateEventRequest, UpdateProfileRequest};
use event_buddy::EventBuddyError;
use helpers::*;

#[tokio::test]
#[serial]
async fn test_friend_request_lifecycle() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let friends = &ctx.services.friend_service;
    let alice = seed_user(ctx.database()).await;
    let bob = seed_user(ctx.database()).await;

    let request = friends.send_request(alice, bob).await.unwrap();
    assert_eq!(request.status(), Some(FriendStatus::Pending));

    assert_matches!(friends.send_request(alice, bob).await, Err(EventBuddyError::Conflict(_)));
    assert_matches!(friends.send_request(bob, alice).await, Err(EventBuddyError::Conflict(_)));

    let incoming = friends.list_incoming(bob).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].request.id, request.id);
    assert_eq!(incoming[0].requester.as_ref().map(|p| p.id), Some(alice));

    // Only the addressee can answer
    assert_matches!(
        friends.respond(alice, request.id, true).await,
        Err(EventBuddyError::PermissionDenied(_))
    );
    let accepted = friends.respond(bob, request.id, true).await.unwrap();
    assert_eq!(accepted.status(), Some(FriendStatus::Accepted));
    assert_matches!(friends.respond(bob, request.id, false).await, Err(EventBuddyError::Conflict(_)));

    let alice_friends = friends.list_friends(alice).await.unwrap();
    assert_eq!(alice_friends.iter().map(|p| p.id).collect::<Vec<_>>(), vec![bob]);

    friends.remove(bob, request.id).await.unwrap();
    assert!(friends.list_friends(alice).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_friend_request_validation() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let friends = &ctx.services.friend_service;
    let alice = seed_user(ctx.database()).await;
    let carol = seed_user(ctx.database()).await;

    assert_matches!(friends.send_request(alice, alice).await, Err(EventBuddyError::InvalidInput(_)));
    assert_matches!(
        friends.send_request(alice, Uuid::new_v4()).await,
        Err(EventBuddyError::ProfileNotFound(_))
    );

    // A declined request can be sent again
    let request = friends.send_request(alice, carol).await.unwrap();
    friends.respond(carol, request.id, false).await.unwrap();
    assert!(friends.send_request(alice, carol).await.is_ok());

    let outsider = seed_user(ctx.database()).await;
    assert_matches!(
        friends.remove(outsider, request.id).await,
        Err(EventBuddyError::PermissionDenied(_))
    );
}

#[tokio::test]
#[serial]
async fn test_plans_only_deletable_by_creator() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let plans = &ctx.services.plan_service;
    let creator = seed_user(ctx.database()).await;
    let other = seed_user(ctx.database()).await;

    let plan = plans.create(creator, plan_request(5)).await.unwrap();
    assert_matches!(plans.create(creator, plan_request(-1)).await, Err(EventBuddyError::InvalidInput(_)));

    assert_eq!(plans.list_upcoming().await.unwrap().len(), 1);
    assert_eq!(plans.list_by_creator(other).await.unwrap().len(), 0);

    assert_matches!(plans.delete(other, plan.id).await, Err(EventBuddyError::PermissionDenied(_)));
    plans.delete(creator, plan.id).await.unwrap();
    assert_matches!(
        plans.delete(creator, plan.id).await,
        Err(EventBuddyError::PlanNotFound { plan_id }) if plan_id == plan.id
    );
}

#[tokio::test]
#[serial]
async fn test_profile_update_and_public_page() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let profiles = &ctx.services.profile_service;
    let user = seed_user(ctx.database()).await;
    let rival = seed_user(ctx.database()).await;
    let organiser = seed_user(ctx.database()).await;

    let updated = profiles
        .update(
            user,
            UpdateProfileRequest {
                username: Some("@Lindy_Hopper".to_string()),
                display_name: Some("  Lindy   Hopper ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username.as_deref(), Some("lindy_hopper"));
    assert_eq!(updated.display_name.as_deref(), Some("Lindy Hopper"));

    let taken = profiles
        .update(
            rival,
            UpdateProfileRequest {
                username: Some("lindy_hopper".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(taken, Err(EventBuddyError::Conflict(message)) if message == "Username is already taken");

    let bad_avatar = profiles
        .update(
            rival,
            UpdateProfileRequest {
                avatar_url: Some("ftp://example.com/me.png".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(bad_avatar, Err(EventBuddyError::InvalidInput(_)));

    let event = seed_event(ctx.database(), organiser).await;
    ctx.services
        .rsvp_service
        .toggle(
            user,
            event.id,
            event_buddy::models::RsvpRequest {
                status: event_buddy::models::RsvpStatus::Going,
                page: None,
                scroll_y: None,
            },
        )
        .await
        .unwrap();

    let page = profiles.page("@lindy_hopper").await.unwrap();
    assert_eq!(page.profile.handle, "@lindy_hopper");
    assert_eq!(page.going.len(), 1);
    assert_eq!(page.going[0].id, event.id);

    assert_matches!(profiles.page("nobody_here").await, Err(EventBuddyError::ProfileNotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_only_the_organiser_can_edit_an_event() {
    let db = require_db!();
    let ctx = TestContext::new(db).await.unwrap();
    let events = &ctx.services.event_service;
    let organiser = seed_user(ctx.database()).await;
    let intruder = seed_user(ctx.database()).await;

    let listing = events
        .create(organiser, event_request(days_from_today(4), "Food & Drink"))
        .await
        .unwrap();
    assert_eq!(listing.event.category, "food_and_drink");

    let change = UpdateEventRequest {
        title: Some("Street Food Friday".to_string()),
        ..Default::default()
    };
    assert_matches!(
        events.update(intruder, listing.id(), change.clone()).await,
        Err(EventBuddyError::PermissionDenied(_))
    );
    let updated = events.update(organiser, listing.id(), change).await.unwrap();
    assert_eq!(updated.event.title, "Street Food Friday");

    assert_eq!(events.list_mine(organiser).await.unwrap().len(), 1);
    assert_matches!(
        events.delete(intruder, listing.id()).await,
        Err(EventBuddyError::PermissionDenied(_))
    );
    events.delete(organiser, listing.id()).await.unwrap();
    assert_matches!(
        events.detail(listing.id(), None).await,
        Err(EventBuddyError::EventNotFound { .. })
    );
}
