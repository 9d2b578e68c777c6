//! Repository integration tests against a real PostgreSQL database

#[macro_use]
mod helpers;

use chrono::NaiveTime;
use serial_test::serial;

use event_buddy::database::DatabaseService;
use event_buddy::models::{FriendStatus, RsvpCounts, RsvpStatus, UpdateEventRequest, UpdateProfileRequest};
use helpers::*;

#[tokio::test]
#[serial]
async fn test_event_create_update_and_counts() {
    let db = require_db!();
    let database = DatabaseService::new(db.pool.clone());

    let organiser = seed_user(&database).await;
    let venue = seed_venue(&database, organiser).await;
    let mut request = event_request(days_from_today(3), "music");
    request.venue_id = Some(venue.id);
    let event = seed_event_with(&database, organiser, request).await;

    assert_eq!(event.organiser_id, Some(organiser));
    assert_eq!(event.going_count, 0);
    assert!(event.is_published);

    let updated = database
        .events
        .update(
            event.id,
            UpdateEventRequest {
                title: Some("Late Night Jazz".to_string()),
                start_time: NaiveTime::from_hms_opt(21, 0, 0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Late Night Jazz");
    assert_eq!(updated.start_time, NaiveTime::from_hms_opt(21, 0, 0));
    // Untouched columns survive the partial update
    assert_eq!(updated.category, "music");
    assert_eq!(updated.venue_id, Some(venue.id));

    let alice = seed_user(&database).await;
    let bob = seed_user(&database).await;
    database.rsvps.upsert(event.id, alice, Some(RsvpStatus::Going)).await.unwrap();
    database.rsvps.upsert(event.id, bob, Some(RsvpStatus::Interested)).await.unwrap();

    assert_eq!(database.rsvps.counts(event.id).await.unwrap(), RsvpCounts::new(1, 1));
    let reloaded = database.events.find_by_id(event.id).await.unwrap().unwrap();
    assert_eq!((reloaded.going_count, reloaded.interested_count), (1, 1));
}

#[tokio::test]
#[serial]
async fn test_rsvp_upsert_clears_without_deleting() {
    let db = require_db!();
    let database = DatabaseService::new(db.pool.clone());

    let user = seed_user(&database).await;
    let event = seed_event(&database, user).await;

    database.rsvps.upsert(event.id, user, Some(RsvpStatus::Going)).await.unwrap();
    let cleared = database.rsvps.upsert(event.id, user, None).await.unwrap();
    assert_eq!(cleared.status(), None);

    // The row stays, it just carries no status
    assert_eq!(db.count_records("rsvps").await.unwrap(), 1);
    assert!(database.rsvps.list_for_user(user).await.unwrap().is_empty());
    assert_eq!(database.rsvps.counts(event.id).await.unwrap(), RsvpCounts::default());
}

#[tokio::test]
#[serial]
async fn test_published_listings_skip_drafts_and_past_days() {
    let db = require_db!();
    let database = DatabaseService::new(db.pool.clone());
    let organiser = seed_user(&database).await;
    let venue = seed_venue(&database, organiser).await;

    let mut upcoming = event_request(days_from_today(2), "music");
    upcoming.venue_id = Some(venue.id);
    let upcoming = seed_event_with(&database, organiser, upcoming).await;

    let mut draft = event_request(days_from_today(2), "music");
    draft.is_published = Some(false);
    seed_event_with(&database, organiser, draft).await;

    seed_event_with(&database, organiser, event_request(days_from_today(-10), "music")).await;

    let listings = database.published_listings(today()).await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id(), upcoming.id);
    assert_eq!(listings[0].venue.as_ref().map(|v| v.id), Some(venue.id));

    // The organiser still sees every event they own
    assert_eq!(database.events.list_by_organiser(organiser).await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn test_profile_username_lookup_is_case_insensitive() {
    let db = require_db!();
    let database = DatabaseService::new(db.pool.clone());
    let user = seed_user(&database).await;

    database
        .profiles
        .update(
            user,
            UpdateProfileRequest {
                username: Some("swing_fan".to_string()),
                display_name: Some("Swing Fan".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let found = database.profiles.find_by_username("SWING_FAN").await.unwrap().unwrap();
    assert_eq!(found.id, user);
    assert!(!database.profiles.username_taken("swing_fan", user).await.unwrap());

    let other = seed_user(&database).await;
    assert!(database.profiles.username_taken("swing_fan", other).await.unwrap());

    // Ensuring an existing profile leaves it untouched
    let again = database.profiles.ensure(user).await.unwrap();
    assert_eq!(again.display_name.as_deref(), Some("Swing Fan"));
}

#[tokio::test]
#[serial]
async fn test_friends_going_only_lists_accepted_friends() {
    let db = require_db!();
    let database = DatabaseService::new(db.pool.clone());

    let viewer = seed_user(&database).await;
    let friend = seed_user(&database).await;
    let stranger = seed_user(&database).await;
    let pending = seed_user(&database).await;
    let event = seed_event(&database, viewer).await;

    let friendship = database.friends.create(friend, viewer).await.unwrap();
    database.friends.update_status(friendship.id, FriendStatus::Accepted).await.unwrap();
    database.friends.create(viewer, pending).await.unwrap();

    for user in [friend, stranger, pending] {
        database.rsvps.upsert(event.id, user, Some(RsvpStatus::Going)).await.unwrap();
    }

    let going = database.friends.friends_going(event.id, viewer).await.unwrap();
    let ids: Vec<_> = going.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![friend]);

    let between = database.friends.find_between(viewer, friend).await.unwrap().unwrap();
    assert_eq!(between.id, friendship.id);
    assert_eq!(database.friends.list_incoming(pending).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_plans_listed_in_start_order() {
    let db = require_db!();
    let database = DatabaseService::new(db.pool.clone());
    let creator = seed_user(&database).await;

    let later = database.plans.create(creator, plan_request(48)).await.unwrap();
    let sooner = database.plans.create(creator, plan_request(2)).await.unwrap();

    let upcoming = database
        .plans
        .list_starting_after(chrono::Utc::now(), 10)
        .await
        .unwrap();
    let ids: Vec<_> = upcoming.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);

    database.plans.delete(sooner.id).await.unwrap();
    assert!(database.plans.find_by_id(sooner.id).await.unwrap().is_none());
}
