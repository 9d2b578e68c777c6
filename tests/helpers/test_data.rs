//! Test data builders

use chrono::{Duration, NaiveDate, NaiveTime};
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use uuid::Uuid;

use event_buddy::database::DatabaseService;
use event_buddy::models::{CreateEventRequest, CreatePlanRequest, CreateVenueRequest, Event, Venue};
use event_buddy::utils::helpers::local_now;

pub fn fake_email() -> String {
    SafeEmail().fake()
}

/// Today in the offset the test settings use
pub fn today() -> NaiveDate {
    local_now(0).date()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn venue_request() -> CreateVenueRequest {
    CreateVenueRequest {
        name: CompanyName().fake(),
        address_line: Some(StreetName().fake()),
        city: Some(CityName().fake()),
        postcode: None,
        latitude: Some(51.5),
        longitude: Some(-0.12),
    }
}

pub fn event_request(start_date: NaiveDate, category: &str) -> CreateEventRequest {
    let title: String = Sentence(2..5).fake();
    CreateEventRequest {
        title: title.trim_end_matches('.').to_string(),
        description: Some(Sentence(5..12).fake()),
        category: category.to_string(),
        start_date,
        start_time: NaiveTime::from_hms_opt(19, 30, 0),
        end_date: None,
        end_time: NaiveTime::from_hms_opt(23, 0, 0),
        venue_id: None,
        tags: vec![Word().fake::<String>().to_lowercase()],
        image_url: None,
        gallery_urls: Vec::new(),
        is_published: Some(true),
    }
}

pub fn plan_request(hours_ahead: i64) -> CreatePlanRequest {
    CreatePlanRequest {
        title: Sentence(2..4).fake(),
        description: None,
        location: Some(CityName().fake()),
        starts_at: chrono::Utc::now() + Duration::hours(hours_ahead),
        max_people: Some(4),
    }
}

/// A user with an empty profile, as created on first sign-in
pub async fn seed_user(database: &DatabaseService) -> Uuid {
    let id = Uuid::new_v4();
    database.profiles.ensure(id).await.expect("failed to seed profile");
    id
}

pub async fn seed_venue(database: &DatabaseService, created_by: Uuid) -> Venue {
    database
        .venues
        .create(created_by, venue_request())
        .await
        .expect("failed to seed venue")
}

/// Published event a week from today
pub async fn seed_event(database: &DatabaseService, organiser_id: Uuid) -> Event {
    seed_event_with(database, organiser_id, event_request(days_from_today(7), "music")).await
}

pub async fn seed_event_with(database: &DatabaseService, organiser_id: Uuid, request: CreateEventRequest) -> Event {
    database
        .events
        .create(organiser_id, request)
        .await
        .expect("failed to seed event")
}
