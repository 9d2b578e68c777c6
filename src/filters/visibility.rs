//! Time-based visibility rules
//!
//! An event drops out of public listings once its window has passed:
//!
//! * with an end time: at the end datetime (overnight events ending before
//!   they start roll over to the next day);
//! * with an end date only: at the end of that day;
//! * with a start time only: `grace` after it starts;
//! * with no times at all: at the end of the start day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::Event;

/// Exclusive instant after which the event is hidden
pub fn visible_until(event: &Event, grace: Duration) -> NaiveDateTime {
    match (event.end_time, event.end_date, event.start_time) {
        (Some(end_time), _, start_time) => {
            let end_day = event.last_day();
            let overnight = match start_time {
                Some(start) => end_day == event.start_date && end_time <= start,
                None => false,
            };
            let end_day = if overnight {
                next_day(end_day)
            } else {
                Some(end_day)
            };
            end_day
                .map(|day| day.and_time(end_time))
                .unwrap_or(NaiveDateTime::MAX)
        }
        (None, Some(_), _) => end_of_day(event.last_day()),
        (None, None, Some(_)) => event
            .starts_at()
            .checked_add_signed(grace)
            .unwrap_or(NaiveDateTime::MAX),
        (None, None, None) => end_of_day(event.start_date),
    }
}

/// Whether an event belongs in the public list at local time `now`
pub fn is_visible(event: &Event, now: NaiveDateTime, grace: Duration) -> bool {
    event.is_published && now < visible_until(event, grace)
}

/// Whether the event window has fully passed, regardless of publication
pub fn has_ended(event: &Event, now: NaiveDateTime, grace: Duration) -> bool {
    now >= visible_until(event, grace)
}

fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    next_day(date)
        .map(|day| day.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX)
}
