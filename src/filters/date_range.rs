//! Date range presets for the "when" filter

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    Any,
    Today,
    Tomorrow,
    /// Friday to Sunday; on Saturday or Sunday it starts today
    ThisWeekend,
    /// Today to Sunday
    ThisWeek,
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl DateRange {
    /// Build a range from the `when`, `from` and `to` query parameters
    pub fn parse(
        when: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self, String> {
        let range = match when.map(|w| w.trim().to_lowercase()).as_deref() {
            None | Some("") => {
                if from.is_some() || to.is_some() {
                    DateRange::Custom { from, to }
                } else {
                    DateRange::Any
                }
            }
            Some("any") | Some("all") => DateRange::Any,
            Some("today") => DateRange::Today,
            Some("tomorrow") => DateRange::Tomorrow,
            Some("this_weekend") | Some("weekend") => DateRange::ThisWeekend,
            Some("this_week") | Some("week") => DateRange::ThisWeek,
            Some("custom") => DateRange::Custom { from, to },
            Some(other) => return Err(format!("Unknown date range: {}", other)),
        };

        if let DateRange::Custom {
            from: Some(from),
            to: Some(to),
        } = range
        {
            if from > to {
                return Err("Date range start must not be after its end".to_string());
            }
        }

        Ok(range)
    }

    /// Query-string token for this preset
    pub fn slug(&self) -> &'static str {
        match self {
            DateRange::Any => "any",
            DateRange::Today => "today",
            DateRange::Tomorrow => "tomorrow",
            DateRange::ThisWeekend => "this_weekend",
            DateRange::ThisWeek => "this_week",
            DateRange::Custom { .. } => "custom",
        }
    }

    /// Inclusive `(from, to)` bounds relative to `today`; `None` means unrestricted
    pub fn resolve(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let weekday = i64::from(today.weekday().num_days_from_monday());
        let sunday = today + Duration::days(6 - weekday);

        match self {
            DateRange::Any => None,
            DateRange::Today => Some((today, today)),
            DateRange::Tomorrow => {
                let tomorrow = today + Duration::days(1);
                Some((tomorrow, tomorrow))
            }
            DateRange::ThisWeekend => {
                let friday = if weekday <= 4 {
                    today + Duration::days(4 - weekday)
                } else {
                    today
                };
                Some((friday, sunday))
            }
            DateRange::ThisWeek => Some((today, sunday)),
            DateRange::Custom { from: None, to: None } => None,
            DateRange::Custom { from, to } => {
                Some((from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX)))
            }
        }
    }

    /// Whether a span of days `[start, end]` overlaps this range
    pub fn overlaps(&self, today: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
        match self.resolve(today) {
            None => true,
            Some((from, to)) => start <= to && end >= from,
        }
    }
}
