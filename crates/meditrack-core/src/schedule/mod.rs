//! Time-of-day classification and schedule statistics.
//!
//! Scheduled times arrive in two shapes: the today endpoint sends full
//! timestamps (`2026-10-17 08:00:00`) while other endpoints send a bare
//! clock time (`08:00`). Both are accepted everywhere; anything else is
//! unclassifiable and falls out of the grouped views.

mod clock;
mod stats;

pub use clock::*;
pub use stats::*;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Morning, afternoon or evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// 06:00 to 11:59
    Morning,
    /// 12:00 to 16:59
    Afternoon,
    /// 17:00 to 05:59
    Evening,
}

impl TimeOfDay {
    /// Display order of the grouped view.
    pub const ALL: [TimeOfDay; 3] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening];

    /// Bucket for an hour in `0..24`.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        }
    }
}

/// A parsed scheduled time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTime {
    /// Full timestamp
    At(NaiveDateTime),
    /// Bare clock time, recurring daily
    Daily(NaiveTime),
}

impl ScheduledTime {
    pub fn time(&self) -> NaiveTime {
        match self {
            ScheduledTime::At(at) => at.time(),
            ScheduledTime::Daily(time) => *time,
        }
    }

    /// Concrete instant, resolving a bare clock time against `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        match self {
            ScheduledTime::At(at) => *at,
            ScheduledTime::Daily(time) => date.and_time(*time),
        }
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const CLOCK_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Parse a raw scheduled time. `None` when the string is in neither shape.
pub fn parse_scheduled(raw: &str) -> Option<ScheduledTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ScheduledTime::At(dt.with_timezone(&Local).naive_local()));
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ScheduledTime::At(at));
        }
    }
    for format in CLOCK_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
            return Some(ScheduledTime::Daily(time));
        }
    }
    None
}

/// Hour of day, if the time parses.
pub fn hour_of(raw: &str) -> Option<u32> {
    parse_scheduled(raw).map(|t| t.time().hour())
}

/// Bucket for a raw time. `None` for unparseable input.
pub fn classify(raw: &str) -> Option<TimeOfDay> {
    hour_of(raw).map(TimeOfDay::from_hour)
}

pub fn is_morning(raw: &str) -> bool {
    classify(raw) == Some(TimeOfDay::Morning)
}

pub fn is_afternoon(raw: &str) -> bool {
    classify(raw) == Some(TimeOfDay::Afternoon)
}

pub fn is_evening(raw: &str) -> bool {
    classify(raw) == Some(TimeOfDay::Evening)
}

/// 12-hour display (`8:05 AM`). Unparseable input is returned unchanged.
pub fn display_time(raw: &str) -> String {
    match parse_scheduled(raw) {
        Some(t) => t.time().format("%-I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// `HH:MM` for the time input of the edit modal.
pub fn input_time(raw: &str) -> Option<String> {
    parse_scheduled(raw).map(|t| t.time().format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (0, TimeOfDay::Evening),
            (5, TimeOfDay::Evening),
            (6, TimeOfDay::Morning),
            (11, TimeOfDay::Morning),
            (12, TimeOfDay::Afternoon),
            (16, TimeOfDay::Afternoon),
            (17, TimeOfDay::Evening),
            (23, TimeOfDay::Evening),
        ];
        for (hour, expected) in cases {
            assert_eq!(TimeOfDay::from_hour(hour), expected, "hour {}", hour);
        }
    }

    #[test]
    fn test_both_time_shapes_classify() {
        assert!(is_morning("2026-10-17 08:00:00"));
        assert!(is_morning("08:30"));
        assert!(is_afternoon("2026-10-17T12:00"));
        assert!(is_afternoon("16:59:59"));
        assert!(is_evening("2026-10-17 05:59"));
        assert!(is_evening("00:00"));
    }

    #[test]
    fn test_unparseable_is_in_no_bucket() {
        for raw in ["", "soon", "25:00", "2026-13-01 08:00:00", "8 o'clock"] {
            assert_eq!(classify(raw), None, "{:?}", raw);
            assert!(!is_morning(raw) && !is_afternoon(raw) && !is_evening(raw));
        }
    }

    #[test]
    fn test_rfc3339_parses() {
        assert!(matches!(
            parse_scheduled("2026-10-17T08:00:00+00:00"),
            Some(ScheduledTime::At(_))
        ));
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(hour_of("2026-10-17 14:05:00.123456"), Some(14));
    }

    #[test]
    fn test_display_time() {
        assert_eq!(display_time("2026-10-17 08:05:00"), "8:05 AM");
        assert_eq!(display_time("00:30"), "12:30 AM");
        assert_eq!(display_time("12:00"), "12:00 PM");
        assert_eq!(display_time("21:45:10"), "9:45 PM");
        assert_eq!(display_time("whenever"), "whenever");
    }

    #[test]
    fn test_input_time() {
        assert_eq!(input_time("2026-10-17 08:05:00").as_deref(), Some("08:05"));
        assert_eq!(input_time("bogus"), None);
    }

    #[test]
    fn test_daily_resolves_against_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let t = parse_scheduled("09:15").unwrap();
        assert_eq!(t.on(date).to_string(), "2026-10-17 09:15:00");
    }
}
