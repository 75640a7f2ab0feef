//! Service times as elapsed minutes since local midnight.
//!
//! Operators whose travel day does not switch at midnight write times such as
//! `2510` for 01:10 on the following calendar day. These are kept as an offset
//! from the start of the service day rather than folded back into 0-23 hours.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceTime {
    minutes: u32,
}

impl ServiceTime {
    pub fn from_hm(hours: u32, minutes: u32) -> Self {
        Self {
            minutes: hours * 60 + minutes,
        }
    }

    /// Reads a four digit `HHMM` token. Hours are not limited to 0-23.
    pub fn parse_hhmm(token: &str) -> Option<Self> {
        if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours = token[..2].parse().ok()?;
        let minutes = token[2..].parse().ok()?;
        Some(Self::from_hm(hours, minutes))
    }

    pub fn total_minutes(&self) -> u32 {
        self.minutes
    }

    pub fn hours(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minutes(&self) -> u32 {
        self.minutes % 60
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }

    /// Local date and time this offset falls on for a service running on `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(chrono::NaiveTime::MIN) + self.as_duration()
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_midnight_is_not_wrapped() {
        let time = ServiceTime::parse_hhmm("2510").unwrap();
        assert_eq!(time.hours(), 25);
        assert_eq!(time.minutes(), 10);
        assert_eq!(time.as_duration(), Duration::hours(25) + Duration::minutes(10));
        assert_eq!(time.to_string(), "25:10");
    }

    #[test]
    fn projects_onto_next_day() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let time = ServiceTime::parse_hhmm("2510").unwrap();
        assert_eq!(
            time.on(date),
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap().and_hms_opt(1, 10, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(ServiceTime::parse_hhmm("12:3").is_none());
        assert!(ServiceTime::parse_hhmm("123").is_none());
        assert!(ServiceTime::parse_hhmm("12a4").is_none());
    }

    #[test]
    fn orders_by_elapsed_minutes() {
        assert!(ServiceTime::from_hm(23, 59) < ServiceTime::from_hm(24, 0));
    }
}
