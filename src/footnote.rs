//! Footnote calendars.
//!
//! A footnote arrives as one `0`/`1` character per day of the delivery's
//! validity window. Only the sparser side is materialised: either the days the
//! footnote applies to (`Only`) or the days it does not (`Except`).

use chrono::{Days, NaiveDate};
use itertools::Itertools;
use serde::Serialize;

/// Half-open range of calendar days `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ValidityWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ValidityWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window covering `first_day` through `last_day`, both included.
    pub fn inclusive(first_day: NaiveDate, last_day: NaiveDate) -> Self {
        Self {
            start: first_day,
            end: last_day.checked_add_days(Days::new(1)).unwrap_or(last_day),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |date| *date < self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FootnoteKind {
    Only,
    Except,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FootnoteCalendar {
    pub kind: FootnoteKind,
    pub dates: Vec<NaiveDate>,
}

impl FootnoteCalendar {
    /// Decodes `vector` against `window`, day by day from its start.
    ///
    /// Equal counts of ones and zeros resolve to `Except`. That tie-break has no
    /// meaning of its own but existing consumers rely on it.
    pub fn decode(window: &ValidityWindow, vector: &str) -> Self {
        let vector = vector.trim();
        let counts = vector.chars().counts();
        let ones = counts.get(&'1').copied().unwrap_or(0);
        let zeros = counts.get(&'0').copied().unwrap_or(0);
        let (kind, wanted) = if ones < zeros {
            (FootnoteKind::Only, '1')
        } else {
            (FootnoteKind::Except, '0')
        };
        let dates = window
            .days()
            .zip(vector.chars())
            .filter(|(_, day)| *day == wanted)
            .map(|(date, _)| date)
            .collect();
        Self { kind, dates }
    }

    pub fn runs_on(&self, date: NaiveDate) -> bool {
        let listed = self.dates.binary_search(&date).is_ok();
        match self.kind {
            FootnoteKind::Only => listed,
            FootnoteKind::Except => !listed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    fn three_days() -> ValidityWindow {
        ValidityWindow::new(day(1), day(4))
    }

    #[test]
    fn sparse_ones_are_listed_as_only() {
        let calendar = FootnoteCalendar::decode(&three_days(), "100");
        assert_eq!(calendar.kind, FootnoteKind::Only);
        assert_eq!(calendar.dates, vec![day(1)]);
        assert!(calendar.runs_on(day(1)));
        assert!(!calendar.runs_on(day(2)));
    }

    #[test]
    fn two_of_three_days_lists_the_gap() {
        let calendar = FootnoteCalendar::decode(&three_days(), "101");
        assert_eq!(calendar.kind, FootnoteKind::Except);
        assert_eq!(calendar.dates, vec![day(2)]);
    }

    #[test]
    fn more_ones_than_zeros_lists_exclusions() {
        let calendar = FootnoteCalendar::decode(&three_days(), "011");
        assert_eq!(calendar.kind, FootnoteKind::Except);
        assert_eq!(calendar.dates, vec![day(1)]);
        assert!(!calendar.runs_on(day(1)));
        assert!(calendar.runs_on(day(2)));
    }

    #[test]
    fn ties_resolve_to_except() {
        let window = ValidityWindow::new(day(1), day(5));
        let calendar = FootnoteCalendar::decode(&window, "1100");
        assert_eq!(calendar.kind, FootnoteKind::Except);
        assert_eq!(calendar.dates, vec![day(3), day(4)]);
    }

    #[test]
    fn vector_longer_than_window_is_cut_off() {
        let calendar = FootnoteCalendar::decode(&three_days(), "0001000");
        assert_eq!(calendar.kind, FootnoteKind::Only);
        assert!(calendar.dates.is_empty());
    }

    #[test]
    fn inclusive_window_covers_last_day() {
        let window = ValidityWindow::inclusive(day(1), day(3));
        assert_eq!(window, three_days());
        assert_eq!(window.days().collect::<Vec<_>>(), vec![day(1), day(2), day(3)]);
        assert!(!window.contains(day(4)));
    }
}
