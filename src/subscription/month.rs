use super::error::{SubscriptionError, SubscriptionResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// A calendar month, compared and subtracted through its linear index.
///
/// The textual form is `MM-YYYY` (e.g. `07-2025`). It is used in requests,
/// responses and serde, and `parse(m.to_string())` always gives back `m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthValue {
    year: i32,
    month: u32,
}

impl MonthValue {
    pub fn new(year: i32, month: u32) -> SubscriptionResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(SubscriptionError::InvalidFormat(format!(
                "month {} is outside 01-12",
                month
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(SubscriptionError::InvalidFormat(format!(
                "year {} is outside {}-{}",
                year, MIN_YEAR, MAX_YEAR
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse the `MM-YYYY` form. Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> SubscriptionResult<Self> {
        let text = text.trim();
        let invalid = || SubscriptionError::InvalidFormat(format!("'{}' is not MM-YYYY", text));

        let (month, year) = text.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(invalid());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    /// Month of the given date; the day is dropped.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of this month, the form the store persists.
    pub fn first_day(&self) -> NaiveDate {
        // year and month are range-checked on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// `year * 12 + month`; orders months the same way the calendar does.
    pub fn index(&self) -> i32 {
        self.year * 12 + self.month as i32
    }

    pub fn max(a: Self, b: Self) -> Self {
        if a.index() >= b.index() { a } else { b }
    }

    pub fn min(a: Self, b: Self) -> Self {
        if a.index() <= b.index() { a } else { b }
    }
}

impl PartialOrd for MonthValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index().cmp(&other.index())
    }
}

impl fmt::Display for MonthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl std::str::FromStr for MonthValue {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
