// 📅 Calendar - Month keys and gap-free month ranges
//
// Everything downstream works at month granularity. A MonthKey is a
// (year, month) pair ordered chronologically, and a MonthRange walks every
// month between two keys, including months that have no data at all.

use crate::error::{AnalyticsError, AnalyticsResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MONTH KEY
// ============================================================================

/// (year, month) with month in 1..=12.
/// Fields are private so every key goes through `new`; deserialization
/// validates the same way.
/// Field order matters: the derived Ord compares year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "MonthKeyParts")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

/// Unchecked wire form of a MonthKey
#[derive(Deserialize)]
struct MonthKeyParts {
    year: i32,
    month: u32,
}

impl TryFrom<MonthKeyParts> for MonthKey {
    type Error = AnalyticsError;

    fn try_from(parts: MonthKeyParts) -> AnalyticsResult<Self> {
        MonthKey::new(parts.year, parts.month)
    }
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> AnalyticsResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AnalyticsError::InvalidMonth { year, month });
        }
        Ok(MonthKey { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Linear month index: 12 * year + month - 1
    pub fn index(&self) -> i64 {
        12 * self.year as i64 + self.month as i64 - 1
    }

    /// Inverse of `index`. None when the year does not fit in i32.
    pub fn from_index(index: i64) -> Option<Self> {
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = index.rem_euclid(12) as u32 + 1;
        Some(MonthKey { year, month })
    }

    /// Following month, rolling December over into January
    pub fn next(&self) -> Self {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Normalize a textual date down to its month.
    ///
    /// Accepts M/D/YYYY (also with '-' or ':' separators), YYYY-M-D and
    /// YYYY-M. Any time-of-day after the date is ignored. The day only has
    /// to be a 1-2 digit number: it is replaced by the first of the month
    /// before parsing, so "02/30/2019" lands in February 2019.
    pub fn parse(text: &str) -> AnalyticsResult<Self> {
        let invalid = || AnalyticsError::InvalidDate(text.to_string());
        let is_number = |field: &str, max_len: usize| {
            !field.is_empty() && field.len() <= max_len && field.chars().all(|c| c.is_ascii_digit())
        };

        let date_part = text.split_whitespace().next().ok_or_else(invalid)?;
        let fields: Vec<&str> = date_part.split(&['/', '-', ':'][..]).collect();

        let (year, month, day) = match fields.as_slice() {
            [y, m] if y.len() == 4 => (*y, *m, "01"),
            [y, m, d] if y.len() == 4 => (*y, *m, *d),
            [m, d, y] => (*y, *m, *d),
            _ => return Err(invalid()),
        };

        if year.len() != 4 || !is_number(year, 4) || !is_number(month, 2) || !is_number(day, 2) {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(&format!("{}-{}-01", year, month), "%Y-%m-%d")
            .map(MonthKey::from)
            .map_err(|_| invalid())
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Report layout: first of the month at midnight, "03/01/2019 12:00:00 AM"
impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/01/{:04} 12:00:00 AM", self.month, self.year)
    }
}

// ============================================================================
// MONTH RANGE
// ============================================================================

/// Ascending months in [start, end). Cloning restarts nothing: every call to
/// `months` builds a fresh range from its bounds.
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: i64,
    end: i64,
}

/// Months from `start` (inclusive) up to `end` (exclusive).
/// Callers that want to include a final month pass `last.next()`.
pub fn months(start: MonthKey, end: MonthKey) -> MonthRange {
    MonthRange {
        next: start.index(),
        end: end.index(),
    }
}

/// Four-argument form of `months`; the end month is exclusive.
pub fn months_between(
    start_year: i32,
    start_month: u32,
    end_year: i32,
    end_month: u32,
) -> AnalyticsResult<MonthRange> {
    let start = MonthKey::new(start_year, start_month)?;
    let end = MonthKey::new(end_year, end_month)?;
    Ok(months(start, end))
}

impl Iterator for MonthRange {
    type Item = MonthKey;

    fn next(&mut self) -> Option<MonthKey> {
        if self.next >= self.end {
            return None;
        }
        let key = MonthKey::from_index(self.next)?;
        self.next += 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for MonthRange {
    fn next_back(&mut self) -> Option<MonthKey> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        MonthKey::from_index(self.end)
    }
}

impl ExactSizeIterator for MonthRange {}

// ============================================================================
// TESTS
// ============================================================================
