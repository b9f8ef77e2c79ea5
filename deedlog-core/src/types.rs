//! Core domain types for deedlog
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Deed** | A single timestamped bad-deed event, immutable once recorded |
//! | **Clean day** | A calendar day with zero recorded deeds |
//! | **Streak** | A maximal run of consecutive clean days |
//! | **Bucket** | A fixed-granularity (day or month) count over a span, gap-filled |
//!
//! All timestamps are UTC; calendar dates are timezone-free `NaiveDate`s
//! derived from the UTC instant. The reference "today" is never read from an
//! ambient clock inside this crate; callers capture it once per request and
//! pass it in, so analytics are deterministic under test.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// Deed
// ============================================

/// A recorded bad deed.
///
/// Immutable once stored: the store supports insert and range reads only,
/// never update or delete. `user_id` is reserved for future multi-user
/// support and is not consulted anywhere today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deed {
    /// Opaque unique identifier (UUIDv4)
    pub id: String,
    /// When the deed happened (UTC)
    pub timestamp: DateTime<Utc>,
    /// Reserved for multi-user support; always `None` today
    pub user_id: Option<String>,
    /// Optional free-form note
    pub note: Option<String>,
}

impl Deed {
    /// Create a new deed at the given instant with a fresh UUID.
    pub fn new(timestamp: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            user_id: None,
            note,
        }
    }
}

// ============================================
// Weekday
// ============================================

/// Calendar weekday, Sunday-first.
///
/// This is the single weekday convention used across the crate: 1-based,
/// Sunday=1 through Saturday=7 (`number()`), matching the ordering of every
/// per-weekday output. Raw timestamps are classified into this enum in
/// exactly one place, [`Weekday::from_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays in output order (Sunday first).
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Classify a calendar date into its weekday.
    ///
    /// This is the boundary where chrono's Monday-first convention is mapped
    /// onto our Sunday-first one.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::ALL[date.weekday().num_days_from_sunday() as usize]
    }

    /// 1-based Sunday-first index (Sunday=1 ... Saturday=7).
    pub fn number(&self) -> u8 {
        *self as u8 + 1
    }

    /// Zero-based position in [`Weekday::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Full English name ("Sunday").
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Three-letter abbreviation ("Sun").
    pub fn short_str(&self) -> &'static str {
        &self.as_str()[..3]
    }
}

// ============================================
// Month key
// ============================================

/// A calendar month, the unit of the monthly bucket sequence.
///
/// Ordered chronologically so it can key sorted maps; formats as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl MonthKey {
    /// The month containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The next calendar month, rolling December into January.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The month `n` months before this one.
    pub fn months_back(&self, n: u32) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) - n as i64;
        Self {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// First day of this month.
    pub fn first_day(&self) -> NaiveDate {
        // month is always 1-12 by construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid month key")
    }

    /// English month name ("January").
    pub fn name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = String;

    /// Parse a `YYYY-MM` key, as produced by the store's monthly group query.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid month key: {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in month key: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in month key: {}", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in key: {}", s));
        }
        Ok(Self { year, month })
    }
}
