//! Clean-day streak analysis over a 90-day window.
//!
//! A streak is a maximal run of consecutive clean (zero-deed) days. The
//! current streak runs backwards from today; the longest streak is found in
//! a single forward scan whose maximum only updates on strictly greater
//! length, so equal-length ties resolve to the earliest period.

use crate::analytics::buckets::{fill_days, DayBucket};
use crate::db::Database;
use crate::error::Result;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Days in the streak analysis window, ending today.
pub const STREAK_WINDOW_DAYS: i64 = 90;

/// A maximal run of clean days with its exact date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakPeriod {
    #[serde(rename = "start")]
    pub start_date: NaiveDate,
    #[serde(rename = "end")]
    pub end_date: NaiveDate,
    #[serde(rename = "days")]
    pub length_in_days: i64,
}

/// Whether the streak ending today is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakStatus {
    /// Today is clean; the streak is still running.
    Active,
    /// Today has at least one deed.
    Broken,
}

/// The streak ending at the most recent day of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentStreak {
    pub days: i64,
    /// First day of the streak; `None` when the streak is broken.
    pub start_date: Option<NaiveDate>,
    pub status: StreakStatus,
}

/// The longest streak anywhere in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LongestStreak {
    pub days: i64,
    /// `None` when the window contains no clean day at all.
    pub period: Option<StreakPeriod>,
}

/// Response shape of `GET /api/stats/streaks`.
#[derive(Debug, Clone, Serialize)]
pub struct StreakReport {
    pub current_streak: CurrentStreak,
    pub longest_streak: LongestStreak,
    pub analysis_period: String,
}

/// Compute current and longest streaks from a gap-filled bucket sequence
/// (oldest first). Pure; the window bounds live in the buckets themselves.
pub fn analyze(buckets: &[DayBucket]) -> (CurrentStreak, LongestStreak) {
    // Current streak: walk back from the newest day until a deed appears.
    let mut current_days = 0i64;
    let mut current_start = None;
    for bucket in buckets.iter().rev() {
        if !bucket.is_clean {
            break;
        }
        current_days += 1;
        current_start = Some(bucket.date);
    }

    let current = CurrentStreak {
        days: current_days,
        start_date: current_start,
        status: if current_days > 0 {
            StreakStatus::Active
        } else {
            StreakStatus::Broken
        },
    };

    // Longest streak: forward scan, strictly-greater updates only.
    let mut run_len = 0i64;
    let mut run_start: Option<NaiveDate> = None;
    let mut best_len = 0i64;
    let mut best_period = None;

    for bucket in buckets {
        if bucket.is_clean {
            let start = *run_start.get_or_insert(bucket.date);
            run_len += 1;
            if run_len > best_len {
                best_len = run_len;
                best_period = Some(StreakPeriod {
                    start_date: start,
                    end_date: bucket.date,
                    length_in_days: run_len,
                });
            }
        } else {
            run_len = 0;
            run_start = None;
        }
    }

    let longest = LongestStreak {
        days: best_len,
        period: best_period,
    };

    (current, longest)
}

/// Streak report for the 90-day window ending `today`.
pub fn streak_report(db: &Database, today: NaiveDate) -> Result<StreakReport> {
    let start = today - Duration::days(STREAK_WINDOW_DAYS - 1);
    let counts = db.count_by_day(start, today)?;
    let buckets = fill_days(start, today, &counts)?;

    let (current_streak, longest_streak) = analyze(&buckets);

    Ok(StreakReport {
        current_streak,
        longest_streak,
        analysis_period: format!("{} to {}", start, today),
    })
}
