//! Date bucketing: dense, gap-filled daily and monthly count sequences.
//!
//! The Event Store returns sparse grouped counts (days or months with no
//! deeds are simply absent). Everything downstream, from streak scans to the
//! recent-stats endpoint, wants full coverage of its window, so the fill
//! functions here reconstruct the contiguous range and zero-fill the gaps.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{MonthKey, Weekday};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// One calendar day's deed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: i64,
    /// Always `count == 0`; carried so streak scans read naturally.
    pub is_clean: bool,
}

/// One calendar month's deed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub month: MonthKey,
    pub count: i64,
}

/// Gap-fill a sparse per-day count mapping into one bucket per calendar day
/// in `[start, end]`, ascending. Output length is always
/// `(end - start).num_days() + 1`.
pub fn fill_days(
    start: NaiveDate,
    end: NaiveDate,
    counts: &HashMap<NaiveDate, i64>,
) -> Result<Vec<DayBucket>> {
    if start > end {
        return Err(Error::Range { start, end });
    }

    let len = (end - start).num_days() as usize + 1;
    let mut buckets = Vec::with_capacity(len);
    let mut date = start;
    while date <= end {
        let count = counts.get(&date).copied().unwrap_or(0);
        buckets.push(DayBucket {
            date,
            count,
            is_clean: count == 0,
        });
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    Ok(buckets)
}

/// Monthly variant of [`fill_days`]: one bucket per calendar month in
/// `[start, end]`, ascending, stepping through December to January rollovers.
pub fn fill_months(
    start: MonthKey,
    end: MonthKey,
    counts: &HashMap<MonthKey, i64>,
) -> Result<Vec<MonthBucket>> {
    if start > end {
        return Err(Error::Range {
            start: start.first_day(),
            end: end.first_day(),
        });
    }

    let mut buckets = Vec::new();
    let mut month = start;
    while month <= end {
        buckets.push(MonthBucket {
            month,
            count: counts.get(&month).copied().unwrap_or(0),
        });
        month = month.next();
    }

    Ok(buckets)
}

// ============================================
// Recent / today reports
// ============================================

/// One entry of the recent-stats response.
#[derive(Debug, Clone, Serialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub count: i64,
    pub day_of_week: String,
}

/// Response shape of `GET /api/stats/recent`.
#[derive(Debug, Clone, Serialize)]
pub struct RecentStats {
    pub stats: Vec<DailyStat>,
}

/// Response shape of `GET /api/stats/today`.
#[derive(Debug, Clone, Serialize)]
pub struct TodayStats {
    pub count: i64,
    pub date: NaiveDate,
    pub day_of_week: String,
}

/// Gap-filled per-day stats for the `days`-day window ending `today`.
///
/// `days` must be positive; the transport layer validates before calling.
pub fn recent_stats(db: &Database, today: NaiveDate, days: u32) -> Result<RecentStats> {
    let start = today - Duration::days(days as i64 - 1);
    let counts = db.count_by_day(start, today)?;
    let buckets = fill_days(start, today, &counts)?;

    let stats = buckets
        .into_iter()
        .map(|b| DailyStat {
            date: b.date,
            count: b.count,
            day_of_week: Weekday::from_date(b.date).as_str().to_string(),
        })
        .collect();

    Ok(RecentStats { stats })
}

/// Deed count for the single day `today`.
pub fn today_stats(db: &Database, today: NaiveDate) -> Result<TodayStats> {
    let count = db.count_on(today)?;
    Ok(TodayStats {
        count,
        date: today,
        day_of_week: Weekday::from_date(today).as_str().to_string(),
    })
}
