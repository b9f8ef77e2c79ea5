//! Weekday behavioral profiling over an 8-week window.
//!
//! Raw event timestamps are classified by UTC weekday (Sunday-first, see
//! [`Weekday::from_date`]). The per-weekday average divides by the number of
//! distinct calendar dates that actually saw an event of that weekday, NOT
//! by the number of times the weekday occurs in the window: a weekday with
//! two busy Mondays out of eight averages over 2, not 8.

use crate::db::Database;
use crate::error::Result;
use crate::types::Weekday;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Days in the weekday analysis window (8 weeks), ending today.
pub const WEEKDAY_WINDOW_DAYS: i64 = 56;

/// Aggregate profile of one weekday across the window.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayProfile {
    pub weekday: Weekday,
    /// Events of this weekday in the window
    pub total_count: i64,
    /// `total_count / distinct active dates`, 2 decimals; 0 when inactive
    pub average_per_occurrence: f64,
}

/// One entry of the day-of-week response.
#[derive(Debug, Clone, Serialize)]
pub struct DayAnalysisEntry {
    pub day: String,
    pub day_short: String,
    pub total_count: i64,
    pub average_per_day: f64,
}

/// Response shape of `GET /api/stats/day-of-week`.
#[derive(Debug, Clone, Serialize)]
pub struct WeekdayReport {
    pub day_analysis: Vec<DayAnalysisEntry>,
    pub insights: Vec<String>,
    pub analysis_period: String,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classify raw timestamps into the seven weekday profiles, Sunday first.
pub fn profile(timestamps: &[DateTime<Utc>]) -> [WeekdayProfile; 7] {
    let mut totals = [0i64; 7];
    let mut active_dates: [HashSet<NaiveDate>; 7] = Default::default();

    for ts in timestamps {
        let date = ts.date_naive();
        let idx = Weekday::from_date(date).index();
        totals[idx] += 1;
        active_dates[idx].insert(date);
    }

    std::array::from_fn(|idx| {
        let total = totals[idx];
        let occurrences = active_dates[idx].len() as i64;
        let average = if occurrences > 0 {
            round2(total as f64 / occurrences as f64)
        } else {
            0.0
        };
        WeekdayProfile {
            weekday: Weekday::ALL[idx],
            total_count: total,
            average_per_occurrence: average,
        }
    })
}

/// Comparative insight strings, ordered, all applicable included.
///
/// Ties for worst/best resolve to the first weekday in Sunday-first order.
pub fn insights(profiles: &[WeekdayProfile; 7]) -> Vec<String> {
    let mut worst = &profiles[0];
    let mut best = &profiles[0];
    for profile in &profiles[1..] {
        if profile.average_per_occurrence > worst.average_per_occurrence {
            worst = profile;
        }
        if profile.average_per_occurrence < best.average_per_occurrence {
            best = profile;
        }
    }

    let mut insights = Vec::new();

    if worst.average_per_occurrence > 0.0 {
        insights.push(format!(
            "Your hardest day is {} with an average of {:.2} bad deeds",
            worst.weekday.as_str(),
            worst.average_per_occurrence
        ));
    }

    if best.average_per_occurrence == 0.0 {
        insights.push(format!("{} tends to be a clean day", best.weekday.as_str()));
    } else if worst.average_per_occurrence > 2.0 * best.average_per_occurrence {
        insights.push(format!(
            "Your worst day averages {:.1}x more bad deeds than your best",
            worst.average_per_occurrence / best.average_per_occurrence
        ));
    }

    insights
}

/// Weekday report for the 56-day window ending `today`.
pub fn weekday_report(db: &Database, today: NaiveDate) -> Result<WeekdayReport> {
    let start = today - Duration::days(WEEKDAY_WINDOW_DAYS - 1);
    let timestamps = db.timestamps_between(start, today)?;

    let profiles = profile(&timestamps);
    let insights = insights(&profiles);

    let day_analysis = profiles
        .iter()
        .map(|p| DayAnalysisEntry {
            day: p.weekday.as_str().to_string(),
            day_short: p.weekday.short_str().to_string(),
            total_count: p.total_count,
            average_per_day: p.average_per_occurrence,
        })
        .collect();

    Ok(WeekdayReport {
        day_analysis,
        insights,
        analysis_period: format!("{} to {}", start, today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_single_monday_event() {
        // 2024-03-04 was a Monday
        let profiles = profile(&[ts(2024, 3, 4, 9)]);

        let monday = &profiles[Weekday::Monday.index()];
        assert_eq!(monday.total_count, 1);
        assert_eq!(monday.average_per_occurrence, 1.0);

        for p in profiles.iter().filter(|p| p.weekday != Weekday::Monday) {
            assert_eq!(p.total_count, 0);
            assert_eq!(p.average_per_occurrence, 0.0);
        }

        // Both the worst-day and clean-day insights fire
        let insights = insights(&profiles);
        assert_eq!(insights.len(), 2);
        assert!(insights[0].contains("Monday"));
        assert!(insights[1].contains("clean day"));
    }

    #[test]
    fn test_average_divides_by_active_dates() {
        // Three events across two distinct Mondays: 3 / 2, not 3 / 8
        let timestamps = [
            ts(2024, 3, 4, 9),
            ts(2024, 3, 4, 21),
            ts(2024, 3, 11, 12),
        ];
        let profiles = profile(&timestamps);

        let monday = &profiles[Weekday::Monday.index()];
        assert_eq!(monday.total_count, 3);
        assert_eq!(monday.average_per_occurrence, 1.5);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        // Four events across three Tuesdays: 4/3 = 1.333... -> 1.33
        let timestamps = [
            ts(2024, 3, 5, 9),
            ts(2024, 3, 5, 10),
            ts(2024, 3, 12, 9),
            ts(2024, 3, 19, 9),
        ];
        let profiles = profile(&timestamps);
        assert_eq!(
            profiles[Weekday::Tuesday.index()].average_per_occurrence,
            1.33
        );
    }

    #[test]
    fn test_ratio_insight_when_no_clean_day() {
        // Every weekday active; Sunday 3 per date, the rest 1 per date.
        // 2024-03-03 was a Sunday.
        let mut timestamps = Vec::new();
        for offset in 0..7u32 {
            let day = 3 + offset;
            timestamps.push(ts(2024, 3, day, 9));
        }
        timestamps.push(ts(2024, 3, 3, 10));
        timestamps.push(ts(2024, 3, 3, 11));

        let profiles = profile(&timestamps);
        assert_eq!(profiles[Weekday::Sunday.index()].average_per_occurrence, 3.0);

        let insights = insights(&profiles);
        assert_eq!(insights.len(), 2);
        assert!(insights[0].contains("Sunday"));
        assert!(insights[1].contains("3.0x"));
    }

    #[test]
    fn test_no_events_yields_clean_day_insight_only() {
        // No worst-day insight (max average is 0), but the best weekday is
        // trivially clean, so that observation still fires.
        let profiles = profile(&[]);
        let insights = insights(&profiles);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].contains("clean day"));
        // Ties resolve Sunday-first
        assert!(insights[0].contains("Sunday"));
    }

    #[test]
    fn test_close_averages_produce_single_insight() {
        // All seven weekdays active with identical averages: no clean day,
        // and the worst/best ratio is 1x, below the 2x threshold.
        let mut timestamps = Vec::new();
        for offset in 0..7u32 {
            timestamps.push(ts(2024, 3, 3 + offset, 9));
        }

        let profiles = profile(&timestamps);
        let insights = insights(&profiles);
        // Worst-day insight only: best is 1.0 (not clean), ratio 1x (< 2x)
        assert_eq!(insights.len(), 1);
    }
}
