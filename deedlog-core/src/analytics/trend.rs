//! Month-over-month trend classification.
//!
//! The monthly bucket sequence is split into a trailing "recent" window and
//! the up-to-3 buckets immediately before it ("older"); comparing their
//! means against a ±10% band yields the trajectory. Fewer than 2 months of
//! coverage is not classifiable at all.

use crate::analytics::buckets::{fill_months, MonthBucket};
use crate::db::Database;
use crate::error::Result;
use crate::types::MonthKey;
use chrono::NaiveDate;
use serde::Serialize;

/// Default number of months covered by the monthly report.
pub const DEFAULT_TREND_MONTHS: u32 = 12;

/// Size of the recent/older comparison windows, in months.
const COMPARISON_WINDOW: usize = 3;

/// Classified trajectory of the monthly deed counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Worsening => "worsening",
            Trend::Stable => "stable",
            Trend::InsufficientData => "insufficient_data",
        }
    }
}

/// One entry of the monthly response.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStat {
    /// `YYYY-MM`
    pub month: String,
    /// English month name ("January")
    pub month_name: String,
    pub count: i64,
}

/// Response shape of `GET /api/stats/monthly`.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub monthly_stats: Vec<MonthlyStat>,
    pub trend: Trend,
    pub total_period: i64,
}

fn mean(buckets: &[MonthBucket]) -> f64 {
    if buckets.is_empty() {
        0.0
    } else {
        buckets.iter().map(|b| b.count as f64).sum::<f64>() / buckets.len() as f64
    }
}

/// Classify a gap-filled, ascending monthly bucket sequence.
///
/// Windowing for short sequences: recent is the last `min(3, n)` buckets,
/// older is whatever remains of the 3 buckets before that, possibly fewer,
/// possibly none. An empty older window has mean 0 and so routes through
/// the zero-baseline rule.
pub fn classify(buckets: &[MonthBucket]) -> Trend {
    let n = buckets.len();
    if n < 2 {
        return Trend::InsufficientData;
    }

    let recent_start = n - n.min(COMPARISON_WINDOW);
    let older_start = recent_start.saturating_sub(COMPARISON_WINDOW);
    let recent_avg = mean(&buckets[recent_start..]);
    let older_avg = mean(&buckets[older_start..recent_start]);

    if older_avg == 0.0 {
        if recent_avg == 0.0 {
            Trend::Improving
        } else {
            Trend::Stable
        }
    } else {
        let pct = (recent_avg - older_avg) / older_avg * 100.0;
        if pct < -10.0 {
            Trend::Improving
        } else if pct > 10.0 {
            Trend::Worsening
        } else {
            Trend::Stable
        }
    }
}

/// Monthly report for the `months`-month window ending with `today`'s month.
///
/// `months` must be positive; the transport layer validates before calling.
pub fn monthly_report(db: &Database, today: NaiveDate, months: u32) -> Result<MonthlyReport> {
    let end = MonthKey::from_date(today);
    let start = end.months_back(months.saturating_sub(1));

    let counts = db.count_by_month(start, end)?;
    let buckets = fill_months(start, end, &counts)?;

    let trend = classify(&buckets);
    let total_period = buckets.iter().map(|b| b.count).sum();

    let monthly_stats = buckets
        .iter()
        .map(|b| MonthlyStat {
            month: b.month.to_string(),
            month_name: b.month.name().to_string(),
            count: b.count,
        })
        .collect();

    Ok(MonthlyReport {
        monthly_stats,
        trend,
        total_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build ascending buckets starting at 2024-01 with the given counts.
    fn buckets(counts: &[i64]) -> Vec<MonthBucket> {
        let mut month = MonthKey { year: 2024, month: 1 };
        counts
            .iter()
            .map(|&count| {
                let bucket = MonthBucket { month, count };
                month = month.next();
                bucket
            })
            .collect()
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(classify(&buckets(&[])), Trend::InsufficientData);
        assert_eq!(classify(&buckets(&[7])), Trend::InsufficientData);
    }

    #[test]
    fn test_halving_is_improving() {
        // older avg 10, recent avg 5 -> pct -50
        assert_eq!(
            classify(&buckets(&[10, 10, 10, 5, 5, 5])),
            Trend::Improving
        );
    }

    #[test]
    fn test_doubling_is_worsening() {
        assert_eq!(
            classify(&buckets(&[5, 5, 5, 10, 10, 10])),
            Trend::Worsening
        );
    }

    #[test]
    fn test_ten_percent_band_is_stable() {
        // pct == -10 and pct == +10 sit on the closed boundary of stable
        assert_eq!(classify(&buckets(&[10, 10, 10, 9, 9, 9])), Trend::Stable);
        assert_eq!(classify(&buckets(&[10, 10, 10, 11, 11, 11])), Trend::Stable);
    }

    #[test]
    fn test_zero_baseline() {
        // older 0, recent 0 -> improving; older 0, recent > 0 -> stable
        assert_eq!(classify(&buckets(&[0, 0, 0, 0, 0, 0])), Trend::Improving);
        assert_eq!(classify(&buckets(&[0, 0, 0, 4, 4, 4])), Trend::Stable);
    }

    #[test]
    fn test_two_month_window_has_empty_older() {
        // n=2: recent covers both buckets, older is empty (mean 0)
        assert_eq!(classify(&buckets(&[0, 0])), Trend::Improving);
        assert_eq!(classify(&buckets(&[5, 5])), Trend::Stable);
    }

    #[test]
    fn test_four_month_window_clips_older_to_one() {
        // n=4: recent is the last 3, older is the single leading bucket
        assert_eq!(classify(&buckets(&[20, 5, 5, 5])), Trend::Improving);
        assert_eq!(classify(&buckets(&[2, 5, 5, 5])), Trend::Worsening);
    }

    #[test]
    fn test_five_month_window_clips_older_to_two() {
        // n=5: recent is the last 3, older the two leading buckets (avg 10)
        assert_eq!(classify(&buckets(&[10, 10, 5, 5, 5])), Trend::Improving);
        assert_eq!(classify(&buckets(&[10, 10, 10, 10, 10])), Trend::Stable);
    }

    #[test]
    fn test_trend_strings() {
        assert_eq!(Trend::Improving.as_str(), "improving");
        assert_eq!(Trend::InsufficientData.as_str(), "insufficient_data");
        assert_eq!(
            serde_json::to_string(&Trend::InsufficientData).unwrap(),
            "\"insufficient_data\""
        );
    }
}
