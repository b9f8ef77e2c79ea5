//! Temporal analytics for deedlog
//!
//! Turns the raw, sparse deed log into dense derived signals:
//! - [`buckets`]: gap-filled daily/monthly count sequences and the
//!   recent/today reports
//! - [`streaks`]: current and longest clean-day streaks over 90 days
//! - [`weekday`]: per-weekday behavioral profile over 8 weeks, with
//!   comparative insights
//! - [`trend`]: month-over-month trajectory classification
//!
//! Every entry point takes the reference date explicitly (`today`), queries
//! the store for exactly its own window, and recomputes from scratch: no
//! derived state survives between requests, so rerunning any report against
//! an unchanged store yields byte-identical JSON. A failure anywhere aborts
//! the whole report; partial bucket sequences are never returned.

pub mod buckets;
pub mod streaks;
pub mod trend;
pub mod weekday;

pub use buckets::{
    fill_days, fill_months, recent_stats, today_stats, DayBucket, DailyStat, MonthBucket,
    RecentStats, TodayStats,
};
pub use streaks::{
    analyze as analyze_streaks, streak_report, CurrentStreak, LongestStreak, StreakPeriod,
    StreakReport, StreakStatus, STREAK_WINDOW_DAYS,
};
pub use trend::{
    classify as classify_trend, monthly_report, MonthlyReport, MonthlyStat, Trend,
    DEFAULT_TREND_MONTHS,
};
pub use weekday::{
    insights as weekday_insights, profile as weekday_profile, weekday_report, DayAnalysisEntry,
    WeekdayProfile, WeekdayReport, WEEKDAY_WINDOW_DAYS,
};

/// Default window for the recent-stats report, in days.
pub const DEFAULT_RECENT_DAYS: u32 = 7;

/// Default page size for the deed listing.
pub const DEFAULT_LIST_LIMIT: i64 = 100;
