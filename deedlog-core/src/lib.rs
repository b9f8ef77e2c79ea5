//! # deedlog-core
//!
//! Core library for deedlog - a single-user bad-deed tracker.
//!
//! This library provides:
//! - Domain types for deeds and calendar keys
//! - The SQLite-backed Event Store
//! - The temporal analytics engine (buckets, streaks, weekday profiles,
//!   monthly trends)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The deed log is the only durable state; every analytic result is derived
//! from it per request. Each report queries the store for its own window,
//! aggregates purely, and serializes straight to the wire shape. The
//! reference "today" is an explicit parameter everywhere, so results are
//! deterministic under test.
//!
//! ## Example
//!
//! ```rust,no_run
//! use deedlog_core::{analytics, Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&config.resolve_database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let today = chrono::Utc::now().date_naive();
//! let report = analytics::streak_report(&db, today).expect("failed to compute streaks");
//! println!("current streak: {} days", report.current_streak.days);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
