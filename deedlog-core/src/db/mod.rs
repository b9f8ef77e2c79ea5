//! Database layer for deedlog
//!
//! This module provides the Event Store using SQLite with:
//! - Schema migrations
//! - Insert and range/count queries over recorded deeds
//! - Per-day and per-month grouped counts for the analytics engine

pub mod repo;
pub mod schema;

pub use repo::Database;
