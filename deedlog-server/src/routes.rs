//! HTTP routes for the deedlog API.
//!
//! Every endpoint is a thin adapter: validate query parameters, capture the
//! reference "today" once, run the store/analytics work on the blocking
//! pool, and serialize the core's report types straight to JSON. Errors map
//! to `{"detail": "..."}` bodies; storage failures surface as a generic 500
//! with the cause logged, never as partial results.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use deedlog_core::analytics::{self, DEFAULT_LIST_LIMIT, DEFAULT_RECENT_DAYS, DEFAULT_TREND_MONTHS};
use deedlog_core::{Database, Deed, Error};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API endpoints.
pub fn router(db: Arc<Database>) -> Router {
    // The original service is consumed by a local web UI; CORS stays open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/", get(root))
        .route("/api/bad-deed", post(record_deed))
        .route("/api/bad-deeds", get(list_deeds))
        .route("/api/stats/today", get(stats_today))
        .route("/api/stats/recent", get(stats_recent))
        .route("/api/stats/day-of-week", get(stats_day_of_week))
        .route("/api/stats/streaks", get(stats_streaks))
        .route("/api/stats/monthly", get(stats_monthly))
        .layer(cors)
        .with_state(db)
}

// ── Errors ──────────────────────────────────────────────────────

/// Error response carrying an HTTP status and a FastAPI-style detail body.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "internal server error".to_string(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match &err {
            Error::Range { .. } | Error::Validation(_) => Self {
                status: StatusCode::BAD_REQUEST,
                detail: err.to_string(),
            },
            _ => {
                tracing::error!(error = %err, "request failed");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Run store work on the blocking pool; SQLite never blocks the executor.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> deedlog_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "blocking task failed");
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}

// ── Handlers ────────────────────────────────────────────────────

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "deedlog API" }))
}

#[derive(Debug, Deserialize, Default)]
pub struct DeedCreate {
    #[serde(default)]
    pub note: Option<String>,
}

async fn record_deed(
    State(db): State<Arc<Database>>,
    Json(input): Json<DeedCreate>,
) -> Result<Json<Deed>, ApiError> {
    let deed = Deed::new(Utc::now(), input.note);
    let stored = deed.clone();
    run_blocking(move || db.insert_deed(&stored)).await?;

    tracing::info!(id = %deed.id, "Recorded deed");
    Ok(Json(deed))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

async fn list_deeds(
    State(db): State<Arc<Database>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Deed>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit <= 0 {
        return Err(Error::Validation("limit must be a positive integer".to_string()).into());
    }

    let deeds = run_blocking(move || db.list_deeds(limit)).await?;
    Ok(Json(deeds))
}

async fn stats_today(
    State(db): State<Arc<Database>>,
) -> Result<Json<analytics::TodayStats>, ApiError> {
    let today = Utc::now().date_naive();
    let stats = run_blocking(move || analytics::today_stats(&db, today)).await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct RecentParams {
    days: Option<u32>,
}

async fn stats_recent(
    State(db): State<Arc<Database>>,
    Query(params): Query<RecentParams>,
) -> Result<Json<analytics::RecentStats>, ApiError> {
    let days = params.days.unwrap_or(DEFAULT_RECENT_DAYS);
    if days == 0 {
        return Err(Error::Validation("days must be a positive integer".to_string()).into());
    }

    let today = Utc::now().date_naive();
    let report = run_blocking(move || analytics::recent_stats(&db, today, days)).await?;
    Ok(Json(report))
}

async fn stats_day_of_week(
    State(db): State<Arc<Database>>,
) -> Result<Json<analytics::WeekdayReport>, ApiError> {
    let today = Utc::now().date_naive();
    let report = run_blocking(move || analytics::weekday_report(&db, today)).await?;
    Ok(Json(report))
}

async fn stats_streaks(
    State(db): State<Arc<Database>>,
) -> Result<Json<analytics::StreakReport>, ApiError> {
    let today = Utc::now().date_naive();
    let report = run_blocking(move || analytics::streak_report(&db, today)).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
struct MonthlyParams {
    months: Option<u32>,
}

async fn stats_monthly(
    State(db): State<Arc<Database>>,
    Query(params): Query<MonthlyParams>,
) -> Result<Json<analytics::MonthlyReport>, ApiError> {
    let months = params.months.unwrap_or(DEFAULT_TREND_MONTHS);
    if months == 0 {
        return Err(Error::Validation("months must be a positive integer".to_string()).into());
    }

    let today = Utc::now().date_naive();
    let report = run_blocking(move || analytics::monthly_report(&db, today, months)).await?;
    Ok(Json(report))
}
