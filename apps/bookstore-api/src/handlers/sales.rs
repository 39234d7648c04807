//! Sales report endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use bookstore_core::SalesReport;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `?start=&end=` as RFC3339 strings. Blank values count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// `GET /sales/report`.
///
/// Without both bounds the trailing window ending now is reported.
pub async fn report(
    State(state): State<AppState>,
    range: Result<Query<ReportRange>, QueryRejection>,
) -> ApiResult<Json<SalesReport>> {
    let Query(range) = range?;
    let start = given(&range.start).map(|s| parse_bound("start", s)).transpose()?;
    let end = given(&range.end).map(|s| parse_bound("end", s)).transpose()?;

    let ctx = state.request_context();
    let report = match (start, end) {
        (Some(start), Some(end)) => state.sales.generate_report(&ctx, start, end).await?,
        _ => state.sales.trailing_report(&ctx).await?,
    };
    Ok(Json(report))
}

/// `GET /sales/report/latest`: the report kept by the background scheduler.
pub async fn latest(State(state): State<AppState>) -> ApiResult<Json<SalesReport>> {
    state
        .sales
        .latest_report()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no scheduled sales report yet"))
}

fn given(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.trim().is_empty())
}

fn parse_bound(name: &str, raw: &str) -> ApiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ApiError::bad_request(format!("invalid {} time '{}': {}", name, raw, e)))
}
