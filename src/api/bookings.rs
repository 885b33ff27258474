use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiResult;
use crate::models::{Booking, BookingStatus};
use crate::services::bookings::{BookingPatch, BookingQuery, BookingStatusView, FeedbackInput};
use crate::services::{AppState, WeeklyReport};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Return the report as a JSON attachment instead of mailing it
    pub download: bool,
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> ApiResult<Json<Vec<Booking>>> {
    Ok(Json(state.bookings().list(query).await?))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    Ok(Json(state.bookings().get(&id).await?))
}

pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<BookingPatch>,
) -> ApiResult<Json<Booking>> {
    Ok(Json(state.bookings().update(&id, patch).await?))
}

pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingStatusView>> {
    Ok(Json(state.bookings().status(&id).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<Json<Booking>> {
    Ok(Json(
        state.bookings().update_status(&id, update.status).await?,
    ))
}

pub async fn add_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(feedback): Json<FeedbackInput>,
) -> ApiResult<Json<Booking>> {
    Ok(Json(state.bookings().add_feedback(&id, feedback).await?))
}

pub async fn weekly_analytics(State(state): State<AppState>) -> ApiResult<Json<WeeklyReport>> {
    Ok(Json(state.reports().weekly().await?))
}

pub async fn weekly_report(
    State(state): State<AppState>,
    Query(options): Query<ReportOptions>,
) -> ApiResult<Response> {
    if options.download {
        let report = state.reports().weekly().await?;
        let body = report.to_json()?;
        let disposition = format!("attachment; filename=\"{}\"", report.file_name());
        return Ok((
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response());
    }

    let (report, mailed) = state.reports().send_weekly().await?;
    Ok(Json(json!({
        "message": if mailed { "Weekly report sent" } else { "Weekly report generated but not mailed" },
        "mailed": mailed,
        "report": report,
    }))
    .into_response())
}
