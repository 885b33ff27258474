use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use serde_json::{json, Value};

use super::error::ApiResult;
use crate::models::{Booking, MentorProfile, MentorSummary};
use crate::services::bookings::BookingRequest;
use crate::services::mentors::{MentorApplication, MentorPatch, MentorQuery};
use crate::services::AppState;

pub async fn list_mentors(
    State(state): State<AppState>,
    Query(query): Query<MentorQuery>,
) -> ApiResult<Json<Vec<MentorSummary>>> {
    Ok(Json(state.mentors().list(query).await?))
}

pub async fn submit_application(
    State(state): State<AppState>,
    Json(application): Json<MentorApplication>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mentor = state.mentors().submit_application(application).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Application submitted. We will email you once it is reviewed.",
            "mentor": mentor.summary(),
        })),
    ))
}

pub async fn get_mentor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MentorProfile>> {
    Ok(Json(state.mentors().resolve(&id).await?.profile()))
}

pub async fn update_mentor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MentorPatch>,
) -> ApiResult<Json<MentorProfile>> {
    Ok(Json(state.mentors().update(&id, patch).await?.profile()))
}

pub async fn delete_mentor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.mentors().delete(&id).await?;
    Ok(Json(json!({ "message": "Mentor deleted" })))
}

/// Redeem the emailed token, then send the browser to the success page
pub async fn verify_mentor(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Redirect> {
    state.mentors().verify(&token).await?;
    Ok(Redirect::to(&state.config.verification.success_redirect))
}

pub async fn book_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<BookingRequest>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let booking = state.bookings().create(&id, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}
