//! Session bookings, status changes and feedback

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{non_blank, require, require_email, AppState};
use crate::error::{common, Result};
use crate::models::{
    Booking, BookingStatus, Feedback, MenteeInfo, PaymentStatus, Review, SessionDetails,
};
use crate::storage::BookingFilter;

const DEFAULT_SESSION_TYPE: &str = "consultation";
const DEFAULT_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenteeInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    #[serde(default, alias = "type")]
    pub session_type: Option<String>,
    #[serde(default, alias = "duration")]
    pub duration_minutes: Option<u32>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(alias = "menteeInfo")]
    pub mentee: MenteeInput,
    pub session_details: SessionInput,
}

/// Partial update of session details and payment state
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingPatch {
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<String>,
    pub duration_minutes: Option<u32>,
    pub topic: Option<String>,
    pub notes: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackInput {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingQuery {
    pub mentor_id: Option<String>,
    pub mentee_email: Option<String>,
    pub status: Option<BookingStatus>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatusView {
    pub id: String,
    pub status: BookingStatus,
    pub updated_at: chrono::DateTime<Utc>,
}

fn check_duration(minutes: u32) -> Result<u32> {
    if minutes == 0 || minutes > 8 * 60 {
        return Err(common::out_of_range(
            "durationMinutes",
            "Session duration must be between 1 and 480 minutes",
        ));
    }
    Ok(minutes)
}

/// Accept a 24-hour `HH:MM` start time, stored zero-padded
fn check_time(field: &str, value: &str) -> Result<String> {
    let value = require(field, value)?;
    NaiveTime::parse_from_str(&value, "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| common::invalid_format(field, "Time must be HH:MM in 24-hour format"))
}

pub struct BookingService<'a> {
    state: &'a AppState,
}

impl<'a> BookingService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Book a session with the mentor identified by `mentor_ref`.
    ///
    /// The booking is persisted before any notification goes out; mail
    /// failures leave it in place.
    pub async fn create(&self, mentor_ref: &str, request: BookingRequest) -> Result<Booking> {
        let mentee = MenteeInfo {
            name: require("mentee.name", &request.mentee.name)?,
            email: require_email("mentee.email", &request.mentee.email)?,
            phone: non_blank(request.mentee.phone),
            company: non_blank(request.mentee.company),
        };
        let session = request.session_details;
        let details = SessionDetails {
            session_type: non_blank(session.session_type)
                .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string()),
            duration_minutes: check_duration(
                session.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            )?,
            scheduled_date: session.scheduled_date,
            scheduled_time: check_time("sessionDetails.scheduledTime", &session.scheduled_time)?,
            topic: non_blank(session.topic),
            notes: non_blank(session.notes),
        };

        let mut mentor = self.state.mentors().resolve(mentor_ref).await?;
        let now = Utc::now();
        let booking = Booking::new(
            &mentor,
            mentee,
            details,
            &self.state.config.booking.currency,
            now,
        );

        self.state.storage.bookings().save(&booking).await?;

        mentor.total_bookings += 1;
        mentor.touch(now);
        self.state.storage.mentors().save(&mentor).await?;

        info!(
            "Booking {} created for mentor {} by {}",
            booking.id, mentor.id, booking.mentee.email
        );

        self.count_session_for_user(&booking.mentee.email).await;

        let mentor_email = mentor.email.clone();
        self.state
            .notify(|t| t.booking_for_mentor(&booking, &mentor_email))
            .await;
        self.state.notify(|t| t.booking_for_mentee(&booking)).await;
        self.state.notify(|t| t.booking_for_admin(&booking)).await;

        Ok(booking)
    }

    /// Bump the known user's session counter; best effort
    async fn count_session_for_user(&self, email: &str) {
        let users = self.state.storage.users();
        let found = match users.find_by_email(email).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Could not look up user {} for session count: {}", email, e);
                return;
            }
        };

        if let Some(mut user) = found {
            user.activity.sessions_booked += 1;
            user.record_activity(Utc::now());
            if let Err(e) = users.save(&user).await {
                warn!("Could not update session count for {}: {}", user.uid, e);
            }
        } else {
            debug!("No user account for mentee {}", email);
        }
    }

    pub async fn get(&self, id: &str) -> Result<Booking> {
        self.state
            .storage
            .bookings()
            .get(id)
            .await?
            .ok_or_else(|| common::booking_not_found(id))
    }

    pub async fn list(&self, query: BookingQuery) -> Result<Vec<Booking>> {
        let filter = BookingFilter {
            mentor_id: non_blank(query.mentor_id),
            mentee_email: non_blank(query.mentee_email),
            status: query.status,
            skip: query.skip.unwrap_or(0),
            limit: query.limit,
            ..Default::default()
        };
        Ok(self.state.storage.bookings().list(filter).await?)
    }

    pub async fn status(&self, id: &str) -> Result<BookingStatusView> {
        let booking = self.get(id).await?;
        Ok(BookingStatusView {
            id: booking.id,
            status: booking.status,
            updated_at: booking.updated_at,
        })
    }

    /// Overwrite the status; any transition is accepted
    pub async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Booking> {
        let mut booking = self.get(id).await?;
        let previous = booking.status;
        booking.status = status;
        booking.touch(Utc::now());
        self.state.storage.bookings().save(&booking).await?;
        info!(
            "Booking {} status {} -> {}",
            booking.id,
            previous.as_str(),
            status.as_str()
        );
        Ok(booking)
    }

    pub async fn update(&self, id: &str, patch: BookingPatch) -> Result<Booking> {
        let mut booking = self.get(id).await?;
        let details = &mut booking.session_details;

        if let Some(date) = patch.scheduled_date {
            details.scheduled_date = date;
        }
        if let Some(time) = patch.scheduled_time {
            details.scheduled_time = check_time("scheduledTime", &time)?;
        }
        if let Some(minutes) = patch.duration_minutes {
            details.duration_minutes = check_duration(minutes)?;
        }
        if patch.topic.is_some() {
            details.topic = non_blank(patch.topic);
        }
        if patch.notes.is_some() {
            details.notes = non_blank(patch.notes);
        }
        if let Some(payment_status) = patch.payment_status {
            booking.payment.status = payment_status;
        }

        booking.touch(Utc::now());
        self.state.storage.bookings().save(&booking).await?;
        Ok(booking)
    }

    /// Record feedback on the booking and append it to the mentor's reviews.
    /// The mentor's stored `rating` is not recomputed.
    pub async fn add_feedback(&self, id: &str, input: FeedbackInput) -> Result<Booking> {
        if !(1..=5).contains(&input.rating) {
            return Err(common::out_of_range(
                "rating",
                "Rating must be between 1 and 5",
            ));
        }

        let mut booking = self.get(id).await?;
        let now = Utc::now();
        let comment = non_blank(input.comment);
        booking.feedback = Some(Feedback {
            rating: input.rating,
            comment: comment.clone(),
            submitted_at: now,
        });
        booking.touch(now);
        self.state.storage.bookings().save(&booking).await?;

        let mentors = self.state.storage.mentors();
        match mentors.get(&booking.mentor_id).await? {
            Some(mut mentor) => {
                mentor.reviews.push(Review {
                    booking_id: booking.id.clone(),
                    mentee_name: booking.mentee.name.clone(),
                    rating: input.rating,
                    comment,
                    created_at: now,
                });
                mentor.touch(now);
                mentors.save(&mentor).await?;
            }
            None => warn!(
                "Mentor {} of booking {} no longer exists; review not recorded",
                booking.mentor_id, booking.id
            ),
        }

        info!("Feedback {} recorded for booking {}", input.rating, booking.id);
        Ok(booking)
    }
}
