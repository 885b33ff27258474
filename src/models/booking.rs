//! Session bookings between a mentee and a mentor

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::mentor::Mentor;

/// Booking status. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        Self::Scheduled,
        Self::Completed,
        Self::Cancelled,
        Self::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenteeInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub session_type: String,
    pub duration_minutes: u32,
    pub scheduled_date: NaiveDate,
    /// Wall-clock start time, `HH:MM`
    pub scheduled_time: String,
    pub topic: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub rating: u8,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub mentor_id: String,
    pub mentor_name: String,
    pub mentee: MenteeInfo,
    pub session_details: SessionDetails,
    pub status: BookingStatus,
    pub payment: Payment,
    pub feedback: Option<Feedback>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// New scheduled booking priced at the mentor's current rate
    pub fn new(
        mentor: &Mentor,
        mentee: MenteeInfo,
        session_details: SessionDetails,
        currency: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            mentor_id: mentor.id.clone(),
            mentor_name: mentor.name.clone(),
            mentee,
            session_details,
            status: BookingStatus::Scheduled,
            payment: Payment {
                amount: mentor.session_rate(),
                currency: currency.to_string(),
                status: PaymentStatus::Pending,
            },
            feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mentor::NewMentor;

    fn details() -> SessionDetails {
        SessionDetails {
            session_type: "consultation".into(),
            duration_minutes: 60,
            scheduled_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            scheduled_time: "14:30".into(),
            topic: None,
            notes: None,
        }
    }

    fn mentee() -> MenteeInfo {
        MenteeInfo {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            phone: None,
            company: Some("Cobol Labs".into()),
        }
    }

    #[test]
    fn test_new_booking_prices_from_mentor_rate() {
        let mut mentor = Mentor::from_application(
            NewMentor {
                name: "A".into(),
                email: "a@x.com".into(),
                hourly_rate: Some(100.0),
                ..Default::default()
            },
            1,
            "t".into(),
            Utc::now(),
        );
        let booking = Booking::new(&mentor, mentee(), details(), "USD", Utc::now());
        assert_eq!(booking.payment.amount, 100.0);
        assert_eq!(booking.status, BookingStatus::Scheduled);
        assert_eq!(booking.mentor_id, mentor.id);

        mentor.hourly_rate = None;
        let unpriced = Booking::new(&mentor, mentee(), details(), "USD", Utc::now());
        assert_eq!(unpriced.payment.amount, 0.0);
    }

    #[test]
    fn test_no_show_wire_name() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::NoShow).unwrap(),
            r#""no-show""#
        );
        let parsed: BookingStatus = serde_json::from_str(r#""cancelled""#).unwrap();
        assert_eq!(parsed, BookingStatus::Cancelled);
    }
}
