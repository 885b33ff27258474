//! Mentor entity, application status, and public projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review state of a mentor application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl MentorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A review left by a mentee after a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub booking_id: String,
    pub mentee_name: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A mentor record as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentor {
    pub id: String,
    /// Secondary numeric identifier, used by older links that predate uuids
    pub mentor_number: u64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub domain: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    pub experience_years: Option<u32>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linkedin: Option<String>,
    pub bio: String,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub status: MentorStatus,
    pub verified: bool,
    pub verification_token: Option<String>,
    pub total_bookings: u64,
    pub rating: f64,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by an applicant
#[derive(Debug, Clone, Default)]
pub struct NewMentor {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub domain: String,
    pub expertise: Vec<String>,
    pub experience_years: Option<u32>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linkedin: Option<String>,
    pub bio: String,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
}

impl Mentor {
    /// Build a pending, unverified mentor from an application
    pub fn from_application(
        fields: NewMentor,
        mentor_number: u64,
        verification_token: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            mentor_number,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            domain: fields.domain,
            expertise: fields.expertise,
            experience_years: fields.experience_years,
            company: fields.company,
            position: fields.position,
            linkedin: fields.linkedin,
            bio: fields.bio,
            hourly_rate: fields.hourly_rate,
            availability: fields.availability,
            status: MentorStatus::Pending,
            verified: false,
            verification_token: Some(verification_token),
            total_bookings: 0,
            rating: 0.0,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the mentor verified and consume the token
    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.verified = true;
        self.status = MentorStatus::Approved;
        self.verification_token = None;
        self.touch(now);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Rate charged for a session, zero when the mentor never set one
    pub fn session_rate(&self) -> f64 {
        self.hourly_rate.unwrap_or(0.0)
    }

    /// Mean of the review ratings. `rating` itself is left as stored.
    pub fn review_average(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self.reviews.iter().map(|r| r.rating as u32).sum();
        Some(total as f64 / self.reviews.len() as f64)
    }

    /// Case-insensitive match against name, bio, domain and expertise
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.bio.to_lowercase().contains(&needle)
            || self.domain.to_lowercase().contains(&needle)
            || self
                .expertise
                .iter()
                .any(|e| e.to_lowercase().contains(&needle))
    }

    pub fn has_expertise(&self, tag: &str) -> bool {
        self.expertise.iter().any(|e| e.eq_ignore_ascii_case(tag))
    }

    /// Card view for listings
    pub fn summary(&self) -> MentorSummary {
        MentorSummary {
            id: self.id.clone(),
            mentor_number: self.mentor_number,
            name: self.name.clone(),
            domain: self.domain.clone(),
            expertise: self.expertise.clone(),
            experience_years: self.experience_years,
            company: self.company.clone(),
            position: self.position.clone(),
            linkedin: self.linkedin.clone(),
            bio: self.bio.clone(),
            hourly_rate: self.hourly_rate,
            availability: self.availability.clone(),
            status: self.status,
            verified: self.verified,
            total_bookings: self.total_bookings,
            rating: self.rating,
            review_count: self.reviews.len(),
            review_average: self.review_average(),
        }
    }

    /// Detail view: the card plus reviews, never the verification token
    pub fn profile(&self) -> MentorProfile {
        MentorProfile {
            summary: self.summary(),
            reviews: self.reviews.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorSummary {
    pub id: String,
    pub mentor_number: u64,
    pub name: String,
    pub domain: String,
    pub expertise: Vec<String>,
    pub experience_years: Option<u32>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linkedin: Option<String>,
    pub bio: String,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub status: MentorStatus,
    pub verified: bool,
    pub total_bookings: u64,
    pub rating: f64,
    pub review_count: usize,
    pub review_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorProfile {
    #[serde(flatten)]
    pub summary: MentorSummary,
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
}
