//! Filter and status types for the storage abstraction layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Booking, BookingStatus, IdeaAnalysis, IdeaStatus, Mentor, MentorStatus, User, Visibility,
};

/// Mentor filter criteria
#[derive(Debug, Default, Clone)]
pub struct MentorFilter {
    pub status: Option<MentorStatus>,
    pub domain: Option<String>,
    pub expertise: Option<String>,
    pub query: Option<String>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl MentorFilter {
    pub fn matches(&self, mentor: &Mentor) -> bool {
        if let Some(status) = self.status {
            if mentor.status != status {
                return false;
            }
        }
        if let Some(ref domain) = self.domain {
            if !mentor.domain.eq_ignore_ascii_case(domain) {
                return false;
            }
        }
        if let Some(ref tag) = self.expertise {
            if !mentor.has_expertise(tag) {
                return false;
            }
        }
        if let Some(ref query) = self.query {
            if !mentor.matches_query(query) {
                return false;
            }
        }
        true
    }
}

/// Booking filter criteria
#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub mentor_id: Option<String>,
    pub mentee_email: Option<String>,
    pub status: Option<BookingStatus>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(ref mentor_id) = self.mentor_id {
            if booking.mentor_id != *mentor_id {
                return false;
            }
        }
        if let Some(ref email) = self.mentee_email {
            if !booking.mentee.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if booking.status != status {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if booking.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if booking.created_at > before {
                return false;
            }
        }
        true
    }
}

/// Idea analysis filter criteria
#[derive(Debug, Default, Clone)]
pub struct IdeaFilter {
    pub user_uid: Option<String>,
    pub status: Option<IdeaStatus>,
    /// Soft-deleted records are hidden unless this is set
    pub include_deleted: bool,
    pub visibility: Option<Visibility>,
    pub category: Option<String>,
    pub query: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl IdeaFilter {
    pub fn matches(&self, idea: &IdeaAnalysis) -> bool {
        if idea.is_deleted() && !self.include_deleted {
            return false;
        }
        if let Some(ref uid) = self.user_uid {
            if idea.user_uid != *uid {
                return false;
            }
        }
        if let Some(status) = self.status {
            if idea.status != status {
                return false;
            }
        }
        if let Some(visibility) = self.visibility {
            if idea.visibility != visibility {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            let same = idea
                .category
                .as_deref()
                .map(|c| c.eq_ignore_ascii_case(category))
                .unwrap_or(false);
            if !same {
                return false;
            }
        }
        if let Some(ref query) = self.query {
            if !idea.matches_query(query) {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if idea.created_at < after {
                return false;
            }
        }
        true
    }
}

/// User filter criteria
#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub query: Option<String>,
    pub public_only: bool,
    pub limit: Option<usize>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if self.public_only && !user.profile.is_public {
            return false;
        }
        if let Some(ref query) = self.query {
            if !user.profile.matches_query(query) {
                return false;
            }
        }
        true
    }
}

/// Newest first, then skip/limit
pub(crate) fn page<T, F>(mut items: Vec<T>, created_at: F, skip: usize, limit: Option<usize>) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    let iter = items.into_iter().skip(skip);
    match limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}

/// Health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub backend_type: String,
    pub latency_ms: u64,
    pub errors: Vec<String>,
}
