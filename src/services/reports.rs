//! Weekly booking analytics

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use super::AppState;
use crate::error::{ErrorExt, Result};
use crate::models::{Booking, BookingStatus};
use crate::storage::BookingFilter;

const WINDOW_DAYS: i64 = 7;
const TOP_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorBookingCount {
    pub rank: usize,
    pub mentor_id: String,
    pub mentor_name: String,
    pub bookings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub generated_at: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total_bookings: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub top_mentors: Vec<MentorBookingCount>,
    pub mentors: Vec<MentorBookingCount>,
}

impl WeeklyReport {
    /// Aggregate `bookings` created in the 7 days ending at `now`
    pub fn build(bookings: &[Booking], now: DateTime<Utc>) -> Self {
        let period_start = now - Duration::days(WINDOW_DAYS);
        let in_window: Vec<&Booking> = bookings
            .iter()
            .filter(|b| b.created_at >= period_start && b.created_at <= now)
            .collect();

        let mut status_counts: BTreeMap<String, usize> = BookingStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        let mut per_mentor: HashMap<&str, (&str, usize)> = HashMap::new();
        for booking in &in_window {
            *status_counts
                .entry(booking.status.as_str().to_string())
                .or_default() += 1;
            per_mentor
                .entry(booking.mentor_id.as_str())
                .or_insert((booking.mentor_name.as_str(), 0))
                .1 += 1;
        }

        let mut ranked: Vec<(&str, &str, usize)> = per_mentor
            .into_iter()
            .map(|(id, (name, count))| (id, name, count))
            .collect();
        ranked.sort_by(|a, b| {
            b.2.cmp(&a.2)
                .then_with(|| a.1.to_lowercase().cmp(&b.1.to_lowercase()))
                .then_with(|| a.0.cmp(b.0))
        });

        let mentors: Vec<MentorBookingCount> = ranked
            .into_iter()
            .enumerate()
            .map(|(i, (id, name, count))| MentorBookingCount {
                rank: i + 1,
                mentor_id: id.to_string(),
                mentor_name: name.to_string(),
                bookings: count,
            })
            .collect();

        Self {
            generated_at: now,
            period_start,
            period_end: now,
            total_bookings: in_window.len(),
            status_counts,
            top_mentors: mentors.iter().take(TOP_COUNT).cloned().collect(),
            mentors,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).to_internal("Failed to serialize weekly report")
    }

    /// File name for the downloadable artifact
    pub fn file_name(&self) -> String {
        format!(
            "weekly-report-{}.json",
            self.period_end.format("%Y-%m-%d")
        )
    }
}

pub struct ReportService<'a> {
    state: &'a AppState,
}

impl<'a> ReportService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn weekly(&self) -> Result<WeeklyReport> {
        let now = Utc::now();
        let bookings = self
            .state
            .storage
            .bookings()
            .list(BookingFilter {
                created_after: Some(now - Duration::days(WINDOW_DAYS)),
                created_before: Some(now),
                ..Default::default()
            })
            .await?;
        Ok(WeeklyReport::build(&bookings, now))
    }

    /// Build the report and mail it to the admin. Returns whether the mail
    /// went out; the report is returned either way.
    pub async fn send_weekly(&self) -> Result<(WeeklyReport, bool)> {
        let report = self.weekly().await?;
        let sent = self.state.notify(|t| t.weekly_report(&report)).await;
        info!(
            "Weekly report: {} bookings across {} mentors (mailed: {})",
            report.total_bookings,
            report.mentors.len(),
            sent
        );
        Ok((report, sent))
    }
}
