//! Idea analyses and their draft/completed/archived/deleted lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{ErrorCode, MarketplaceError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    #[default]
    Draft,
    Completed,
    Archived,
    Deleted,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Completed => "completed",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
    Connections,
}

/// Structured evaluation produced by the analysis provider.
///
/// Well-known sections are typed; anything else the provider returns is kept
/// verbatim in `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub overall_score: Option<f64>,
    pub summary: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl AnalysisReport {
    /// Scores are percentages
    pub fn validate(&self) -> Result<()> {
        match self.overall_score {
            Some(score) if !(0.0..=100.0).contains(&score) => Err(
                crate::error::common::out_of_range(
                    "overallScore",
                    "Overall score must be between 0 and 100",
                ),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInteraction {
    pub view_count: u64,
    pub last_viewed: Option<DateTime<Utc>>,
    pub is_bookmarked: bool,
    pub rating: Option<u8>,
    pub share_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaAnalysis {
    pub id: String,
    pub user_uid: String,
    pub user_email: String,
    pub idea_name: String,
    pub idea_description: String,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub analysis: Option<AnalysisReport>,
    pub status: IdeaStatus,
    pub visibility: Visibility,
    #[serde(default)]
    pub user_interaction: UserInteraction,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewIdea {
    pub idea_name: String,
    pub idea_description: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub visibility: Visibility,
}

impl IdeaAnalysis {
    /// A fresh draft with no analysis attached
    pub fn draft(
        user_uid: impl Into<String>,
        user_email: impl Into<String>,
        fields: NewIdea,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_uid: user_uid.into(),
            user_email: user_email.into(),
            idea_name: fields.idea_name,
            idea_description: fields.idea_description,
            category: fields.category,
            tags: fields.tags,
            analysis: None,
            status: IdeaStatus::Draft,
            visibility: fields.visibility,
            user_interaction: UserInteraction::default(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == IdeaStatus::Deleted
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public && self.status == IdeaStatus::Completed
    }

    /// Attach a report. Returns true when this call moved the idea out of draft.
    pub fn attach_analysis(&mut self, report: AnalysisReport, now: DateTime<Utc>) -> Result<bool> {
        match self.status {
            IdeaStatus::Draft | IdeaStatus::Completed => {}
            other => {
                return Err(invalid_state(format!(
                    "Cannot attach analysis to a {} idea",
                    other.as_str()
                )))
            }
        }

        report.validate()?;
        let newly_completed = self.status == IdeaStatus::Draft;
        self.analysis = Some(report);
        self.status = IdeaStatus::Completed;
        if newly_completed {
            self.completed_at = Some(now);
        }
        self.touch(now);
        Ok(newly_completed)
    }

    pub fn archive(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.status != IdeaStatus::Completed {
            return Err(invalid_state(format!(
                "Only completed ideas can be archived (current: {})",
                self.status.as_str()
            )));
        }
        self.status = IdeaStatus::Archived;
        self.touch(now);
        Ok(())
    }

    /// Soft delete; the record stays addressable by id
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        if !self.is_deleted() {
            self.status = IdeaStatus::Deleted;
            self.touch(now);
        }
    }

    pub fn record_view(&mut self, now: DateTime<Utc>) {
        self.user_interaction.view_count += 1;
        self.user_interaction.last_viewed = Some(now);
    }

    pub fn set_bookmarked(&mut self, bookmarked: bool, now: DateTime<Utc>) {
        self.user_interaction.is_bookmarked = bookmarked;
        self.touch(now);
    }

    pub fn rate(&mut self, rating: u8, now: DateTime<Utc>) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(crate::error::common::out_of_range(
                "rating",
                "Rating must be between 1 and 5",
            ));
        }
        self.user_interaction.rating = Some(rating);
        self.touch(now);
        Ok(())
    }

    pub fn record_share(&mut self, now: DateTime<Utc>) {
        self.user_interaction.share_count += 1;
        self.touch(now);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Case-insensitive match against name, description and tags
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.idea_name.to_lowercase().contains(&needle)
            || self.idea_description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    /// List view without the full analysis payload
    pub fn summary(&self) -> IdeaSummary {
        IdeaSummary {
            id: self.id.clone(),
            idea_name: self.idea_name.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            status: self.status,
            visibility: self.visibility,
            overall_score: self.analysis.as_ref().and_then(|a| a.overall_score),
            view_count: self.user_interaction.view_count,
            is_bookmarked: self.user_interaction.is_bookmarked,
            created_at: self.created_at,
        }
    }
}

fn invalid_state(message: String) -> MarketplaceError {
    MarketplaceError::validation_with_code(ErrorCode::VALIDATION_INVALID_STATE, message, None)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaSummary {
    pub id: String,
    pub idea_name: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub status: IdeaStatus,
    pub visibility: Visibility,
    pub overall_score: Option<f64>,
    pub view_count: u64,
    pub is_bookmarked: bool,
    pub created_at: DateTime<Utc>,
}
