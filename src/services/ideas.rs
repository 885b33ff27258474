//! Idea analyses: drafts, attached reports, interactions and discovery

use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::{non_blank, require, AppState};
use crate::error::{common, ErrorCode, MarketplaceError, Result};
use crate::models::{AnalysisReport, IdeaAnalysis, IdeaStatus, IdeaSummary, NewIdea, Visibility};
use crate::storage::IdeaFilter;

const DEFAULT_TRENDING_DAYS: i64 = 30;
const MAX_TRENDING_DAYS: i64 = 365;
const DEFAULT_TRENDING_LIMIT: usize = 10;
const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdeaRequest {
    pub idea_name: String,
    pub idea_description: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub visibility: Visibility,
    /// A report computed elsewhere; completes the idea on creation
    pub analysis: Option<AnalysisReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionAction {
    Bookmark,
    Unbookmark,
    Rate,
    Share,
    Archive,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionRequest {
    pub action: InteractionAction,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdeaQuery {
    pub status: Option<IdeaStatus>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublicSearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrendingQuery {
    pub days: Option<i64>,
    pub limit: Option<usize>,
}

fn ensure_owner(idea: &IdeaAnalysis, uid: &str) -> Result<()> {
    if idea.user_uid != uid {
        return Err(MarketplaceError::forbidden(format!(
            "Idea analysis '{}' belongs to another user",
            idea.id
        )));
    }
    Ok(())
}

fn ensure_not_deleted(idea: &IdeaAnalysis) -> Result<()> {
    if idea.is_deleted() {
        return Err(MarketplaceError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_STATE,
            format!("Idea analysis '{}' has been deleted", idea.id),
            None,
        ));
    }
    Ok(())
}

fn clamp_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

pub struct IdeaService<'a> {
    state: &'a AppState,
}

impl<'a> IdeaService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn create(&self, uid: &str, email: &str, request: IdeaRequest) -> Result<IdeaAnalysis> {
        let fields = NewIdea {
            idea_name: require("ideaName", &request.idea_name)?,
            idea_description: require("ideaDescription", &request.idea_description)?,
            category: non_blank(request.category),
            tags: request
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            visibility: request.visibility,
        };

        let now = Utc::now();
        let mut idea = IdeaAnalysis::draft(uid, email, fields, now);
        let completed = match request.analysis {
            Some(report) => idea.attach_analysis(report, now)?,
            None => false,
        };

        self.state.storage.ideas().save(&idea).await?;
        info!("Idea analysis {} created by {}", idea.id, uid);

        if completed {
            self.count_analysis_for_user(uid).await;
        }
        Ok(idea)
    }

    async fn load(&self, id: &str) -> Result<IdeaAnalysis> {
        self.state
            .storage
            .ideas()
            .get(id)
            .await?
            .ok_or_else(|| common::idea_not_found(id))
    }

    async fn load_owned(&self, uid: &str, id: &str) -> Result<IdeaAnalysis> {
        let idea = self.load(id).await?;
        ensure_owner(&idea, uid)?;
        Ok(idea)
    }

    /// Fetch by id, counting the view. Owners see their own ideas in any
    /// state, everyone else only public completed ones.
    pub async fn get_with_view(&self, uid: &str, id: &str) -> Result<IdeaAnalysis> {
        let mut idea = self.load(id).await?;
        if idea.user_uid != uid && !idea.is_public() {
            return Err(MarketplaceError::forbidden(format!(
                "Idea analysis '{}' is not shared",
                id
            )));
        }

        idea.record_view(Utc::now());
        self.state.storage.ideas().save(&idea).await?;
        Ok(idea)
    }

    /// Store a report. The owner's analysed-ideas counter moves only on the
    /// first completion.
    pub async fn attach_analysis(
        &self,
        uid: &str,
        id: &str,
        report: AnalysisReport,
    ) -> Result<IdeaAnalysis> {
        let mut idea = self.load_owned(uid, id).await?;
        let newly_completed = idea.attach_analysis(report, Utc::now())?;
        self.state.storage.ideas().save(&idea).await?;

        if newly_completed {
            info!("Idea analysis {} completed", idea.id);
            self.count_analysis_for_user(uid).await;
        }
        Ok(idea)
    }

    /// Run the configured analyzer and attach its report
    pub async fn analyze(&self, uid: &str, id: &str) -> Result<IdeaAnalysis> {
        let analyzer = self.state.analyzer.clone().ok_or_else(|| {
            MarketplaceError::validation_with_code(
                ErrorCode::VALIDATION_INVALID_STATE,
                "Server-side analysis is not configured",
                None,
            )
        })?;

        let idea = self.load_owned(uid, id).await?;
        ensure_not_deleted(&idea)?;
        let report = analyzer.analyze(&idea).await?;
        self.attach_analysis(uid, id, report).await
    }

    pub async fn interact(
        &self,
        uid: &str,
        id: &str,
        request: InteractionRequest,
    ) -> Result<IdeaAnalysis> {
        let mut idea = self.load_owned(uid, id).await?;
        ensure_not_deleted(&idea)?;
        let now = Utc::now();

        match request.action {
            InteractionAction::Bookmark => idea.set_bookmarked(true, now),
            InteractionAction::Unbookmark => idea.set_bookmarked(false, now),
            InteractionAction::Share => idea.record_share(now),
            InteractionAction::Rate => {
                let rating = request
                    .rating
                    .ok_or_else(|| common::required_field("rating"))?;
                idea.rate(rating, now)?;
            }
            InteractionAction::Archive => idea.archive(now)?,
        }

        self.state.storage.ideas().save(&idea).await?;
        Ok(idea)
    }

    /// Soft delete. Deleting twice is not an error.
    pub async fn delete(&self, uid: &str, id: &str) -> Result<()> {
        let mut idea = self.load_owned(uid, id).await?;
        if !idea.is_deleted() {
            idea.soft_delete(Utc::now());
            self.state.storage.ideas().save(&idea).await?;
            info!("Idea analysis {} deleted", idea.id);
        }
        Ok(())
    }

    /// The caller's own non-deleted ideas
    pub async fn list(&self, uid: &str, query: IdeaQuery) -> Result<Vec<IdeaSummary>> {
        let filter = IdeaFilter {
            user_uid: Some(uid.to_string()),
            status: query.status,
            category: non_blank(query.category),
            query: non_blank(query.q),
            skip: query.skip.unwrap_or(0),
            limit: query.limit,
            ..Default::default()
        };
        let ideas = self.state.storage.ideas().list(filter).await?;
        Ok(ideas.iter().map(IdeaAnalysis::summary).collect())
    }

    pub async fn public_search(&self, query: PublicSearchQuery) -> Result<Vec<IdeaSummary>> {
        let filter = IdeaFilter {
            status: Some(IdeaStatus::Completed),
            visibility: Some(Visibility::Public),
            category: non_blank(query.category),
            query: non_blank(query.q),
            limit: Some(clamp_limit(query.limit, DEFAULT_SEARCH_LIMIT)),
            ..Default::default()
        };
        let ideas = self.state.storage.ideas().list(filter).await?;
        Ok(ideas.iter().map(IdeaAnalysis::summary).collect())
    }

    /// Public completed ideas from the last `days`, most viewed first
    pub async fn trending(&self, query: TrendingQuery) -> Result<Vec<IdeaSummary>> {
        let days = query.days.unwrap_or(DEFAULT_TRENDING_DAYS);
        if !(1..=MAX_TRENDING_DAYS).contains(&days) {
            return Err(common::out_of_range(
                "days",
                format!("days must be between 1 and {}", MAX_TRENDING_DAYS),
            ));
        }
        let limit = clamp_limit(query.limit, DEFAULT_TRENDING_LIMIT);

        let filter = IdeaFilter {
            status: Some(IdeaStatus::Completed),
            visibility: Some(Visibility::Public),
            created_after: Some(Utc::now() - Duration::days(days)),
            ..Default::default()
        };
        let mut ideas = self.state.storage.ideas().list(filter).await?;
        ideas.sort_by(|a, b| {
            b.user_interaction
                .view_count
                .cmp(&a.user_interaction.view_count)
                .then(b.created_at.cmp(&a.created_at))
        });
        ideas.truncate(limit);
        Ok(ideas.iter().map(IdeaAnalysis::summary).collect())
    }

    async fn count_analysis_for_user(&self, uid: &str) {
        let users = self.state.storage.users();
        match users.get(uid).await {
            Ok(Some(mut user)) => {
                user.activity.ideas_analyzed += 1;
                user.record_activity(Utc::now());
                if let Err(e) = users.save(&user).await {
                    warn!("Could not update analysis count for {}: {}", uid, e);
                }
            }
            Ok(None) => warn!("Idea owner {} has no user record", uid),
            Err(e) => warn!("Could not load user {}: {}", uid, e),
        }
    }
}
