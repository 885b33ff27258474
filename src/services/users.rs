//! Founder accounts keyed by the identity headers

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::ideas::IdeaQuery;
use super::{non_blank, AppState};
use crate::error::{common, Result};
use crate::models::{IdeaStatus, IdeaSummary, User, UserActivity, UserCard};
use crate::storage::{IdeaFilter, UserFilter};

const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Partial profile update; absent fields are left alone, blank strings clear
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserSearchQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: User,
    pub profile_completeness: u8,
}

impl From<User> for ProfileView {
    fn from(user: User) -> Self {
        let profile_completeness = user.profile.completeness();
        Self {
            user,
            profile_completeness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_ideas: usize,
    pub ideas_by_status: BTreeMap<String, usize>,
    pub bookmarked_ideas: usize,
    pub total_views: u64,
    pub activity: UserActivity,
    pub profile_completeness: u8,
}

fn set_text(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = non_blank(value);
    }
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub struct UserService<'a> {
    state: &'a AppState,
}

impl<'a> UserService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Load the user for `uid`, creating it on first sight
    pub async fn ensure_user(&self, uid: &str, email: &str) -> Result<User> {
        Ok(self.find_or_create(uid, email).await?.0)
    }

    /// Like `ensure_user`, also reporting whether this call created the user
    pub async fn find_or_create(&self, uid: &str, email: &str) -> Result<(User, bool)> {
        let users = self.state.storage.users();
        if let Some(user) = users.get(uid).await? {
            return Ok((user, false));
        }

        let user = User::new(uid, email.trim(), Utc::now());
        match users.insert(&user).await {
            Ok(()) => {
                info!("Created user {} for {}", user.uid, user.email);
                Ok((user, true))
            }
            Err(e) if e.is_conflict() => {
                // A concurrent request may have created it first
                debug!("User {} insert raced: {}", uid, e);
                match users.get(uid).await? {
                    Some(existing) => Ok((existing, false)),
                    None => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Count a login. Creating a user already counts its first login, so
    /// nothing is added when the user was created by this same request
    /// (`first_seen`) or by this call.
    pub async fn record_login(
        &self,
        uid: &str,
        email: &str,
        first_seen: bool,
    ) -> Result<ProfileView> {
        let (mut user, created) = self.find_or_create(uid, email).await?;
        if created || first_seen {
            return Ok(user.into());
        }
        user.record_login(Utc::now());
        self.state.storage.users().save(&user).await?;
        debug!("User {} login #{}", uid, user.activity.total_logins);
        Ok(user.into())
    }

    async fn load(&self, uid: &str) -> Result<User> {
        self.state
            .storage
            .users()
            .get(uid)
            .await?
            .ok_or_else(|| common::user_not_found(uid))
    }

    pub async fn profile(&self, uid: &str) -> Result<ProfileView> {
        Ok(self.load(uid).await?.into())
    }

    pub async fn update_profile(&self, uid: &str, patch: ProfilePatch) -> Result<ProfileView> {
        let mut user = self.load(uid).await?;
        let profile = &mut user.profile;

        set_text(&mut profile.display_name, patch.display_name);
        set_text(&mut profile.photo_url, patch.photo_url);
        set_text(&mut profile.bio, patch.bio);
        set_text(&mut profile.company, patch.company);
        set_text(&mut profile.role, patch.role);
        set_text(&mut profile.location, patch.location);
        set_text(&mut profile.website, patch.website);
        if let Some(skills) = patch.skills {
            profile.skills = clean_list(skills);
        }
        if let Some(interests) = patch.interests {
            profile.interests = clean_list(interests);
        }
        if let Some(is_public) = patch.is_public {
            profile.is_public = is_public;
        }

        user.record_activity(Utc::now());
        self.state.storage.users().save(&user).await?;
        info!("Profile updated for {}", uid);
        Ok(user.into())
    }

    pub async fn user_ideas(&self, uid: &str, query: IdeaQuery) -> Result<Vec<IdeaSummary>> {
        self.state.ideas().list(uid, query).await
    }

    pub async fn stats(&self, uid: &str) -> Result<UserStats> {
        let user = self.load(uid).await?;
        let ideas = self
            .state
            .storage
            .ideas()
            .list(IdeaFilter {
                user_uid: Some(uid.to_string()),
                ..Default::default()
            })
            .await?;

        let mut ideas_by_status: BTreeMap<String, usize> = [
            IdeaStatus::Draft,
            IdeaStatus::Completed,
            IdeaStatus::Archived,
        ]
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
        for idea in &ideas {
            *ideas_by_status
                .entry(idea.status.as_str().to_string())
                .or_default() += 1;
        }

        Ok(UserStats {
            total_ideas: ideas.len(),
            ideas_by_status,
            bookmarked_ideas: ideas
                .iter()
                .filter(|i| i.user_interaction.is_bookmarked)
                .count(),
            total_views: ideas.iter().map(|i| i.user_interaction.view_count).sum(),
            profile_completeness: user.profile.completeness(),
            activity: user.activity,
        })
    }

    /// Public profiles matching display name, company, role or skills
    pub async fn search(&self, query: UserSearchQuery) -> Result<Vec<UserCard>> {
        let filter = UserFilter {
            query: non_blank(query.q),
            public_only: true,
            limit: Some(query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, 100)),
        };
        let users = self.state.storage.users().list(filter).await?;
        Ok(users.iter().map(User::public_card).collect())
    }
}
