//! Founder accounts, created lazily from identity headers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl UserProfile {
    /// Share of optional profile fields that are filled in, 0..=100
    pub fn completeness(&self) -> u8 {
        let filled = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false)
        };
        let checks = [
            filled(&self.display_name),
            filled(&self.photo_url),
            filled(&self.bio),
            filled(&self.company),
            filled(&self.role),
            filled(&self.location),
            filled(&self.website),
            !self.skills.is_empty(),
            !self.interests.is_empty(),
        ];
        let done = checks.iter().filter(|c| **c).count();
        ((done * 100) / checks.len()) as u8
    }

    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        let field_matches = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| v.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };
        field_matches(&self.display_name)
            || field_matches(&self.company)
            || field_matches(&self.role)
            || self
                .skills
                .iter()
                .any(|s| s.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub last_login: Option<DateTime<Utc>>,
    pub total_logins: u64,
    pub ideas_analyzed: u64,
    pub sessions_booked: u64,
    pub last_active: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub activity: UserActivity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// First sighting of an identity counts as its first login
    pub fn new(uid: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            profile: UserProfile::default(),
            activity: UserActivity {
                last_login: Some(now),
                total_logins: 1,
                last_active: Some(now),
                ..Default::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.activity.last_login = Some(now);
        self.activity.total_logins += 1;
        self.record_activity(now);
    }

    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        self.activity.last_active = Some(now);
        self.touch(now);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Public listing view
    pub fn public_card(&self) -> UserCard {
        UserCard {
            uid: self.uid.clone(),
            display_name: self.profile.display_name.clone(),
            photo_url: self.profile.photo_url.clone(),
            company: self.profile.company.clone(),
            role: self.profile.role.clone(),
            skills: self.profile.skills.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub skills: Vec<String>,
}
