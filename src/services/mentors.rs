//! Mentor applications, verification and directory

use chrono::Utc;
use rand::RngCore;
use serde::Deserialize;
use tracing::{debug, info};

use super::{non_blank, require, require_email, AppState};
use crate::error::{common, ErrorCode, MarketplaceError, Result};
use crate::models::{Mentor, MentorStatus, MentorSummary, NewMentor};
use crate::storage::{MentorFilter, StorageError};

/// Application form as submitted by a prospective mentor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MentorApplication {
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

/// Partial update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MentorPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub domain: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub experience_years: Option<u32>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub linkedin: Option<String>,
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
    pub status: Option<MentorStatus>,
}

/// Directory query. `status` is `pending`, `approved`, `rejected` or `all`;
/// approved mentors are listed when it is absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MentorQuery {
    pub status: Option<String>,
    pub domain: Option<String>,
    pub expertise: Option<String>,
    pub q: Option<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl MentorQuery {
    fn into_filter(self) -> Result<MentorFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => Some(MentorStatus::Approved),
            Some(s) if s.eq_ignore_ascii_case("all") => None,
            Some(s) => Some(parse_status(s)?),
        };
        Ok(MentorFilter {
            status,
            domain: non_blank(self.domain),
            expertise: non_blank(self.expertise),
            query: non_blank(self.q),
            skip: self.skip.unwrap_or(0),
            limit: self.limit,
        })
    }
}

fn parse_status(value: &str) -> Result<MentorStatus> {
    match value.to_ascii_lowercase().as_str() {
        "pending" => Ok(MentorStatus::Pending),
        "approved" => Ok(MentorStatus::Approved),
        "rejected" => Ok(MentorStatus::Rejected),
        other => Err(common::invalid_format(
            "status",
            format!("Unknown mentor status '{}'", other),
        )),
    }
}

fn check_rate(rate: Option<f64>) -> Result<()> {
    match rate {
        Some(r) if !r.is_finite() || r < 0.0 => Err(common::out_of_range(
            "hourlyRate",
            "Hourly rate must be a non-negative number",
        )),
        _ => Ok(()),
    }
}

/// Hex encoding of `bytes` random bytes from the thread CSPRNG
fn generate_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    buf.iter().map(|b| format!("{:02x}", b)).collect()
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub struct MentorService<'a> {
    state: &'a AppState,
}

impl<'a> MentorService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Store a pending application and mail the admin a verification link
    pub async fn submit_application(&self, application: MentorApplication) -> Result<Mentor> {
        let fields = NewMentor {
            name: require("name", &application.name)?,
            email: require_email("email", &application.email)?,
            phone: non_blank(application.phone),
            domain: require("domain", &application.domain)?,
            expertise: clean_tags(application.expertise),
            experience_years: application.experience_years,
            company: non_blank(application.company),
            position: non_blank(application.position),
            linkedin: non_blank(application.linkedin),
            bio: require("bio", &application.bio)?,
            hourly_rate: application.hourly_rate,
            availability: non_blank(application.availability),
        };
        check_rate(fields.hourly_rate)?;

        let token = generate_token(self.state.config.verification.token_bytes);
        let email = fields.email.clone();
        // The store assigns the mentor number
        let application = Mentor::from_application(fields, 0, token.clone(), Utc::now());

        let mentor = self
            .state
            .storage
            .mentors()
            .insert(application)
            .await
            .map_err(|e| match e {
                StorageError::Duplicate { field: "email", .. } => {
                    MarketplaceError::validation_with_code(
                        ErrorCode::VALIDATION_DUPLICATE_VALUE,
                        format!("A mentor with email {} has already applied", email),
                        Some("email".to_string()),
                    )
                }
                other => other.into(),
            })?;

        info!(
            "Mentor application {} (#{}) received from {}",
            mentor.id, mentor.mentor_number, mentor.email
        );

        let link = self.state.config.verification_link(&token);
        self.state
            .notify(|t| t.mentor_application_admin(&mentor, &link))
            .await;
        self.state
            .notify(|t| t.mentor_application_received(&mentor))
            .await;

        Ok(mentor)
    }

    /// Redeem a verification token. Tokens work exactly once.
    pub async fn verify(&self, token: &str) -> Result<Mentor> {
        let store = self.state.storage.mentors();
        let mut mentor = store
            .find_by_token(token)
            .await?
            .ok_or_else(common::invalid_token)?;

        mentor.mark_verified(Utc::now());
        store.save(&mentor).await?;
        info!("Mentor {} verified and approved", mentor.id);

        self.state.notify(|t| t.mentor_approved(&mentor)).await;
        Ok(mentor)
    }

    pub async fn list(&self, query: MentorQuery) -> Result<Vec<MentorSummary>> {
        let filter = query.into_filter()?;
        let mentors = self.state.storage.mentors().list(filter).await?;
        Ok(mentors.iter().map(Mentor::summary).collect())
    }

    /// Look up by id, falling back to the numeric mentor number
    pub async fn resolve(&self, mentor_ref: &str) -> Result<Mentor> {
        let store = self.state.storage.mentors();
        if let Some(mentor) = store.get(mentor_ref).await? {
            return Ok(mentor);
        }

        if let Ok(number) = mentor_ref.trim().parse::<u64>() {
            debug!("Mentor {} not found by id, trying mentor number", mentor_ref);
            if let Some(mentor) = store.get_by_number(number).await? {
                return Ok(mentor);
            }
        }

        Err(common::mentor_not_found(mentor_ref))
    }

    pub async fn update(&self, mentor_ref: &str, patch: MentorPatch) -> Result<Mentor> {
        let mut mentor = self.resolve(mentor_ref).await?;

        if let Some(name) = patch.name {
            mentor.name = require("name", &name)?;
        }
        if let Some(email) = patch.email {
            mentor.email = require_email("email", &email)?;
        }
        if let Some(domain) = patch.domain {
            mentor.domain = require("domain", &domain)?;
        }
        if let Some(bio) = patch.bio {
            mentor.bio = require("bio", &bio)?;
        }
        if let Some(expertise) = patch.expertise {
            mentor.expertise = clean_tags(expertise);
        }
        if patch.hourly_rate.is_some() {
            check_rate(patch.hourly_rate)?;
            mentor.hourly_rate = patch.hourly_rate;
        }
        if patch.experience_years.is_some() {
            mentor.experience_years = patch.experience_years;
        }
        if patch.phone.is_some() {
            mentor.phone = non_blank(patch.phone);
        }
        if patch.company.is_some() {
            mentor.company = non_blank(patch.company);
        }
        if patch.position.is_some() {
            mentor.position = non_blank(patch.position);
        }
        if patch.linkedin.is_some() {
            mentor.linkedin = non_blank(patch.linkedin);
        }
        if patch.availability.is_some() {
            mentor.availability = non_blank(patch.availability);
        }
        if let Some(status) = patch.status {
            mentor.status = status;
        }

        mentor.touch(Utc::now());
        self.state.storage.mentors().save(&mentor).await?;
        info!("Mentor {} updated", mentor.id);
        Ok(mentor)
    }

    pub async fn delete(&self, mentor_ref: &str) -> Result<()> {
        let mentor = self.resolve(mentor_ref).await?;
        if !self.state.storage.mentors().delete(&mentor.id).await? {
            return Err(common::mentor_not_found(mentor_ref));
        }
        info!("Mentor {} deleted", mentor.id);
        Ok(())
    }
}
