//! Marketplace operations
//!
//! Each service borrows the shared [`AppState`] and performs its work as a
//! sequence of independent store calls. Notifications are sent after the
//! write they describe and never undo it.

use std::sync::Arc;
use tracing::info;

use crate::analysis::{analyzer_from_config, IdeaAnalyzer};
use crate::config::AppConfig;
use crate::error::Result;
use crate::mail::{deliver_quietly, mailer_from_config, EmailTemplates, Mailer, OutgoingEmail};
use crate::storage::{StorageFactory, UnifiedStorage};

pub mod bookings;
pub mod ideas;
pub mod mentors;
pub mod reports;
pub mod users;

pub use bookings::BookingService;
pub use ideas::IdeaService;
pub use mentors::MentorService;
pub use reports::{ReportService, WeeklyReport};
pub use users::UserService;

/// Everything a request handler needs, cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn UnifiedStorage>,
    pub mailer: Arc<dyn Mailer>,
    pub templates: Arc<EmailTemplates>,
    pub analyzer: Option<Arc<dyn IdeaAnalyzer>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn UnifiedStorage>,
        mailer: Arc<dyn Mailer>,
        analyzer: Option<Arc<dyn IdeaAnalyzer>>,
    ) -> Result<Self> {
        let templates = EmailTemplates::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            storage,
            mailer,
            templates: Arc::new(templates),
            analyzer,
        })
    }

    /// Wire storage, mail and analysis from configuration
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let storage = StorageFactory::from_config(&config.storage).await?;
        let mailer = mailer_from_config(&config.mail)?;
        let analyzer = analyzer_from_config(&config.analysis)?;

        info!(
            "Using {:?} storage, {} mail transport, analysis {}",
            config.storage.backend,
            mailer.name(),
            if analyzer.is_some() { "enabled" } else { "disabled" }
        );

        Self::new(config, storage, mailer, analyzer)
    }

    pub fn mentors(&self) -> MentorService<'_> {
        MentorService::new(self)
    }

    pub fn bookings(&self) -> BookingService<'_> {
        BookingService::new(self)
    }

    pub fn ideas(&self) -> IdeaService<'_> {
        IdeaService::new(self)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn reports(&self) -> ReportService<'_> {
        ReportService::new(self)
    }

    /// Render with `build` and send; failures at either step are logged
    pub(crate) async fn notify<F>(&self, build: F) -> bool
    where
        F: FnOnce(&EmailTemplates) -> std::result::Result<OutgoingEmail, crate::mail::MailError>,
    {
        match build(&self.templates) {
            Ok(email) => deliver_quietly(self.mailer.as_ref(), email).await,
            Err(e) => {
                tracing::warn!("Failed to render email: {}", e);
                false
            }
        }
    }
}

/// Trimmed value, or a required-field error when blank
pub(crate) fn require(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::common::required_field(field));
    }
    Ok(trimmed.to_string())
}

/// Minimal address check: something on both sides of a single `@`
pub(crate) fn require_email(field: &str, value: &str) -> Result<String> {
    let email = require(field, value)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(crate::error::common::invalid_format(
            field,
            format!("'{}' is not a valid email address", email),
        ));
    }
    Ok(email)
}

/// Blank optional strings collapse to `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::mail::MemoryMailer;
    use crate::storage::backends::MemoryBackend;

    /// State over a memory backend, returning the mailer for inspection
    pub fn state_with(mailer: MemoryMailer, analyzer: Option<Arc<dyn IdeaAnalyzer>>) -> AppState {
        let mut config = AppConfig::default();
        config.mail.admin_email = "admin@example.com".to_string();
        config.server.public_base_url = "https://mentors.test".to_string();
        AppState::new(
            config,
            Arc::new(MemoryBackend::new()),
            Arc::new(mailer),
            analyzer,
        )
        .unwrap()
    }

    pub fn state() -> (AppState, MemoryMailer) {
        let mailer = MemoryMailer::new();
        (state_with(mailer.clone(), None), mailer)
    }
}
