//! Outbound email
//!
//! Messages are rendered by [`EmailTemplates`] and handed to a [`Mailer`].
//! Notification failures never undo the write that triggered them:
//! callers use [`deliver_quietly`], which logs and swallows errors.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{MailConfig, MailTransportKind};

pub mod templates;
pub mod transport;

pub use templates::EmailTemplates;
pub use transport::{HttpRelayMailer, LogMailer, MemoryMailer};

/// A rendered message ready for a transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("Mail relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;

    /// Transport name for logs
    fn name(&self) -> &'static str;
}

/// Build the transport selected in configuration
pub fn mailer_from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match config.transport {
        MailTransportKind::Log => Ok(Arc::new(LogMailer::new(&config.from_address))),
        MailTransportKind::Http => {
            let relay_url = config.relay_url.clone().ok_or_else(|| {
                MailError::Transport("relay_url is not configured".to_string())
            })?;
            Ok(Arc::new(HttpRelayMailer::new(
                relay_url,
                config.from_address.clone(),
                config.api_key.clone(),
                timeout_or_default(config.timeout),
            )?))
        }
    }
}

fn timeout_or_default(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        Duration::from_secs(10)
    } else {
        timeout
    }
}

/// Send `email`, logging instead of returning failures
pub async fn deliver_quietly(mailer: &dyn Mailer, email: OutgoingEmail) -> bool {
    match mailer.send(&email).await {
        Ok(()) => {
            debug!(
                "Sent '{}' to {} via {}",
                email.subject,
                email.to,
                mailer.name()
            );
            true
        }
        Err(e) => {
            warn!("Failed to send '{}' to {}: {}", email.subject, email.to, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OutgoingEmail {
        OutgoingEmail {
            to: "someone@example.com".to_string(),
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_deliver_quietly_swallows_failures() {
        let mailer = MemoryMailer::failing();
        assert!(!deliver_quietly(&mailer, sample()).await);
        assert!(mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_deliver_quietly_reports_success() {
        let mailer = MemoryMailer::new();
        assert!(deliver_quietly(&mailer, sample()).await);
        assert_eq!(mailer.sent().await, vec![sample()]);
    }

    #[test]
    fn test_http_transport_needs_relay_url() {
        let config = MailConfig {
            transport: MailTransportKind::Http,
            ..Default::default()
        };
        assert!(matches!(
            mailer_from_config(&config),
            Err(MailError::Transport(_))
        ));
    }

    #[test]
    fn test_log_transport_is_default() {
        let mailer = mailer_from_config(&MailConfig::default()).unwrap();
        assert_eq!(mailer.name(), "log");
    }
}
