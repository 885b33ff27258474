//! Mail transports

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

use super::{MailError, Mailer, OutgoingEmail};

/// Writes messages to the log instead of delivering them
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        info!(
            from = %self.from,
            to = %email.to,
            subject = %email.subject,
            bytes = email.html.len(),
            "Email (log transport)"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Delivers through an HTTP mail relay accepting JSON
/// `{from, to, subject, html}` with an optional bearer key
pub struct HttpRelayMailer {
    client: reqwest::Client,
    relay_url: String,
    from: String,
    api_key: Option<String>,
}

impl HttpRelayMailer {
    pub fn new(
        relay_url: String,
        from: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            relay_url,
            from,
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let body = json!({
            "from": self.from,
            "to": email.to,
            "subject": email.subject,
            "html": email.html,
        });

        let mut request = self.client.post(&self.relay_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Keeps sent messages in memory; optionally fails every send
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send returns a transport error
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_to(&self, address: &str) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|e| e.to.eq_ignore_ascii_case(address))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("memory mailer set to fail".to_string()));
        }
        self.sent.lock().await.push(email.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
