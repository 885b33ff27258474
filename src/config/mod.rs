//! Application configuration
//!
//! Read from a TOML file, then overridden by `MENTORHUB_*` environment
//! variables. Every section has defaults, so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ErrorCode, MarketplaceError, Result};
use crate::storage::StorageConfig;

pub mod loader;

pub use loader::ConfigLoader;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally reachable base URL, used to build links in emails
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: default_public_base_url(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// Log rendered messages instead of sending them
    #[default]
    Log,
    /// POST messages to an HTTP mail relay
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub transport: MailTransportKind,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Recipient of verification links and booking/report notices
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    pub relay_url: Option<String>,
    pub api_key: Option<String>,
    #[serde(with = "humantime_serde", default = "default_mail_timeout")]
    pub timeout: Duration,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransportKind::default(),
            from_address: default_from_address(),
            admin_email: default_admin_email(),
            relay_url: None,
            api_key: None,
            timeout: default_mail_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Where a successful verification redirects to
    #[serde(default = "default_success_redirect")]
    pub success_redirect: String,
    /// Random bytes per token; the token is their hex encoding
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            success_redirect: default_success_redirect(),
            token_bytes: default_token_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Server-side analysis is disabled without a key
    pub api_key: Option<String>,
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_analysis_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(with = "humantime_serde", default = "default_retry_delay")]
    pub retry_delay: Duration,
    #[serde(with = "humantime_serde", default = "default_analysis_timeout")]
    pub timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_analysis_endpoint(),
            model: default_analysis_model(),
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
            retry_delay: default_retry_delay(),
            timeout: default_analysis_timeout(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_public_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_from_address() -> String {
    "MentorHub <no-reply@mentorhub.local>".to_string()
}

fn default_admin_email() -> String {
    "admin@mentorhub.local".to_string()
}

fn default_mail_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_success_redirect() -> String {
    "http://localhost:3000/mentor-verified".to_string()
}

fn default_token_bytes() -> usize {
    32
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_analysis_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_analysis_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_analysis_timeout() -> Duration {
    Duration::from_secs(60)
}

impl AppConfig {
    pub fn merge_env_vars(&mut self) {
        if let Ok(host) = std::env::var("MENTORHUB_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("MENTORHUB_PORT") {
            match port.parse::<u16>() {
                Ok(value) => self.server.port = value,
                Err(e) => tracing::warn!("Ignoring invalid MENTORHUB_PORT '{}': {}", port, e),
            }
        }

        if let Ok(url) = std::env::var("MENTORHUB_PUBLIC_URL") {
            self.server.public_base_url = url;
        }

        if let Ok(admin) = std::env::var("MENTORHUB_ADMIN_EMAIL") {
            self.mail.admin_email = admin;
        }

        if let Ok(relay) = std::env::var("MENTORHUB_MAIL_RELAY_URL") {
            self.mail.relay_url = Some(relay);
            self.mail.transport = MailTransportKind::Http;
        }

        if let Ok(key) = std::env::var("MENTORHUB_MAIL_API_KEY") {
            self.mail.api_key = Some(key);
        }

        if let Ok(key) = std::env::var("MENTORHUB_ANALYSIS_API_KEY") {
            self.analysis.api_key = Some(key);
        }

        self.storage.merge_env_vars();
    }

    /// Reject combinations the services cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.mail.transport == MailTransportKind::Http && self.mail.relay_url.is_none() {
            return Err(MarketplaceError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "mail.relay_url is required when mail.transport = \"http\"",
            ));
        }

        if self.verification.token_bytes < 16 {
            return Err(MarketplaceError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "verification.token_bytes must be at least 16",
            ));
        }

        if self.booking.currency.trim().is_empty() {
            return Err(MarketplaceError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "booking.currency must not be empty",
            ));
        }

        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Absolute URL of the verification endpoint for `token`
    pub fn verification_link(&self, token: &str) -> String {
        format!(
            "{}/mentors/verify/{}",
            self.server.public_base_url.trim_end_matches('/'),
            token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.mail.transport, MailTransportKind::Log);
        assert_eq!(config.verification.token_bytes, 32);
        assert_eq!(config.booking.currency, "USD");
        assert!(config.analysis.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_parse_durations() {
        let config: AppConfig = toml::from_str(
            r#"
[server]
port = 8080
public_base_url = "https://mentors.example.com/"

[mail]
transport = "http"
relay_url = "https://relay.example.com/send"
timeout = "3s"

[analysis]
retry_delay = "250ms"
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.mail.timeout, Duration::from_secs(3));
        assert_eq!(config.analysis.retry_delay, Duration::from_millis(250));
        assert_eq!(
            config.verification_link("abc"),
            "https://mentors.example.com/mentors/verify/abc"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_transport_requires_relay() {
        let mut config = AppConfig::default();
        config.mail.transport = MailTransportKind::Http;
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_VALUE);
    }

    #[test]
    fn test_short_tokens_rejected() {
        let mut config = AppConfig::default();
        config.verification.token_bytes = 8;
        assert!(config.validate().is_err());
    }
}
