//! Common test utilities and helpers

#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use mentorhub::analysis::IdeaAnalyzer;
use mentorhub::api::ApiServer;
use mentorhub::config::AppConfig;
use mentorhub::mail::MemoryMailer;
use mentorhub::services::AppState;
use mentorhub::storage::MemoryBackend;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const SUCCESS_REDIRECT: &str = "https://app.test/mentor-verified";

/// A running API server over memory storage, stopped on drop
pub struct TestServer {
    pub base_url: String,
    pub mailer: MemoryMailer,
    pub client: Client,
    shutdown: Option<oneshot::Sender<()>>,
}

/// Builder for [`TestServer`]
pub struct TestServerBuilder {
    mailer: MemoryMailer,
    analyzer: Option<Arc<dyn IdeaAnalyzer>>,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            mailer: MemoryMailer::new(),
            analyzer: None,
        }
    }

    /// Use a mailer whose every send fails
    pub fn with_failing_mail(mut self) -> Self {
        self.mailer = MemoryMailer::failing();
        self
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn IdeaAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub async fn start(self) -> Result<TestServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let mut config = AppConfig::default();
        config.mail.admin_email = ADMIN_EMAIL.to_string();
        config.server.public_base_url = base_url.clone();
        config.verification.success_redirect = SUCCESS_REDIRECT.to_string();

        let state = AppState::new(
            config,
            Arc::new(MemoryBackend::new()),
            Arc::new(self.mailer.clone()),
            self.analyzer,
        )?;

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            if let Err(e) = ApiServer::new(state).serve(listener, shutdown).await {
                eprintln!("test server stopped with error: {e}");
            }
        });

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(TestServer {
            base_url,
            mailer: self.mailer,
            client,
            shutdown: Some(tx),
        })
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        TestServerBuilder::new().start().await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Attach the identity headers the API trusts
    pub fn as_user(request: RequestBuilder, uid: &str, email: &str) -> RequestBuilder {
        request.header("uid", uid).header("email", email)
    }

    /// Submit a mentor application and return the created summary
    pub async fn apply_mentor(&self, email: &str, hourly_rate: Option<f64>) -> Result<Value> {
        let response = self
            .post("/mentors")
            .json(&mentor_application(email, hourly_rate))
            .send()
            .await?;
        anyhow::ensure!(
            response.status() == 201,
            "application failed with {}",
            response.status()
        );
        let body: Value = response.json().await?;
        Ok(body["mentor"].clone())
    }

    /// Pull the verification token out of the admin email for `mentor_email`
    pub async fn verification_token(&self, mentor_email: &str) -> Result<String> {
        let mails = self.mailer.sent_to(ADMIN_EMAIL).await;
        let mail = mails
            .iter()
            .rev()
            .find(|m| m.html.contains(mentor_email))
            .context("no admin email for mentor")?;
        extract_token(&mail.html).context("no verification link in admin email")
    }

    /// Apply and verify in one step
    pub async fn approved_mentor(&self, email: &str, hourly_rate: Option<f64>) -> Result<Value> {
        let mentor = self.apply_mentor(email, hourly_rate).await?;
        let token = self.verification_token(email).await?;
        let response = self
            .get(&format!("/mentors/verify/{token}"))
            .send()
            .await?;
        anyhow::ensure!(
            response.status().is_redirection(),
            "verification failed with {}",
            response.status()
        );
        Ok(mentor)
    }
}

pub fn extract_token(html: &str) -> Option<String> {
    let start = html.find("/mentors/verify/")? + "/mentors/verify/".len();
    let token: String = html[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();
    (!token.is_empty()).then_some(token)
}

pub fn mentor_application(email: &str, hourly_rate: Option<f64>) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": email,
        "domain": "Fintech",
        "expertise": ["Fundraising", "Payments"],
        "experienceYears": 12,
        "bio": "Two exits in payments infrastructure",
        "hourlyRate": hourly_rate,
    })
}

pub fn booking_request(mentee_email: &str) -> Value {
    json!({
        "mentee": {
            "name": "Grace Hopper",
            "email": mentee_email,
            "company": "Compilers Inc"
        },
        "sessionDetails": {
            "scheduledDate": "2026-11-02",
            "scheduledTime": "10:00",
            "topic": "Seed round pricing"
        }
    })
}

pub async fn json_body(response: Response) -> Result<Value> {
    Ok(response.json().await?)
}
