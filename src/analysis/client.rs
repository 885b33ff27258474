//! HTTP client for an Anthropic-style messages endpoint, with retry

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::{prompt, AnalysisError, IdeaAnalyzer};
use crate::config::AnalysisConfig;
use crate::models::{AnalysisReport, IdeaAnalysis};

const API_VERSION: &str = "2023-06-01";
/// Upper bound on the wait between retries
const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

pub struct LlmAnalyzer {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
    max_retries: u32,
    retry_delay: Duration,
}

impl LlmAnalyzer {
    pub fn new(api_key: String, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    async fn make_request(&self, user_prompt: &str) -> Result<String, AnalysisError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: prompt::SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: user_prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }

    /// Exponential backoff delay before retry number `retry_count` (1-based),
    /// capped at `MAX_BACKOFF`
    fn calculate_backoff(&self, retry_count: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry_count.saturating_sub(1));
        self.retry_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

#[async_trait]
impl IdeaAnalyzer for LlmAnalyzer {
    async fn analyze(&self, idea: &IdeaAnalysis) -> Result<AnalysisReport, AnalysisError> {
        let user_prompt = prompt::build_prompt(idea);

        let mut retry_count = 0;
        let text = loop {
            match self.make_request(&user_prompt).await {
                Ok(text) => break text,
                Err(e) => {
                    if retry_count >= self.max_retries || !e.is_retryable() {
                        return Err(e);
                    }

                    retry_count += 1;
                    let delay = self.calculate_backoff(retry_count);
                    warn!(
                        "Analysis of idea {} failed ({}), retry {} in {:?}",
                        idea.id, e, retry_count, delay
                    );
                    sleep(delay).await;
                }
            }
        };

        debug!("Analysis for idea {} returned {} chars", idea.id, text.len());
        prompt::parse_report(&text)
    }
}
