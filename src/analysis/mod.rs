//! Idea analysis provider
//!
//! [`IdeaAnalyzer`] turns a submitted idea into an [`AnalysisReport`]. The
//! production implementation calls an LLM messages endpoint over HTTP; the
//! service layer only sees the trait, so tests plug in canned analyzers.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::models::{AnalysisReport, IdeaAnalysis};

pub mod client;
pub mod prompt;

pub use client::LlmAnalyzer;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Analysis provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid analysis response: {0}")]
    InvalidResponse(String),

    #[error("Analysis is not configured: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Rate limits, overload, server errors and dropped connections
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Request(e) => e.is_timeout() || e.is_connect(),
            AnalysisError::Status { status, .. } => *status == 429 || *status >= 500,
            AnalysisError::InvalidResponse(_) | AnalysisError::Config(_) => false,
        }
    }
}

#[async_trait]
pub trait IdeaAnalyzer: Send + Sync {
    async fn analyze(&self, idea: &IdeaAnalysis) -> Result<AnalysisReport, AnalysisError>;
}

/// The configured analyzer, or `None` when no API key is set
pub fn analyzer_from_config(
    config: &AnalysisConfig,
) -> Result<Option<Arc<dyn IdeaAnalyzer>>, AnalysisError> {
    match &config.api_key {
        Some(key) if !key.trim().is_empty() => {
            Ok(Some(Arc::new(LlmAnalyzer::new(key.clone(), config)?)))
        }
        _ => Ok(None),
    }
}
