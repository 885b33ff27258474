//! Prompt construction and response parsing for idea analysis

use crate::models::{AnalysisReport, IdeaAnalysis};

use super::AnalysisError;

pub const SYSTEM_PROMPT: &str = "You are an experienced startup advisor and venture analyst. \
Evaluate startup ideas candidly and respond with a single JSON object and nothing else.";

/// User message describing the idea and the expected JSON shape
pub fn build_prompt(idea: &IdeaAnalysis) -> String {
    let mut prompt = String::new();
    prompt.push_str("Analyze the following startup idea.\n\n");
    prompt.push_str(&format!("Name: {}\n", idea.idea_name));
    if let Some(category) = &idea.category {
        prompt.push_str(&format!("Category: {}\n", category));
    }
    if !idea.tags.is_empty() {
        prompt.push_str(&format!("Tags: {}\n", idea.tags.join(", ")));
    }
    prompt.push_str(&format!("Description:\n{}\n\n", idea.idea_description));
    prompt.push_str(
        "Respond with JSON using these keys:\n\
         - overallScore: number from 0 to 100\n\
         - summary: one paragraph\n\
         - strengths, weaknesses, recommendations: arrays of short strings\n\
         - marketAnalysis: {size, trends, targetCustomers}\n\
         - competition: {competitors, differentiation}\n\
         - risks: array of short strings\n\
         - nextSteps: array of short strings\n",
    );
    prompt
}

/// Pull the JSON object out of the model text and validate it
pub fn parse_report(text: &str) -> Result<AnalysisReport, AnalysisError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(AnalysisError::InvalidResponse(
                "no JSON object in response".to_string(),
            ))
        }
    };

    let report: AnalysisReport = serde_json::from_str(json)
        .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

    if let Some(score) = report.overall_score {
        if !(0.0..=100.0).contains(&score) {
            return Err(AnalysisError::InvalidResponse(format!(
                "overallScore {} is outside 0..=100",
                score
            )));
        }
    }

    Ok(report)
}
