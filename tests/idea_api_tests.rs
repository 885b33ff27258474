mod common;

use anyhow::Result;
use async_trait::async_trait;
use common::{TestServer, TestServerBuilder};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

use mentorhub::analysis::{AnalysisError, IdeaAnalyzer};
use mentorhub::models::{AnalysisReport, IdeaAnalysis};

const OWNER: (&str, &str) = ("founder-1", "founder@example.com");
const OTHER: (&str, &str) = ("founder-2", "other@example.com");

struct FixedScore(f64);

#[async_trait]
impl IdeaAnalyzer for FixedScore {
    async fn analyze(&self, idea: &IdeaAnalysis) -> Result<AnalysisReport, AnalysisError> {
        Ok(AnalysisReport {
            overall_score: Some(self.0),
            summary: Some(format!("{} looks viable", idea.idea_name)),
            ..Default::default()
        })
    }
}

fn idea(name: &str, visibility: &str) -> Value {
    json!({
        "ideaName": name,
        "ideaDescription": "Payroll for four-day work weeks",
        "category": "HR Tech",
        "tags": ["payroll", " ", "b2b"],
        "visibility": visibility,
    })
}

fn report(score: f64) -> Value {
    json!({
        "overallScore": score,
        "summary": "Crowded market, sharp wedge",
        "strengths": ["Clear buyer"],
        "marketSize": "mid"
    })
}

async fn create(server: &TestServer, user: (&str, &str), body: Value) -> Result<Value> {
    let response = TestServer::as_user(server.post("/idea-analysis"), user.0, user.1)
        .json(&body)
        .send()
        .await?;
    anyhow::ensure!(
        response.status() == StatusCode::CREATED,
        "create failed with {}",
        response.status()
    );
    Ok(response.json().await?)
}

async fn stats(server: &TestServer, user: (&str, &str)) -> Result<Value> {
    Ok(TestServer::as_user(server.get("/users/stats"), user.0, user.1)
        .send()
        .await?
        .json()
        .await?)
}

#[tokio::test]
async fn test_missing_identity_headers_are_unauthorized() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.get("/idea-analysis").send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let only_uid = server
        .get("/idea-analysis")
        .header("uid", "founder-1")
        .send()
        .await?;
    assert_eq!(only_uid.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_draft_completes_once_and_counts_once() -> Result<()> {
    let server = TestServer::start().await?;
    let draft = create(&server, OWNER, idea("Shorter Weeks", "private")).await?;
    assert_eq!(draft["status"], "draft");
    assert_eq!(draft["tags"], json!(["payroll", "b2b"]));
    let id = draft["id"].as_str().unwrap_or_default();

    let completed: Value =
        TestServer::as_user(server.put(&format!("/idea-analysis/{id}/analysis")), OWNER.0, OWNER.1)
            .json(&json!({ "analysis": report(72.0) }))
            .send()
            .await?
            .json()
            .await?;
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["analysis"]["overallScore"], 72.0);
    assert_eq!(completed["analysis"]["marketSize"], "mid");
    assert!(completed["completedAt"].is_string());

    let first = stats(&server, OWNER).await?;
    assert_eq!(first["activity"]["ideasAnalyzed"], 1);

    TestServer::as_user(server.put(&format!("/idea-analysis/{id}/analysis")), OWNER.0, OWNER.1)
        .json(&json!({ "analysis": report(80.0) }))
        .send()
        .await?;
    let second = stats(&server, OWNER).await?;
    assert_eq!(second["activity"]["ideasAnalyzed"], 1);
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_score_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let response = TestServer::as_user(server.post("/idea-analysis"), OWNER.0, OWNER.1)
        .json(&json!({
            "ideaName": "Too Good",
            "ideaDescription": "Scores off the chart",
            "analysis": { "overallScore": 140 }
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_fetch_counts_views() -> Result<()> {
    let server = TestServer::start().await?;
    let created = create(&server, OWNER, idea("Viewed", "private")).await?;
    let id = created["id"].as_str().unwrap_or_default();

    for expected in 1..=2 {
        let fetched: Value =
            TestServer::as_user(server.get(&format!("/idea-analysis/{id}")), OWNER.0, OWNER.1)
                .send()
                .await?
                .json()
                .await?;
        assert_eq!(fetched["userInteraction"]["viewCount"], expected);
    }
    Ok(())
}

#[tokio::test]
async fn test_non_owner_access() -> Result<()> {
    let server = TestServer::start().await?;
    let private = create(&server, OWNER, idea("Secret", "private")).await?;
    let id = private["id"].as_str().unwrap_or_default();

    let read = TestServer::as_user(server.get(&format!("/idea-analysis/{id}")), OTHER.0, OTHER.1)
        .send()
        .await?;
    assert_eq!(read.status(), StatusCode::FORBIDDEN);

    let delete =
        TestServer::as_user(server.delete(&format!("/idea-analysis/{id}")), OTHER.0, OTHER.1)
            .send()
            .await?;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    let mut shared = idea("Shared", "public");
    shared["analysis"] = report(65.0);
    let public = create(&server, OWNER, shared).await?;
    let public_id = public["id"].as_str().unwrap_or_default();
    let read_public =
        TestServer::as_user(server.get(&format!("/idea-analysis/{public_id}")), OTHER.0, OTHER.1)
            .send()
            .await?;
    assert_eq!(read_public.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_soft_delete_hides_from_lists() -> Result<()> {
    let server = TestServer::start().await?;
    let keep = create(&server, OWNER, idea("Keep", "private")).await?;
    let gone = create(&server, OWNER, idea("Gone", "private")).await?;
    let gone_id = gone["id"].as_str().unwrap_or_default();

    for _ in 0..2 {
        let response =
            TestServer::as_user(server.delete(&format!("/idea-analysis/{gone_id}")), OWNER.0, OWNER.1)
                .send()
                .await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let listed: Vec<Value> = TestServer::as_user(server.get("/idea-analysis"), OWNER.0, OWNER.1)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], keep["id"]);

    let fetched: Value =
        TestServer::as_user(server.get(&format!("/idea-analysis/{gone_id}")), OWNER.0, OWNER.1)
            .send()
            .await?
            .json()
            .await?;
    assert_eq!(fetched["status"], "deleted");

    let bookmark = TestServer::as_user(
        server.put(&format!("/idea-analysis/{gone_id}/interaction")),
        OWNER.0,
        OWNER.1,
    )
    .json(&json!({ "action": "bookmark" }))
    .send()
    .await?;
    assert_eq!(bookmark.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_interactions() -> Result<()> {
    let server = TestServer::start().await?;
    let created = create(&server, OWNER, idea("Interacted", "private")).await?;
    let id = created["id"].as_str().unwrap_or_default();
    let path = format!("/idea-analysis/{id}/interaction");

    let bookmarked: Value = TestServer::as_user(server.put(&path), OWNER.0, OWNER.1)
        .json(&json!({ "action": "bookmark" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(bookmarked["userInteraction"]["isBookmarked"], true);

    let rated: Value = TestServer::as_user(server.put(&path), OWNER.0, OWNER.1)
        .json(&json!({ "action": "rate", "rating": 4 }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(rated["userInteraction"]["rating"], 4);

    let bad_rating = TestServer::as_user(server.put(&path), OWNER.0, OWNER.1)
        .json(&json!({ "action": "rate", "rating": 9 }))
        .send()
        .await?;
    assert_eq!(bad_rating.status(), StatusCode::BAD_REQUEST);

    let user_stats = stats(&server, OWNER).await?;
    assert_eq!(user_stats["bookmarkedIdeas"], 1);
    Ok(())
}

#[tokio::test]
async fn test_public_search_and_trending() -> Result<()> {
    let server = TestServer::start().await?;

    let mut popular = idea("Popular Payroll", "public");
    popular["analysis"] = report(70.0);
    let popular = create(&server, OWNER, popular).await?;
    let mut niche = idea("Niche Payroll", "public");
    niche["analysis"] = report(60.0);
    create(&server, OWNER, niche).await?;
    create(&server, OWNER, idea("Draft Payroll", "public")).await?;
    let mut hidden = idea("Hidden Payroll", "private");
    hidden["analysis"] = report(90.0);
    create(&server, OWNER, hidden).await?;

    let popular_id = popular["id"].as_str().unwrap_or_default();
    for _ in 0..3 {
        TestServer::as_user(server.get(&format!("/idea-analysis/{popular_id}")), OTHER.0, OTHER.1)
            .send()
            .await?;
    }

    let found: Vec<Value> = server
        .get("/idea-analysis/public/search?q=payroll")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found.len(), 2);

    let trending: Vec<Value> = server
        .get("/idea-analysis/public/trending?days=7&limit=1")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0]["id"], popular["id"]);
    Ok(())
}

#[tokio::test]
async fn test_server_side_analysis() -> Result<()> {
    let server = TestServerBuilder::new()
        .with_analyzer(Arc::new(FixedScore(81.0)))
        .start()
        .await?;
    let created = create(&server, OWNER, idea("Analyzed", "private")).await?;
    let id = created["id"].as_str().unwrap_or_default();

    let analyzed: Value =
        TestServer::as_user(server.post(&format!("/idea-analysis/{id}/analyze")), OWNER.0, OWNER.1)
            .send()
            .await?
            .json()
            .await?;
    assert_eq!(analyzed["status"], "completed");
    assert_eq!(analyzed["analysis"]["overallScore"], 81.0);
    Ok(())
}

#[tokio::test]
async fn test_analysis_without_provider_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let created = create(&server, OWNER, idea("Unanalyzed", "private")).await?;
    let id = created["id"].as_str().unwrap_or_default();

    let response =
        TestServer::as_user(server.post(&format!("/idea-analysis/{id}/analyze")), OWNER.0, OWNER.1)
            .send()
            .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
