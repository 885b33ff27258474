mod common;

use anyhow::Result;
use common::{mentor_application, TestServer, ADMIN_EMAIL, SUCCESS_REDIRECT};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_application_is_pending_and_mails_admin_and_applicant() -> Result<()> {
    let server = TestServer::start().await?;

    let mentor = server.apply_mentor("ada@example.com", Some(150.0)).await?;
    assert_eq!(mentor["status"], "pending");
    assert_eq!(mentor["verified"], false);
    assert_eq!(mentor["mentorNumber"], 1);
    assert!(mentor.get("verificationToken").is_none());

    let admin_mail = server.mailer.sent_to(ADMIN_EMAIL).await;
    assert_eq!(admin_mail.len(), 1);
    assert!(admin_mail[0]
        .html
        .contains(&format!("{}/mentors/verify/", server.base_url)));
    assert_eq!(server.mailer.sent_to("ada@example.com").await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    server.apply_mentor("dup@example.com", None).await?;

    let response = server
        .post("/mentors")
        .json(&mentor_application("dup@example.com", None))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert!(body["error"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn test_missing_required_fields_are_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let response = server
        .post("/mentors")
        .json(&json!({ "name": "No Email", "domain": "AI", "bio": "x" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_verification_token_is_single_use() -> Result<()> {
    let server = TestServer::start().await?;
    server.apply_mentor("once@example.com", None).await?;
    let token = server.verification_token("once@example.com").await?;
    assert_eq!(token.len(), 64);

    let first = server
        .get(&format!("/mentors/verify/{token}"))
        .send()
        .await?;
    assert!(first.status().is_redirection());
    assert_eq!(
        first.headers()["location"].to_str()?,
        SUCCESS_REDIRECT
    );

    let second = server
        .get(&format!("/mentors/verify/{token}"))
        .send()
        .await?;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_verification_approves_and_notifies_mentor() -> Result<()> {
    let server = TestServer::start().await?;
    let mentor = server.approved_mentor("ok@example.com", None).await?;

    let id = mentor["id"].as_str().unwrap_or_default();
    let profile: Value = server
        .get(&format!("/mentors/{id}"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(profile["status"], "approved");
    assert_eq!(profile["verified"], true);

    // acknowledgement plus approval
    assert_eq!(server.mailer.sent_to("ok@example.com").await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_listing_defaults_to_approved_mentors() -> Result<()> {
    let server = TestServer::start().await?;
    server.apply_mentor("pending@example.com", None).await?;
    server.approved_mentor("approved@example.com", None).await?;

    let listed: Vec<Value> = server.get("/mentors").send().await?.json().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], "approved");

    let all: Vec<Value> = server
        .get("/mentors?status=all")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all.len(), 2);

    let pending: Vec<Value> = server
        .get("/mentors?status=pending")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(pending.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_mentor_resolves_by_number_and_can_be_deleted() -> Result<()> {
    let server = TestServer::start().await?;
    let mentor = server.apply_mentor("num@example.com", None).await?;
    let number = mentor["mentorNumber"].as_u64().unwrap_or_default();

    let by_number = server.get(&format!("/mentors/{number}")).send().await?;
    assert_eq!(by_number.status(), StatusCode::OK);
    let profile: Value = by_number.json().await?;
    assert_eq!(profile["id"], mentor["id"]);

    let id = mentor["id"].as_str().unwrap_or_default();
    let deleted = server.delete(&format!("/mentors/{id}")).send().await?;
    assert_eq!(deleted.status(), StatusCode::OK);

    let missing = server.get(&format!("/mentors/{id}")).send().await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_update_changes_profile_fields() -> Result<()> {
    let server = TestServer::start().await?;
    let mentor = server.apply_mentor("upd@example.com", None).await?;
    let id = mentor["id"].as_str().unwrap_or_default();

    let response = server
        .put(&format!("/mentors/{id}"))
        .json(&json!({ "company": "Analytical Engines", "hourlyRate": 80.0 }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = response.json().await?;
    assert_eq!(profile["company"], "Analytical Engines");
    assert_eq!(profile["hourlyRate"], 80.0);
    Ok(())
}

#[tokio::test]
async fn test_health_reports_ok() -> Result<()> {
    let server = TestServer::start().await?;
    let response = server.get("/health").send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}
