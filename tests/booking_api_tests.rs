mod common;

use anyhow::Result;
use common::{booking_request, TestServer, TestServerBuilder, ADMIN_EMAIL};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn book(server: &TestServer, mentor_id: &str, mentee: &str) -> Result<Value> {
    let response = server
        .post(&format!("/mentors/{mentor_id}/book"))
        .json(&booking_request(mentee))
        .send()
        .await?;
    anyhow::ensure!(
        response.status() == StatusCode::CREATED,
        "booking failed with {}",
        response.status()
    );
    Ok(response.json().await?)
}

#[tokio::test]
async fn test_booking_is_priced_from_hourly_rate() -> Result<()> {
    let server = TestServer::start().await?;
    let mentor = server.approved_mentor("rate@example.com", Some(100.0)).await?;
    let mentor_id = mentor["id"].as_str().unwrap_or_default();

    let booking = book(&server, mentor_id, "grace@example.com").await?;
    assert_eq!(booking["payment"]["amount"], 100.0);
    assert_eq!(booking["payment"]["currency"], "USD");
    assert_eq!(booking["payment"]["status"], "pending");
    assert_eq!(booking["status"], "scheduled");
    assert_eq!(booking["sessionDetails"]["sessionType"], "consultation");
    assert_eq!(booking["sessionDetails"]["durationMinutes"], 60);
    assert_eq!(booking["mentorName"], "Ada Lovelace");

    let profile: Value = server
        .get(&format!("/mentors/{mentor_id}"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(profile["totalBookings"], 1);

    assert_eq!(server.mailer.sent_to("grace@example.com").await.len(), 1);
    assert!(server
        .mailer
        .sent_to(ADMIN_EMAIL)
        .await
        .iter()
        .any(|m| m.subject.contains("Grace Hopper") || m.html.contains("Grace Hopper")));
    Ok(())
}

#[tokio::test]
async fn test_booking_unknown_mentor_is_not_found() -> Result<()> {
    let server = TestServer::start().await?;
    let response = server
        .post("/mentors/does-not-exist/book")
        .json(&booking_request("grace@example.com"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_invalid_mentee_email_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let mentor = server.approved_mentor("v@example.com", None).await?;
    let mentor_id = mentor["id"].as_str().unwrap_or_default();

    let response = server
        .post(&format!("/mentors/{mentor_id}/book"))
        .json(&booking_request("not-an-email"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_mail_failure_keeps_the_booking() -> Result<()> {
    let server = TestServerBuilder::new().with_failing_mail().start().await?;
    let mentor = server.apply_mentor("quiet@example.com", Some(50.0)).await?;
    let mentor_id = mentor["id"].as_str().unwrap_or_default();

    let booking = book(&server, mentor_id, "grace@example.com").await?;
    let id = booking["id"].as_str().unwrap_or_default();

    let stored = server.get(&format!("/bookings/{id}")).send().await?;
    assert_eq!(stored.status(), StatusCode::OK);
    assert!(server.mailer.sent().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_status_update_and_feedback() -> Result<()> {
    let server = TestServer::start().await?;
    let mentor = server.approved_mentor("fb@example.com", None).await?;
    let mentor_id = mentor["id"].as_str().unwrap_or_default();
    let booking = book(&server, mentor_id, "grace@example.com").await?;
    let id = booking["id"].as_str().unwrap_or_default();

    let updated: Value = server
        .put(&format!("/bookings/{id}/status"))
        .json(&json!({ "status": "completed" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(updated["status"], "completed");

    let status: Value = server
        .get(&format!("/bookings/{id}/status"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(status["status"], "completed");

    let bad_rating = server
        .put(&format!("/bookings/{id}/feedback"))
        .json(&json!({ "rating": 6 }))
        .send()
        .await?;
    assert_eq!(bad_rating.status(), StatusCode::BAD_REQUEST);

    let with_feedback: Value = server
        .put(&format!("/bookings/{id}/feedback"))
        .json(&json!({ "rating": 5, "comment": "Sharp advice" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(with_feedback["feedback"]["rating"], 5);

    let profile: Value = server
        .get(&format!("/mentors/{mentor_id}"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(profile["reviews"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_unknown_status_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let mentor = server.approved_mentor("st@example.com", None).await?;
    let mentor_id = mentor["id"].as_str().unwrap_or_default();
    let booking = book(&server, mentor_id, "grace@example.com").await?;
    let id = booking["id"].as_str().unwrap_or_default();

    let response = server
        .put(&format!("/bookings/{id}/status"))
        .json(&json!({ "status": "teleported" }))
        .send()
        .await?;
    assert!(response.status().is_client_error());
    Ok(())
}

#[tokio::test]
async fn test_listing_filters_by_mentor() -> Result<()> {
    let server = TestServer::start().await?;
    let first = server.approved_mentor("one@example.com", None).await?;
    let second = server.approved_mentor("two@example.com", None).await?;
    let first_id = first["id"].as_str().unwrap_or_default();
    let second_id = second["id"].as_str().unwrap_or_default();

    book(&server, first_id, "a@example.com").await?;
    book(&server, first_id, "b@example.com").await?;
    book(&server, second_id, "c@example.com").await?;

    let all: Vec<Value> = server.get("/bookings").send().await?.json().await?;
    assert_eq!(all.len(), 3);

    let filtered: Vec<Value> = server
        .get(&format!("/bookings?mentorId={first_id}"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(filtered.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_weekly_analytics_ranks_mentors() -> Result<()> {
    let server = TestServer::start().await?;
    let busy = server.approved_mentor("busy@example.com", None).await?;
    let quiet = server.approved_mentor("quiet@example.com", None).await?;
    let busy_id = busy["id"].as_str().unwrap_or_default();
    let quiet_id = quiet["id"].as_str().unwrap_or_default();

    book(&server, busy_id, "a@example.com").await?;
    book(&server, busy_id, "b@example.com").await?;
    book(&server, quiet_id, "c@example.com").await?;

    let report: Value = server
        .get("/bookings/analytics/weekly")
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(report["totalBookings"], 3);
    assert_eq!(report["statusCounts"]["scheduled"], 3);
    assert_eq!(report["topMentors"][0]["mentorId"], busy_id);
    assert_eq!(report["topMentors"][0]["bookings"], 2);
    assert_eq!(report["topMentors"][0]["rank"], 1);
    Ok(())
}

#[tokio::test]
async fn test_weekly_report_download_is_an_attachment() -> Result<()> {
    let server = TestServer::start().await?;
    let response = server
        .post("/bookings/analytics/weekly-report?download=true")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response.headers()["content-disposition"].to_str()?.to_string();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("weekly-report-"));

    let report: Value = response.json().await?;
    assert_eq!(report["totalBookings"], 0);
    Ok(())
}

#[tokio::test]
async fn test_weekly_report_is_mailed_to_admin() -> Result<()> {
    let server = TestServer::start().await?;
    let response = server
        .post("/bookings/analytics/weekly-report")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert_eq!(body["mailed"], true);
    assert_eq!(server.mailer.sent_to(ADMIN_EMAIL).await.len(), 1);
    Ok(())
}
