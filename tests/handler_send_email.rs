mod common;

use axum::http::{HeaderValue, StatusCode, header};
use common::{ALLOWED_ORIGIN, TestApp, TestOptions, contact_body};
use contact_gateway::domain::entities::{PrimaryReport, RateLimitPolicy};
use serde_json::json;

#[tokio::test]
async fn test_send_email_delivers_to_every_channel() {
    let app = TestApp::build(TestOptions::default());

    let response = app.server.post("/send-email").json(&contact_body()).await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "Your message was sent successfully!");

    let emails = app.sent_emails();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "Project inquiry");
    assert_eq!(emails[0].to, "owner@portfolio.example.com");
    assert_eq!(emails[0].reply_to.as_deref(), Some("jane@example.com"));
    assert!(emails[0].html_body.contains("<strong>a project</strong>"));
    assert!(emails[0].html_body.contains("Portfolio"));
    assert!(!emails[0].plain_text_body.is_empty());

    let webhooks = app.posted_webhooks();
    assert_eq!(webhooks.len(), 1);
    let payload: serde_json::Value = serde_json::from_slice(&webhooks[0]).unwrap();
    assert_eq!(payload["embeds"][0]["title"], "Project inquiry");
}

#[tokio::test]
async fn test_send_email_rate_limited_without_oracle_calls() {
    let app = TestApp::build(TestOptions {
        email_policy: RateLimitPolicy::new(1, 60),
        ..Default::default()
    });

    app.server
        .post("/send-email")
        .json(&contact_body())
        .await
        .assert_status(StatusCode::CREATED);

    let mut last = None;
    for _ in 0..10 {
        last = Some(app.server.post("/send-email").json(&contact_body()).await);
    }
    let response = last.unwrap();

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response
        .header(header::RETRY_AFTER)
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0);
    assert!(retry_after <= 60);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "rate_limited");

    assert_eq!(app.bot_calls(), 1);
    assert_eq!(app.oracle_calls(), 1);
    assert_eq!(app.sent_emails().len(), 1);
}

#[tokio::test]
async fn test_send_email_low_bot_score_forbidden() {
    let app = TestApp::build(TestOptions {
        bot_score: 0.2,
        ..Default::default()
    });

    let response = app.server.post("/send-email").json(&contact_body()).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app.oracle_calls(), 0);
    assert!(app.sent_emails().is_empty());
}

#[tokio::test]
async fn test_send_email_missing_token_forbidden() {
    let app = TestApp::build(TestOptions::default());

    let mut body = contact_body();
    body.as_object_mut().unwrap().remove("recaptchaToken");

    let response = app.server.post("/send-email").json(&body).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app.bot_calls(), 0);
}

#[tokio::test]
async fn test_send_email_malformed_address_skips_oracles() {
    let app = TestApp::build(TestOptions::default());

    let mut body = contact_body();
    body["from"] = json!("not-an-email");

    let response = app.server.post("/send-email").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.oracle_calls(), 0);
    assert!(app.sent_emails().is_empty());
}

#[tokio::test]
async fn test_send_email_disposable_address_rejected() {
    let app = TestApp::build(TestOptions {
        primary: Some(PrimaryReport {
            format_valid: true,
            disposable: true,
            smtp_reachable: true,
        }),
        ..Default::default()
    });

    let response = app.server.post("/send-email").json(&contact_body()).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(
        json["error"]["message"],
        "Email is invalid, disposable, or does not exist"
    );
    // A definitive primary answer never falls through to the secondary.
    assert_eq!(app.secondary.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_send_email_falls_back_to_secondary_oracle() {
    let app = TestApp::build(TestOptions {
        primary: None,
        ..Default::default()
    });

    let response = app.server.post("/send-email").json(&contact_body()).await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(app.oracle_calls(), 2);
}

#[tokio::test]
async fn test_send_email_no_oracle_reachable() {
    let app = TestApp::build(TestOptions {
        primary: None,
        secondary: None,
        ..Default::default()
    });

    let response = app.server.post("/send-email").json(&contact_body()).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(app.sent_emails().is_empty());
}

#[tokio::test]
async fn test_send_email_required_channel_failure() {
    let app = TestApp::build(TestOptions {
        mail_fails: true,
        ..Default::default()
    });

    let response = app.server.post("/send-email").json(&contact_body()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["message"], "Failed to send message");
}

#[tokio::test]
async fn test_send_email_best_effort_webhook_failure_still_delivers() {
    let app = TestApp::build(TestOptions {
        webhook_fails: true,
        ..Default::default()
    });

    let response = app.server.post("/send-email").json(&contact_body()).await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(app.sent_emails().len(), 1);
}

#[tokio::test]
async fn test_send_email_validation_error() {
    let app = TestApp::build(TestOptions::default());

    let mut body = contact_body();
    body["subject"] = json!("");

    let response = app.server.post("/send-email").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["details"].get("subject").is_some());
    assert_eq!(app.bot_calls(), 0);
}

#[tokio::test]
async fn test_send_email_disallowed_origin_forbidden() {
    let app = TestApp::build(TestOptions::default());

    let response = app
        .server
        .post("/send-email")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://evil.example"))
        .json(&contact_body())
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app.bot_calls(), 0);
}

#[tokio::test]
async fn test_send_email_allowed_origin() {
    let app = TestApp::build(TestOptions::default());

    let response = app
        .server
        .post("/send-email")
        .add_header(header::ORIGIN, HeaderValue::from_static(ALLOWED_ORIGIN))
        .json(&contact_body())
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        ALLOWED_ORIGIN
    );
}

#[tokio::test]
async fn test_send_email_invalid_submission_uses_rate_window() {
    let app = TestApp::build(TestOptions {
        email_policy: RateLimitPolicy::new(1, 60),
        ..Default::default()
    });

    let mut invalid = contact_body();
    invalid["subject"] = json!("");

    app.server
        .post("/send-email")
        .json(&invalid)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = app.server.post("/send-email").json(&contact_body()).await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(app.bot_calls(), 0);
    assert!(app.sent_emails().is_empty());
}
