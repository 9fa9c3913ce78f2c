mod common;

use common::{TestApp, TestOptions};

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = TestApp::build(TestOptions::default());

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["counter_store"]["status"], "ok");
    assert_eq!(json["checks"]["channels"]["status"], "ok");
    assert_eq!(json["checks"]["channels"]["message"], "email, webhook");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let app = TestApp::build(TestOptions {
        webhook_configured: false,
        ..Default::default()
    });

    let response = app.server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["checks"].get("counter_store").is_some());
    assert_eq!(json["checks"]["channels"]["message"], "email");
}
