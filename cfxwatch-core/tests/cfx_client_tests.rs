// File: cfxwatch-core/tests/cfx_client_tests.rs

mod test_utils;

use std::sync::Arc;

use cfxwatch_common::traits::api::{PlatformStatusSource, ServerQuery};
use cfxwatch_core::Error;
use cfxwatch_core::platforms::cfx::{CfxServerClient, CfxStatusClient};

use test_utils::FakeHttp;

const SERVERS: &str = "https://servers-frontend.fivem.net/api/servers/single";
const STATUS: &str = "https://status.cfx.re/api/v2";

const SERVER_BODY: &str = r#"{
    "EndPoint": "abc123",
    "Data": {
        "hostname": "^1Test ^7RP",
        "clients": 17,
        "sv_maxclients": 64,
        "resources": ["chat", "spawnmanager"]
    }
}"#;

#[tokio::test]
async fn test_server_lookup_parses_player_counts() -> Result<(), Error> {
    let http = Arc::new(FakeHttp::default().with(&format!("{SERVERS}/abc123"), SERVER_BODY));
    // Trailing slash on the configured base is tolerated.
    let client = CfxServerClient::new(http.clone(), &format!("{SERVERS}/"));

    let info = client.fetch_server("abc123").await?;

    assert_eq!(info.clients, 17);
    assert_eq!(info.max_clients, 64);
    assert_eq!(info.hostname, "^1Test ^7RP");
    assert_eq!(http.requested(), vec![format!("{SERVERS}/abc123")]);
    Ok(())
}

#[tokio::test]
async fn test_unknown_server_is_not_found() {
    let client = CfxServerClient::new(Arc::new(FakeHttp::default()), SERVERS);
    let result = client.fetch_server("gone00").await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_malformed_server_body_is_parse_error() {
    let http = Arc::new(FakeHttp::default().with(&format!("{SERVERS}/abc123"), "<html>502</html>"));
    let client = CfxServerClient::new(http, SERVERS);
    let result = client.fetch_server("abc123").await;
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[tokio::test]
async fn test_status_indicator_none_means_ok() -> Result<(), Error> {
    let http = Arc::new(FakeHttp::default().with(
        &format!("{STATUS}/status.json"),
        r#"{"page":{"id":"x"},"status":{"indicator":"none","description":"All Systems Operational"}}"#,
    ));
    let status = CfxStatusClient::new(http, STATUS).fetch_status().await?;
    assert!(status.everything_ok);
    assert_eq!(status.description, "All Systems Operational");
    Ok(())
}

#[tokio::test]
async fn test_status_indicator_minor_means_issues() -> Result<(), Error> {
    let http = Arc::new(FakeHttp::default().with(
        &format!("{STATUS}/status.json"),
        r#"{"status":{"indicator":"minor","description":"Minor Service Outage"}}"#,
    ));
    let status = CfxStatusClient::new(http, STATUS).fetch_status().await?;
    assert!(!status.everything_ok);
    assert_eq!(status.indicator, "minor");
    Ok(())
}

#[tokio::test]
async fn test_components_follow_page_order() -> Result<(), Error> {
    let http = Arc::new(FakeHttp::default().with(
        &format!("{STATUS}/components.json"),
        r#"{"components":[
            {"name":"Keymaster","status":"operational","position":3},
            {"name":"CnL","status":"major_outage","position":1},
            {"name":"Policy","status":"operational","position":2}
        ]}"#,
    ));
    let components = CfxStatusClient::new(http, STATUS).fetch_components().await?;

    let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["CnL", "Policy", "Keymaster"]);
    assert!(!components[0].is_operational());
    assert!(components[1].is_operational());
    Ok(())
}
