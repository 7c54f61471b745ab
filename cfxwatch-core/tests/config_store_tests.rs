// File: cfxwatch-core/tests/config_store_tests.rs

use std::fs;

use serde_json::Value;
use tempfile::TempDir;

use cfxwatch_common::models::feed::FeedKind;
use cfxwatch_common::traits::api::ConfigStore;
use cfxwatch_core::Error;
use cfxwatch_core::config::JsonConfigStore;

const CONFIG: &str = r#"{
  "BOT_TOKEN": "token",
  "OWNER": "ops-team",
  "srvStatus": {
    "SERVER_ID": "abc123",
    "CHANNEL_ID": "1100000000000000001",
    "CHANNEL_NAME": "server-status"
  },
  "cfxStatus": {
    "CHANNEL_ID": "1100000000000000003",
    "CHANNEL_NAME": "cfx-status",
    "lastMessageId": "1100000000000000004"
  }
}"#;

fn write_config(body: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, body).expect("write config");
    (dir, path)
}

#[tokio::test]
async fn test_load_reads_ids() -> Result<(), Error> {
    let (_dir, path) = write_config(CONFIG);
    let store = JsonConfigStore::load(&path)?;
    let config = store.snapshot().await;

    assert_eq!(config.last_message_id(FeedKind::GameServer)?, None);
    assert_eq!(config.last_message_id(FeedKind::Platform)?, Some(1100000000000000004));
    assert_eq!(store.path(), path.as_path());
    Ok(())
}

#[tokio::test]
async fn test_save_message_id_rewrites_file() -> Result<(), Error> {
    let (_dir, path) = write_config(CONFIG);
    let store = JsonConfigStore::load(&path)?;

    store.save_message_id(FeedKind::GameServer, 1200000000000000042).await?;

    let raw = fs::read_to_string(&path)?;
    assert!(raw.contains("\n    \"BOT_TOKEN\""), "expected four-space indent:\n{raw}");
    let json: Value = serde_json::from_str(&raw)?;
    assert_eq!(json["srvStatus"]["lastMessageId"], "1200000000000000042");
    assert_eq!(json["cfxStatus"]["lastMessageId"], "1100000000000000004");
    assert_eq!(json["OWNER"], "ops-team");

    // A fresh load sees the written id.
    let reloaded = JsonConfigStore::load(&path)?.snapshot().await;
    assert_eq!(reloaded.last_message_id(FeedKind::GameServer)?, Some(1200000000000000042));
    Ok(())
}

#[tokio::test]
async fn test_successive_saves_keep_both_feeds() -> Result<(), Error> {
    let (_dir, path) = write_config(CONFIG);
    let store = JsonConfigStore::load(&path)?;

    store.save_message_id(FeedKind::GameServer, 11).await?;
    store.save_message_id(FeedKind::Platform, 22).await?;

    let reloaded = JsonConfigStore::load(&path)?.snapshot().await;
    assert_eq!(reloaded.last_message_id(FeedKind::GameServer)?, Some(11));
    assert_eq!(reloaded.last_message_id(FeedKind::Platform)?, Some(22));
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_dir, path) = write_config(&CONFIG.replace("1100000000000000001", "general"));
    assert!(matches!(JsonConfigStore::load(&path), Err(Error::Config(_))));

    let (_dir, path) = write_config("{ not json");
    assert!(matches!(JsonConfigStore::load(&path), Err(Error::Config(_))));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = TempDir::new().expect("temp dir");
    let result = JsonConfigStore::load(dir.path().join("nope.json"));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_config_without_token_loads_and_takes_env_token() -> Result<(), Error> {
    let (_dir, path) = write_config(&CONFIG.replace("  \"BOT_TOKEN\": \"token\",\n", ""));
    let store = JsonConfigStore::load(&path)?;
    let config = store.snapshot().await;

    assert_eq!(config.resolve_token(Some("from-env".into()))?, "from-env");
    assert!(matches!(config.resolve_token(None), Err(Error::Config(_))));
    Ok(())
}
