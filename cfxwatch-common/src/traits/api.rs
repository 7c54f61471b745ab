use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Error;
use crate::models::embed::MessageContent;
use crate::models::feed::FeedKind;
use crate::models::status::{PlatformStatus, ServerInfo, StatusComponent};

/// The slice of a chat platform the status feeds need.
///
/// Implementations map "message/channel gone" to `Error::NotFound` and
/// "not allowed" to `Error::Forbidden`; everything else is transient.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn fetch_message(&self, channel_id: u64, message_id: u64) -> Result<(), Error>;
    /// Sends a new message and returns its id.
    async fn send_message(&self, channel_id: u64, content: &MessageContent) -> Result<u64, Error>;
    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &MessageContent,
    ) -> Result<(), Error>;
    async fn rename_channel(&self, channel_id: u64, name: &str) -> Result<(), Error>;
}

/// Looks up a game server by its join id. Fails when the server is offline
/// or cannot be reached.
#[async_trait]
pub trait ServerQuery: Send + Sync {
    async fn fetch_server(&self, server_id: &str) -> Result<ServerInfo, Error>;
}

#[async_trait]
pub trait PlatformStatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<PlatformStatus, Error>;
    async fn fetch_components(&self) -> Result<Vec<StatusComponent>, Error>;
}

/// Captures the public status page to a local image file.
#[async_trait]
pub trait Screenshotter: Send + Sync {
    async fn capture(&self) -> Result<PathBuf, Error>;
}

/// Write-back side of the configuration document.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Records `message_id` as the feed's message and rewrites the document.
    async fn save_message_id(&self, feed: FeedKind, message_id: u64) -> Result<(), Error>;
}
