// src/services/mod.rs

use async_trait::async_trait;

use cfxwatch_common::models::feed::{FeedKind, FeedState};

use crate::Error;

pub mod platform_status;
pub mod server_status;
pub mod upsert;

pub use platform_status::{PlatformStatusFeed, PlatformStatusSettings};
pub use server_status::{ServerStatusFeed, ServerStatusSettings};
pub use upsert::{MessageUpserter, UpsertOutcome};

/// One status pipeline: poll a source, render, upsert the feed's message.
#[async_trait]
pub trait StatusFeed: Send + Sync {
    fn kind(&self) -> FeedKind;

    /// Runs a single tick against `state`. Whatever the tick managed to
    /// record in `state` (a replacement message id, the new classification)
    /// stays there even when it returns an error.
    async fn tick(&self, state: &mut FeedState) -> Result<UpsertOutcome, Error>;
}
