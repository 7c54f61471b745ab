// File: cfxwatch-core/src/services/upsert.rs

use std::sync::Arc;

use tracing::{debug, info, warn};

use cfxwatch_common::models::embed::MessageContent;
use cfxwatch_common::models::feed::{FeedKind, FeedState};
use cfxwatch_common::traits::api::{ChatApi, ConfigStore};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The remembered message was edited in place.
    Edited(u64),
    /// A new message was posted, replacing `replaced` if there was one.
    Sent { id: u64, replaced: Option<u64> },
}

impl UpsertOutcome {
    pub fn message_id(&self) -> u64 {
        match self {
            UpsertOutcome::Edited(id) => *id,
            UpsertOutcome::Sent { id, .. } => *id,
        }
    }
}

/// Keeps exactly one status message per feed: edits the remembered message,
/// or posts a new one and remembers that instead.
pub struct MessageUpserter {
    chat: Arc<dyn ChatApi>,
    store: Arc<dyn ConfigStore>,
}

impl MessageUpserter {
    pub fn new(chat: Arc<dyn ChatApi>, store: Arc<dyn ConfigStore>) -> Self {
        Self { chat, store }
    }

    /// Edit-or-create `content` in `channel_id`, then point the channel name
    /// at `display_name`.
    ///
    /// Only a message that is gone (404) or off-limits (403) is replaced.
    /// Other failures are returned as-is: the old message may well still be
    /// live, and posting now would leave two.
    pub async fn upsert(
        &self,
        feed: FeedKind,
        channel_id: u64,
        display_name: &str,
        state: &mut FeedState,
        content: &MessageContent,
    ) -> Result<UpsertOutcome, Error> {
        let outcome = match state.last_message_id {
            None => self.send_new(feed, channel_id, state, content, None).await?,
            Some(message_id) => match self.edit_existing(channel_id, message_id, content).await {
                Ok(()) => {
                    debug!("[{feed}] edited message {message_id} in channel {channel_id}");
                    UpsertOutcome::Edited(message_id)
                }
                Err(e) if e.is_permanent_miss() => {
                    warn!("[{feed}] message {message_id} can no longer be edited ({e}); sending a replacement");
                    self.send_new(feed, channel_id, state, content, Some(message_id)).await?
                }
                Err(e) => return Err(e),
            },
        };

        self.sync_channel_name(feed, channel_id, display_name, state).await;
        Ok(outcome)
    }

    /// Looks the message up, then edits it. Only a 404 from the lookup means
    /// the message is gone; a 403 there just means the bot cannot read
    /// history, and the edit decides.
    async fn edit_existing(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &MessageContent,
    ) -> Result<(), Error> {
        match self.chat.fetch_message(channel_id, message_id).await {
            Ok(()) => {}
            Err(Error::Forbidden(e)) => {
                debug!("message {message_id} not readable ({e}); editing blind");
            }
            Err(e) => return Err(e),
        }
        self.chat.edit_message(channel_id, message_id, content).await
    }

    async fn send_new(
        &self,
        feed: FeedKind,
        channel_id: u64,
        state: &mut FeedState,
        content: &MessageContent,
        replaced: Option<u64>,
    ) -> Result<UpsertOutcome, Error> {
        let id = self.chat.send_message(channel_id, content).await?;
        // The in-memory id is what the next tick reads; the file is only
        // there for restarts.
        state.last_message_id = Some(id);
        info!("[{feed}] posted status message {id} in channel {channel_id}");

        if let Err(e) = self.store.save_message_id(feed, id).await {
            warn!("[{feed}] could not persist message id {id}: {e}");
        }
        Ok(UpsertOutcome::Sent { id, replaced })
    }

    /// Renames the channel unless it already carries `name`. Failures are
    /// logged and retried next tick.
    pub async fn sync_channel_name(
        &self,
        feed: FeedKind,
        channel_id: u64,
        name: &str,
        state: &mut FeedState,
    ) {
        if state.last_channel_name.as_deref() == Some(name) {
            return;
        }
        match self.chat.rename_channel(channel_id, name).await {
            Ok(()) => {
                info!("[{feed}] channel {channel_id} renamed to '{name}'");
                state.last_channel_name = Some(name.to_string());
            }
            Err(e) => {
                warn!("[{feed}] failed to rename channel {channel_id} to '{name}': {e}");
            }
        }
    }
}
