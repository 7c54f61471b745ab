use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    Shard,
    MessageSender,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_http::client::ClientBuilder;
use twilight_http::error::{Error as TwilightHttpError, ErrorType};
use twilight_model::http::attachment::Attachment;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};
use twilight_model::id::Id;

use cfxwatch_common::models::embed::MessageContent;
use cfxwatch_common::traits::api::ChatApi;

use crate::Error;
use crate::platforms::discord::embed::to_twilight_embed;
use crate::platforms::{ConnectionStatus, PlatformIntegration};

/// Drives one gateway shard. The only event we act on is READY, which flips
/// the readiness flag the status loops wait for.
async fn shard_runner(mut shard: Shard, ready_tx: watch::Sender<bool>) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(EventTypeFlags::READY | EventTypeFlags::RESUMED).await {
        match item {
            Ok(Event::Ready(ready)) => {
                info!(
                    "Shard {shard_id} => READY as {} (ID={}) in {} guild(s)",
                    ready.user.name,
                    ready.user.id,
                    ready.guilds.len()
                );
                ready_tx.send_replace(true);
            }
            Ok(Event::Resumed) => {
                debug!("Shard {shard_id} => session resumed");
            }
            Ok(event) => {
                trace!("Shard {shard_id} => unhandled event: {:?}", event.kind());
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

/// The Discord session: gateway shards for readiness plus the REST client
/// the status feeds post through.
pub struct DiscordPlatform {
    token: String,
    connection_status: ConnectionStatus,

    ready_tx: watch::Sender<bool>,

    shard_tasks: Vec<JoinHandle<()>>,
    shard_senders: Vec<MessageSender>,

    http: Option<Arc<HttpClient>>,
}

impl DiscordPlatform {
    pub fn new(token: String) -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            token,
            connection_status: ConnectionStatus::Disconnected,
            ready_tx,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
            http: None,
        }
    }

    /// Flips to `true` once a shard has received READY.
    pub fn ready_signal(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    /// REST handle for the feeds. Only available after `connect`.
    pub fn chat(&self) -> Result<DiscordChat, Error> {
        match &self.http {
            Some(http) => Ok(DiscordChat { http: http.clone() }),
            None => Err(Error::Platform("Discord HTTP client not available; connect first".into())),
        }
    }
}

#[async_trait]
impl PlatformIntegration for DiscordPlatform {
    async fn connect(&mut self) -> Result<(), Error> {
        if matches!(self.connection_status, ConnectionStatus::Connected) {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }
        if self.token.is_empty() {
            return Err(Error::Platform("Discord token is empty".into()));
        }

        let http_client = Arc::new(
            ClientBuilder::new()
                .token(self.token.clone())
                .timeout(Duration::from_secs(30))
                .build()
        );
        self.http = Some(http_client.clone());

        // Channels and messages are only touched over REST; GUILDS is enough
        // for the gateway to accept us and deliver READY.
        let config = Config::new(self.token.clone(), Intents::GUILDS);

        let shards = gateway::create_recommended(&http_client, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let ready_tx = self.ready_tx.clone();
            let handle = tokio::spawn(async move {
                shard_runner(shard, ready_tx).await;
            });
            self.shard_tasks.push(handle);
        }

        info!("(DiscordPlatform) Connected with {} shard(s)", self.shard_tasks.len());
        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for task in &mut self.shard_tasks {
            let _ = task.await;
        }

        self.shard_senders.clear();
        self.shard_tasks.clear();
        self.ready_tx.send_replace(false);

        info!("(DiscordPlatform) Disconnected");
        Ok(())
    }
}

/// Discord REST operations used by the message upserter.
#[derive(Clone)]
pub struct DiscordChat {
    http: Arc<HttpClient>,
}

fn channel_id(raw: u64) -> Result<Id<ChannelMarker>, Error> {
    Id::new_checked(raw).ok_or_else(|| Error::Platform(format!("Invalid channel ID: {raw}")))
}

fn message_id(raw: u64) -> Result<Id<MessageMarker>, Error> {
    Id::new_checked(raw).ok_or_else(|| Error::Platform(format!("Invalid message ID: {raw}")))
}

/// Maps twilight failures onto the not-found / forbidden / transient split
/// the upserter decides on.
pub fn classify_http_error(context: &str, err: TwilightHttpError) -> Error {
    let status = match err.kind() {
        ErrorType::Response { status, .. } => Some(status.get()),
        _ => None,
    };
    match status {
        Some(404) => Error::NotFound(format!("{context}: {err}")),
        Some(403) => Error::Forbidden(format!("{context}: {err}")),
        _ => Error::Platform(format!("{context}: {err}")),
    }
}

async fn load_attachments(content: &MessageContent) -> Result<Vec<Attachment>, Error> {
    let mut attachments = Vec::new();
    if let Some(file) = &content.attachment {
        let bytes = tokio::fs::read(&file.path).await?;
        attachments.push(Attachment::from_bytes(file.filename.clone(), bytes, 0));
    }
    Ok(attachments)
}

#[async_trait]
impl ChatApi for DiscordChat {
    async fn fetch_message(&self, channel: u64, message: u64) -> Result<(), Error> {
        self.http
            .message(channel_id(channel)?, message_id(message)?)
            .await
            .map_err(|e| classify_http_error("fetch message", e))?;
        Ok(())
    }

    async fn send_message(&self, channel: u64, content: &MessageContent) -> Result<u64, Error> {
        let embeds = [to_twilight_embed(&content.embed)?];
        let attachments = load_attachments(content).await?;

        let mut request = self.http.create_message(channel_id(channel)?).embeds(&embeds);
        if let Some(text) = content.text.as_deref() {
            request = request.content(text);
        }
        if !attachments.is_empty() {
            request = request.attachments(&attachments);
        }

        let response = request
            .await
            .map_err(|e| classify_http_error("send message", e))?;
        let message = response
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Error parsing sent message => {e}")))?;
        Ok(message.id.get())
    }

    async fn edit_message(
        &self,
        channel: u64,
        message: u64,
        content: &MessageContent,
    ) -> Result<(), Error> {
        let embeds = [to_twilight_embed(&content.embed)?];
        let attachments = load_attachments(content).await?;

        let mut request = self
            .http
            .update_message(channel_id(channel)?, message_id(message)?)
            .content(content.text.as_deref())
            .embeds(Some(&embeds));
        if !attachments.is_empty() {
            // Replaces the previous upload instead of stacking another file.
            request = request.attachments(&attachments);
        }

        request
            .await
            .map_err(|e| classify_http_error("edit message", e))?;
        Ok(())
    }

    async fn rename_channel(&self, channel: u64, name: &str) -> Result<(), Error> {
        self.http
            .update_channel(channel_id(channel)?)
            .name(name)
            .await
            .map_err(|e| classify_http_error("rename channel", e))?;
        Ok(())
    }
}
