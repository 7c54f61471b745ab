// File: cfxwatch-core/src/services/server_status.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use cfxwatch_common::models::config::BotConfig;
use cfxwatch_common::models::embed::{MessageContent, StatusEmbed};
use cfxwatch_common::models::feed::{Availability, FeedKind, FeedState, format_elapsed};
use cfxwatch_common::models::status::ServerInfo;
use cfxwatch_common::traits::api::ServerQuery;

use crate::Error;
use crate::services::StatusFeed;
use crate::services::upsert::{MessageUpserter, UpsertOutcome};

pub const ONLINE_DESCRIPTION: &str = "🟢 The server is currently online and operational.";
pub const OFFLINE_DESCRIPTION: &str =
    "🔴 The server is currently offline, we are working on getting it back online.";

#[derive(Debug, Clone)]
pub struct ServerStatusSettings {
    pub server_id: String,
    pub channel_id: u64,
    pub channel_name: String,
    pub elapsed_increment_minutes: u64,
}

impl ServerStatusSettings {
    pub fn from_config(config: &BotConfig) -> Result<Self, Error> {
        Ok(Self {
            server_id: config.srv_status.server_id.clone(),
            channel_id: config.channel_id(FeedKind::GameServer)?,
            channel_name: config.srv_status.channel_name.clone(),
            elapsed_increment_minutes: config.schedule.elapsed_increment_minutes,
        })
    }
}

/// Embed for a server that answered the lookup.
pub fn online_embed(server_id: &str, info: &ServerInfo, elapsed_minutes: u64, now: DateTime<Utc>) -> StatusEmbed {
    StatusEmbed::new("Server Status", ONLINE_DESCRIPTION, Availability::Online.color(), now)
        .field("Players", &format!("{} / {}", info.clients, info.max_clients))
        .field("Connect", &format!("[Here](https://cfx.re/join/{server_id})"))
        .field("Uptime", &format_elapsed(elapsed_minutes))
}

pub fn offline_embed(elapsed_minutes: u64, now: DateTime<Utc>) -> StatusEmbed {
    StatusEmbed::new("Server Status", OFFLINE_DESCRIPTION, Availability::Offline.color(), now)
        .field("Downtime", &format_elapsed(elapsed_minutes))
}

/// Game-server feed: liveness, player count and uptime/downtime of one server.
pub struct ServerStatusFeed {
    query: Arc<dyn ServerQuery>,
    upserter: Arc<MessageUpserter>,
    settings: ServerStatusSettings,
}

impl ServerStatusFeed {
    pub fn new(
        query: Arc<dyn ServerQuery>,
        upserter: Arc<MessageUpserter>,
        settings: ServerStatusSettings,
    ) -> Self {
        Self {
            query,
            upserter,
            settings,
        }
    }
}

#[async_trait]
impl StatusFeed for ServerStatusFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::GameServer
    }

    async fn tick(&self, state: &mut FeedState) -> Result<UpsertOutcome, Error> {
        let lookup = self.query.fetch_server(&self.settings.server_id).await;
        let availability = match &lookup {
            Ok(_) => Availability::Online,
            Err(e) => {
                debug!("Server '{}' lookup failed, treating as offline: {}", self.settings.server_id, e);
                Availability::Offline
            }
        };

        let previous = state.last_availability;
        let elapsed = state.advance(availability, self.settings.elapsed_increment_minutes);
        if previous.is_some() && previous != Some(availability) {
            info!("Server '{}' is now {:?}", self.settings.server_id, availability);
        }

        let now = Utc::now();
        let embed = match &lookup {
            Ok(info) => online_embed(&self.settings.server_id, info, elapsed, now),
            Err(_) => offline_embed(elapsed, now),
        };

        let display_name = format!("{} {}", availability.emoji(), self.settings.channel_name);
        self.upserter
            .upsert(
                FeedKind::GameServer,
                self.settings.channel_id,
                &display_name,
                state,
                &MessageContent::embed_only(embed),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_embed_fields() {
        let info = ServerInfo {
            hostname: "My RP".into(),
            clients: 5,
            max_clients: 32,
        };
        let embed = online_embed("abc123", &info, 125, Utc::now());
        assert_eq!(embed.title, "Server Status");
        assert_eq!(embed.description, ONLINE_DESCRIPTION);
        assert_eq!(embed.color, 6205745);
        assert_eq!(embed.field_value("Players"), Some("5 / 32"));
        assert_eq!(embed.field_value("Connect"), Some("[Here](https://cfx.re/join/abc123)"));
        assert_eq!(embed.field_value("Uptime"), Some("2 hours and 5 minutes"));
        assert!(embed.field_value("Downtime").is_none());
    }

    #[test]
    fn offline_embed_fields() {
        let embed = offline_embed(0, Utc::now());
        assert_eq!(embed.description, OFFLINE_DESCRIPTION);
        assert_eq!(embed.color, 16711680);
        assert_eq!(embed.fields.len(), 1);
        assert_eq!(embed.field_value("Downtime"), Some("0 hours and 0 minutes"));
    }
}
