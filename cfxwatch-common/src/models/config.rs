use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::models::feed::FeedKind;

/// The on-disk `config.json`. Key names match the layout the bot has always
/// used, so existing files keep working; keys this struct does not know are
/// carried through `extra` and written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(rename = "BOT_TOKEN", default)]
    pub bot_token: String,

    #[serde(rename = "srvStatus")]
    pub srv_status: ServerFeedConfig,

    #[serde(rename = "cfxStatus")]
    pub cfx_status: PlatformFeedConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub screenshot: ScreenshotConfig,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerFeedConfig {
    #[serde(rename = "SERVER_ID")]
    pub server_id: String,

    #[serde(rename = "CHANNEL_ID")]
    pub channel_id: String,

    #[serde(rename = "CHANNEL_NAME")]
    pub channel_name: String,

    #[serde(rename = "lastMessageId", default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformFeedConfig {
    #[serde(rename = "CHANNEL_ID")]
    pub channel_id: String,

    #[serde(rename = "CHANNEL_NAME")]
    pub channel_name: String,

    #[serde(rename = "lastMessageId", default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleConfig {
    pub tick_interval_secs: u64,
    /// Minutes added to the uptime/downtime counter per tick. Kept separate
    /// from the interval; see `is_consistent`.
    pub elapsed_increment_minutes: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 300,
            elapsed_increment_minutes: 5,
        }
    }
}

impl ScheduleConfig {
    /// Whether the counter increment matches the real time between ticks.
    pub fn is_consistent(&self) -> bool {
        self.tick_interval_secs == self.elapsed_increment_minutes * 60
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenshotConfig {
    pub status_page_url: String,
    pub path: String,
    /// Element clicked to unfold the "game services" group before capture.
    pub expand_selector: String,
    pub settle_delay_ms: u64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            status_page_url: "https://status.cfx.re/".to_string(),
            path: "screenshot.png".to_string(),
            expand_selector: ".component-inner-container.status-green.showcased .group-parent-indicator"
                .to_string(),
            settle_delay_ms: 1000,
            viewport_width: 1000,
            viewport_height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpSettings {
    pub servers_api: String,
    pub status_api: String,
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            servers_api: "https://servers-frontend.fivem.net/api/servers/single".to_string(),
            status_api: "https://status.cfx.re/api/v2".to_string(),
            timeout_secs: 30,
        }
    }
}

impl BotConfig {
    /// Checks the things startup cannot recover from.
    pub fn validate(&self) -> Result<(), Error> {
        if self.srv_status.server_id.trim().is_empty() {
            return Err(Error::Config("srvStatus.SERVER_ID is empty".into()));
        }
        if self.schedule.tick_interval_secs == 0 {
            return Err(Error::Config("schedule.tickIntervalSecs must be positive".into()));
        }
        self.channel_id(FeedKind::GameServer)?;
        self.channel_id(FeedKind::Platform)?;
        self.last_message_id(FeedKind::GameServer)?;
        self.last_message_id(FeedKind::Platform)?;
        Ok(())
    }

    /// Picks the bot token: a non-blank `env` value (`DISCORD_TOKEN`) wins
    /// over `BOT_TOKEN`. Fails only when both are blank.
    pub fn resolve_token(&self, env: Option<String>) -> Result<String, Error> {
        if let Some(token) = env.filter(|t| !t.trim().is_empty()) {
            return Ok(token);
        }
        if self.bot_token.trim().is_empty() {
            return Err(Error::Config(
                "no bot token: set DISCORD_TOKEN or BOT_TOKEN in the config".into(),
            ));
        }
        Ok(self.bot_token.clone())
    }

    pub fn channel_id(&self, feed: FeedKind) -> Result<u64, Error> {
        let raw = match feed {
            FeedKind::GameServer => &self.srv_status.channel_id,
            FeedKind::Platform => &self.cfx_status.channel_id,
        };
        parse_snowflake(raw)
            .ok_or_else(|| Error::Config(format!("{}.CHANNEL_ID is not a valid id: '{raw}'", feed.config_key())))
    }

    pub fn channel_name(&self, feed: FeedKind) -> &str {
        match feed {
            FeedKind::GameServer => &self.srv_status.channel_name,
            FeedKind::Platform => &self.cfx_status.channel_name,
        }
    }

    pub fn last_message_id(&self, feed: FeedKind) -> Result<Option<u64>, Error> {
        let raw = match feed {
            FeedKind::GameServer => self.srv_status.last_message_id.as_deref(),
            FeedKind::Platform => self.cfx_status.last_message_id.as_deref(),
        };
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_snowflake(s).map(Some).ok_or_else(|| {
                Error::Config(format!("{}.lastMessageId is not a valid id: '{s}'", feed.config_key()))
            }),
        }
    }

    pub fn set_last_message_id(&mut self, feed: FeedKind, message_id: u64) {
        let value = Some(message_id.to_string());
        match feed {
            FeedKind::GameServer => self.srv_status.last_message_id = value,
            FeedKind::Platform => self.cfx_status.last_message_id = value,
        }
    }
}

/// Discord ids are non-zero u64s, stored as strings in JSON.
fn parse_snowflake(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id != 0)
}
