// File: cfxwatch-core/src/services/platform_status.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use tracing::info;

use cfxwatch_common::models::config::BotConfig;
use cfxwatch_common::models::embed::{FileAttachment, MessageContent, StatusEmbed};
use cfxwatch_common::models::feed::{Availability, FeedKind, FeedState};
use cfxwatch_common::models::status::{PlatformStatus, StatusComponent};
use cfxwatch_common::traits::api::{PlatformStatusSource, Screenshotter};

use crate::Error;
use crate::services::StatusFeed;
use crate::services::upsert::{MessageUpserter, UpsertOutcome};

/// Discord's cap on an embed field value, in characters.
pub const FIELD_VALUE_LIMIT: usize = 1024;

const DEFAULT_ATTACHMENT_NAME: &str = "screenshot.png";

#[derive(Debug, Clone)]
pub struct PlatformStatusSettings {
    pub channel_id: u64,
    pub channel_name: String,
}

impl PlatformStatusSettings {
    pub fn from_config(config: &BotConfig) -> Result<Self, Error> {
        Ok(Self {
            channel_id: config.channel_id(FeedKind::Platform)?,
            channel_name: config.cfx_status.channel_name.clone(),
        })
    }
}

pub fn availability_of(status: &PlatformStatus) -> Availability {
    if status.everything_ok {
        Availability::Online
    } else {
        Availability::Offline
    }
}

/// Plain-text line posted above the embed.
pub fn status_text(status: &PlatformStatus) -> &'static str {
    if status.everything_ok {
        "All Cfx.re systems are operational"
    } else {
        "Cfx.re is experiencing issues"
    }
}

pub fn component_line(component: &StatusComponent) -> String {
    let emoji = if component.is_operational() {
        Availability::Online.emoji()
    } else {
        Availability::Offline.emoji()
    };
    format!("{} **{}**: {}", emoji, component.name, component.status)
}

/// One line per component, cut at a line boundary to fit a field value.
pub fn component_block(components: &[StatusComponent]) -> String {
    if components.is_empty() {
        return "No components reported.".to_string();
    }

    let budget = FIELD_VALUE_LIMIT - 2;
    let mut block = String::new();
    let mut used = 0;
    for line in components.iter().map(component_line) {
        let sep = if block.is_empty() { 0 } else { 1 };
        let len = line.chars().count();
        if block.is_empty() && len > budget {
            // A single line that cannot fit is cut rather than dropped.
            block.extend(line.chars().take(FIELD_VALUE_LIMIT - 1));
            block.push('…');
            break;
        }
        if used + sep + len > budget {
            block.push_str("\n…");
            break;
        }
        if sep == 1 {
            block.push('\n');
        }
        block.push_str(&line);
        used += sep + len;
    }
    block
}

pub fn status_embed(
    status: &PlatformStatus,
    components: &[StatusComponent],
    attachment_name: &str,
    now: DateTime<Utc>,
) -> StatusEmbed {
    let availability = availability_of(status);
    let summary = if status.everything_ok {
        "All Systems Operational"
    } else {
        "Experiencing Issues"
    };
    let updated = now.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");

    StatusEmbed::new(
        "Cfx.re Status",
        &format!("{} **API Status**: {}", availability.emoji(), summary),
        availability.color(),
        now,
    )
    .field("Component Status", &component_block(components))
    .image(attachment_name)
    .footer(&format!("Last updated at: {updated}"))
}

/// Platform feed: Cfx.re health, component list and a status page snapshot.
pub struct PlatformStatusFeed {
    source: Arc<dyn PlatformStatusSource>,
    screenshotter: Arc<dyn Screenshotter>,
    upserter: Arc<MessageUpserter>,
    settings: PlatformStatusSettings,
}

impl PlatformStatusFeed {
    pub fn new(
        source: Arc<dyn PlatformStatusSource>,
        screenshotter: Arc<dyn Screenshotter>,
        upserter: Arc<MessageUpserter>,
        settings: PlatformStatusSettings,
    ) -> Self {
        Self {
            source,
            screenshotter,
            upserter,
            settings,
        }
    }
}

#[async_trait]
impl StatusFeed for PlatformStatusFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Platform
    }

    /// Any failure before the upsert (status fetch, snapshot, component
    /// fetch) ends the tick with nothing posted.
    async fn tick(&self, state: &mut FeedState) -> Result<UpsertOutcome, Error> {
        let status = self.source.fetch_status().await?;
        let screenshot = self.screenshotter.capture().await?;
        let components = self.source.fetch_components().await?;

        let availability = availability_of(&status);
        if let Some(previous) = state.last_availability {
            if previous != availability {
                info!("Cfx.re status changed: indicator='{}' ({})", status.indicator, status.description);
            }
        }
        state.last_availability = Some(availability);

        let filename = screenshot
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_ATTACHMENT_NAME)
            .to_string();

        let content = MessageContent {
            text: Some(status_text(&status).to_string()),
            embed: status_embed(&status, &components, &filename, Utc::now()),
            attachment: Some(FileAttachment {
                filename,
                path: screenshot,
            }),
        };

        let display_name = format!("{} {}", availability.emoji(), self.settings.channel_name);
        self.upserter
            .upsert(
                FeedKind::Platform,
                self.settings.channel_id,
                &display_name,
                state,
                &content,
            )
            .await
    }
}
