pub mod config;
pub mod embed;
pub mod feed;
pub mod status;

pub use config::{BotConfig, HttpSettings, PlatformFeedConfig, ScheduleConfig, ScreenshotConfig, ServerFeedConfig};
pub use embed::{EmbedField, FileAttachment, MessageContent, StatusEmbed};
pub use feed::{Availability, FeedKind, FeedState, format_elapsed};
pub use status::{PlatformStatus, ServerInfo, StatusComponent};
