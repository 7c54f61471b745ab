use std::fmt;

use serde::{Deserialize, Serialize};

/// The two status feeds the bot republishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedKind {
    /// A single FiveM/RedM server from the Cfx.re server list.
    GameServer,
    /// The Cfx.re platform status page.
    Platform,
}

impl FeedKind {
    /// Key of this feed's record in the config document.
    pub fn config_key(&self) -> &'static str {
        match self {
            FeedKind::GameServer => "srvStatus",
            FeedKind::Platform => "cfxStatus",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::GameServer => write!(f, "game-server"),
            FeedKind::Platform => write!(f, "platform"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Online,
    Offline,
}

impl Availability {
    /// Emoji shown in the channel name and embed text.
    pub fn emoji(&self) -> &'static str {
        match self {
            Availability::Online => "🟢",
            Availability::Offline => "🔴",
        }
    }

    /// Embed color used for this state.
    pub fn color(&self) -> u32 {
        match self {
            Availability::Online => 6205745,
            Availability::Offline => 16711680,
        }
    }
}

/// Per-feed state carried from one tick to the next.
///
/// Only `last_message_id` outlives the process (through the config store);
/// the rest starts over on every restart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub last_message_id: Option<u64>,
    pub last_availability: Option<Availability>,
    pub elapsed_minutes: u64,
    /// Display name most recently applied to the feed's channel.
    pub last_channel_name: Option<String>,
}

impl FeedState {
    pub fn new(last_message_id: Option<u64>) -> Self {
        Self {
            last_message_id,
            ..Self::default()
        }
    }

    /// Adds one tick's worth of minutes, then zeroes the counter if the
    /// classification differs from the previous tick's. Returns the value
    /// to display.
    ///
    /// A fresh state has no previous classification, so its first tick
    /// always reads zero.
    pub fn advance(&mut self, current: Availability, increment_minutes: u64) -> u64 {
        self.elapsed_minutes = self.elapsed_minutes.saturating_add(increment_minutes);
        if self.last_availability != Some(current) {
            self.elapsed_minutes = 0;
        }
        self.last_availability = Some(current);
        self.elapsed_minutes
    }
}

/// Renders a minute count as `"H hours and M minutes"`.
pub fn format_elapsed(total_minutes: u64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{hours} hours and {minutes} minutes")
}
