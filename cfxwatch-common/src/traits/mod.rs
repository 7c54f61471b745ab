pub mod api;

pub use api::{ChatApi, ConfigStore, PlatformStatusSource, Screenshotter, ServerQuery};
