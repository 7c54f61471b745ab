// cfxwatch-core/src/config.rs

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};

use cfxwatch_common::models::config::BotConfig;
use cfxwatch_common::models::feed::FeedKind;
use cfxwatch_common::traits::api::ConfigStore;

use crate::Error;

/// `config.json` on disk plus the in-memory copy every write-back starts from.
///
/// Each save rewrites the whole document through a temp file in the same
/// directory, so a crash mid-write leaves the previous file intact.
pub struct JsonConfigStore {
    path: PathBuf,
    document: Mutex<BotConfig>,
}

impl JsonConfigStore {
    /// Reads and validates the document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: BotConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(Self::new(path, config))
    }

    pub fn new(path: PathBuf, config: BotConfig) -> Self {
        Self {
            path,
            document: Mutex::new(config),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A copy of the current document.
    pub async fn snapshot(&self) -> BotConfig {
        self.document.lock().await.clone()
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn save_message_id(&self, feed: FeedKind, message_id: u64) -> Result<(), Error> {
        let mut doc = self.document.lock().await;
        doc.set_last_message_id(feed, message_id);
        write_document(&self.path, &doc)?;
        debug!("Persisted {}.lastMessageId={} to {}", feed.config_key(), message_id, self.path.display());
        Ok(())
    }
}

/// Serializes with four-space indentation, the layout hand-edited configs use.
fn render_document(config: &BotConfig) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

fn write_document(path: &Path, config: &BotConfig) -> Result<(), Error> {
    let bytes = render_document(config)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
