// File: cfxwatch-core/tests/test_utils/mod.rs
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use cfxwatch_common::models::embed::MessageContent;
use cfxwatch_common::models::feed::FeedKind;
use cfxwatch_common::traits::api::{ChatApi, ConfigStore};
use cfxwatch_core::{Error, HttpClient};

/// How the fake chat should fail edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditFailure {
    None,
    Transient,
    Forbidden,
}

#[derive(Default)]
struct ChatState {
    /// message id => (channel id, latest content)
    messages: BTreeMap<u64, (u64, MessageContent)>,
    next_id: u64,
    sends: usize,
    edits: usize,
    renames: Vec<(u64, String)>,
    edit_failure: Option<EditFailure>,
    fail_renames: bool,
    history_hidden: bool,
}

/// In-memory chat channel list that behaves like Discord for the calls the
/// upserter makes.
pub struct FakeChat {
    state: Mutex<ChatState>,
}

impl FakeChat {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChatState {
                next_id: 1000,
                ..ChatState::default()
            }),
        }
    }

    pub fn delete_message(&self, message_id: u64) {
        self.state.lock().unwrap().messages.remove(&message_id);
    }

    pub fn set_edit_failure(&self, failure: EditFailure) {
        self.state.lock().unwrap().edit_failure = Some(failure);
    }

    /// Without Read Message History, lookups are refused but edits of the
    /// bot's own messages still work.
    pub fn set_history_hidden(&self, hidden: bool) {
        self.state.lock().unwrap().history_hidden = hidden;
    }

    pub fn set_fail_renames(&self, fail: bool) {
        self.state.lock().unwrap().fail_renames = fail;
    }

    pub fn messages_in(&self, channel_id: u64) -> Vec<u64> {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|(_, (ch, _))| *ch == channel_id)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn content_of(&self, message_id: u64) -> Option<MessageContent> {
        self.state
            .lock()
            .unwrap()
            .messages
            .get(&message_id)
            .map(|(_, c)| c.clone())
    }

    pub fn sends(&self) -> usize {
        self.state.lock().unwrap().sends
    }

    pub fn edits(&self) -> usize {
        self.state.lock().unwrap().edits
    }

    pub fn renames(&self) -> Vec<(u64, String)> {
        self.state.lock().unwrap().renames.clone()
    }
}

#[async_trait]
impl ChatApi for FakeChat {
    async fn fetch_message(&self, channel_id: u64, message_id: u64) -> Result<(), Error> {
        let st = self.state.lock().unwrap();
        if st.history_hidden {
            return Err(Error::Forbidden("Missing Access".into()));
        }
        match st.messages.get(&message_id) {
            Some((ch, _)) if *ch == channel_id => Ok(()),
            _ => Err(Error::NotFound(format!("Unknown Message {message_id}"))),
        }
    }

    async fn send_message(&self, channel_id: u64, content: &MessageContent) -> Result<u64, Error> {
        let mut st = self.state.lock().unwrap();
        st.next_id += 1;
        let id = st.next_id;
        st.messages.insert(id, (channel_id, content.clone()));
        st.sends += 1;
        Ok(id)
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &MessageContent,
    ) -> Result<(), Error> {
        let mut st = self.state.lock().unwrap();
        match st.edit_failure {
            Some(EditFailure::Transient) => return Err(Error::Platform("502 Bad Gateway".into())),
            Some(EditFailure::Forbidden) => return Err(Error::Forbidden("Missing Access".into())),
            _ => {}
        }
        match st.messages.get_mut(&message_id) {
            Some((ch, existing)) if *ch == channel_id => {
                *existing = content.clone();
            }
            _ => return Err(Error::NotFound(format!("Unknown Message {message_id}"))),
        }
        st.edits += 1;
        Ok(())
    }

    async fn rename_channel(&self, channel_id: u64, name: &str) -> Result<(), Error> {
        let mut st = self.state.lock().unwrap();
        if st.fail_renames {
            return Err(Error::Platform("rate limited".into()));
        }
        st.renames.push((channel_id, name.to_string()));
        Ok(())
    }
}

/// Records message ids instead of writing a file.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<HashMap<FeedKind, u64>>,
    writes: Mutex<usize>,
    fail: Mutex<bool>,
}

impl MemoryStore {
    pub fn saved(&self, feed: FeedKind) -> Option<u64> {
        self.saved.lock().unwrap().get(&feed).copied()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn save_message_id(&self, feed: FeedKind, message_id: u64) -> Result<(), Error> {
        if *self.fail.lock().unwrap() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only file system",
            )));
        }
        self.saved.lock().unwrap().insert(feed, message_id);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Serves canned bodies by URL; anything else is a 404.
#[derive(Default)]
pub struct FakeHttp {
    bodies: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get(&self, url: String, _headers: HashMap<String, String>) -> Result<String, Error> {
        self.requested.lock().unwrap().push(url.clone());
        self.bodies
            .get(&url)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("GET {url}")))
    }
}
