use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Platform-neutral description of a status embed. The Discord adapter turns
/// it into a twilight `Embed` right before sending.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEmbed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<EmbedField>,
    /// File name of an attachment shown as the embed image.
    pub image: Option<String>,
    pub footer: Option<String>,
}

impl StatusEmbed {
    pub fn new(title: &str, description: &str, color: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            color,
            timestamp,
            fields: Vec::new(),
            image: None,
            footer: None,
        }
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.push(EmbedField {
            name: name.to_string(),
            value: value.to_string(),
            inline: false,
        });
        self
    }

    pub fn image(mut self, attachment_name: &str) -> Self {
        self.image = Some(attachment_name.to_string());
        self
    }

    pub fn footer(mut self, text: &str) -> Self {
        self.footer = Some(text.to_string());
        self
    }

    /// Value of the first field with this name.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A local file uploaded with the message.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttachment {
    pub filename: String,
    pub path: PathBuf,
}

/// Everything that goes into one status message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageContent {
    pub text: Option<String>,
    pub embed: StatusEmbed,
    pub attachment: Option<FileAttachment>,
}

impl MessageContent {
    pub fn embed_only(embed: StatusEmbed) -> Self {
        Self {
            text: None,
            embed,
            attachment: None,
        }
    }
}
