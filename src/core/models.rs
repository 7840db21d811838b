//! Export models shared by the output writers.

use std::collections::HashMap;

use serde::Serialize;

use crate::message::Message;

/// Date format used in every export.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Configuration for exported messages.
/// Controls which optional columns are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Include message IDs in output
    pub include_ids: bool,
    /// Include like counts in output
    pub include_likes: bool,
    /// Include attachment URLs in output
    pub include_attachments: bool,
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables every optional column.
    pub fn all() -> Self {
        Self {
            include_ids: true,
            include_likes: true,
            include_attachments: true,
        }
    }

    #[must_use]
    pub fn with_ids(mut self) -> Self {
        self.include_ids = true;
        self
    }

    #[must_use]
    pub fn with_likes(mut self) -> Self {
        self.include_likes = true;
        self
    }

    #[must_use]
    pub fn with_attachments(mut self) -> Self {
        self.include_attachments = true;
        self
    }
}

/// One exported message, flattened and with optional fields dropped
/// according to [`OutputConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Local date-time, empty when the timestamp is out of range
    pub date: String,
    pub sender: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

impl ExportRecord {
    /// Flattens a message.
    ///
    /// The sender is the member name from `names` when the sender id is
    /// known there, otherwise the name carried by the message, otherwise
    /// the raw sender id.
    pub fn from_message(
        msg: &Message,
        config: &OutputConfig,
        names: &HashMap<String, String>,
    ) -> Self {
        let sender = names
            .get(msg.sender_id())
            .map(String::as_str)
            .or(msg.name())
            .unwrap_or(msg.sender_id())
            .to_string();

        Self {
            id: config.include_ids.then(|| msg.id().to_string()),
            date: msg
                .local_datetime()
                .map(|dt| dt.format(EXPORT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            sender,
            text: msg.text().unwrap_or_default().to_string(),
            likes: config.include_likes.then(|| msg.like_count()),
            attachments: config.include_attachments.then(|| {
                msg.attachments()
                    .iter()
                    .filter_map(|a| a.url.clone())
                    .collect()
            }),
        }
    }
}

/// Flattens a batch of messages, preserving order.
pub fn export_records(
    messages: &[Message],
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Vec<ExportRecord> {
    messages
        .iter()
        .map(|msg| ExportRecord::from_message(msg, config, names))
        .collect()
}
