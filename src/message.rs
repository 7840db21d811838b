//! Domain types for conversations, members and messages.
//!
//! The service returns loosely shaped JSON records; gmkit converts them into
//! the types below as soon as they are decoded (see [`crate::api::wire`]).
//!
//! # Overview
//!
//! A [`Message`] is either a [`GroupMessage`] or a [`DirectMessage`]. The two
//! variants share most fields but differ in how the sender is identified: a
//! group message carries the conversation's `group_id` and a `sender_id` that
//! can be matched against the group's [`Member`] list, while a direct message
//! can only be matched by the sender's display `name`.
//!
//! # Examples
//!
//! ```
//! use gmkit::message::{GroupMessage, Message};
//!
//! let msg: Message = GroupMessage::new("101", "g1", "u1", 1_622_505_600)
//!     .with_name("Alice")
//!     .with_text("Hello, world!")
//!     .with_likes(["u2", "u3"])
//!     .into();
//!
//! assert_eq!(msg.sender_id(), "u1");
//! assert_eq!(msg.text(), Some("Hello, world!"));
//! assert_eq!(msg.like_count(), 2);
//! assert!(!msg.is_system());
//! ```

use std::fmt;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Sender id the service uses for membership changes, renames and the like.
pub const SYSTEM_SENDER: &str = "system";

/// Sender id the service uses for calendar event notices.
pub const CALENDAR_SENDER: &str = "calendar";

/// The two kinds of conversation the service hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    /// A group chat with many members
    Group,
    /// A two-party direct message thread
    Direct,
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationKind::Group => write!(f, "group"),
            ConversationKind::Direct => write!(f, "direct message"),
        }
    }
}

/// A resolved conversation reference.
///
/// Produced once from a human-readable name (see
/// [`ApiClient::resolve`](crate::api::ApiClient::resolve)) and then reused for
/// every page fetch and send.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Conversation {
    /// A group chat, addressed by its group id
    Group {
        /// Service-assigned group id
        group_id: String,
    },
    /// A direct thread, addressed by the other participant's user id
    Direct {
        /// User id of the other participant
        other_user_id: String,
    },
}

impl Conversation {
    /// Creates a group conversation reference.
    pub fn group(group_id: impl Into<String>) -> Self {
        Conversation::Group {
            group_id: group_id.into(),
        }
    }

    /// Creates a direct conversation reference.
    pub fn direct(other_user_id: impl Into<String>) -> Self {
        Conversation::Direct {
            other_user_id: other_user_id.into(),
        }
    }

    /// Returns the kind of conversation.
    pub fn kind(&self) -> ConversationKind {
        match self {
            Conversation::Group { .. } => ConversationKind::Group,
            Conversation::Direct { .. } => ConversationKind::Direct,
        }
    }

    /// Returns the service id (group id or other user's id).
    pub fn id(&self) -> &str {
        match self {
            Conversation::Group { group_id } => group_id,
            Conversation::Direct { other_user_id } => other_user_id,
        }
    }
}

/// A group member, as listed at query time.
///
/// The member list is a snapshot: people who left the group are absent even
/// if they posted in the past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Service-wide user id, stable across conversations
    pub user_id: String,
    /// Account display name
    pub name: String,
    /// Group-specific nickname
    pub nickname: String,
}

impl Member {
    /// Creates a member record.
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            nickname: nickname.into(),
        }
    }
}

/// A group the authenticated user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Service-assigned group id
    pub id: String,
    /// Group display name
    pub name: String,
    /// Member snapshot returned with the group listing
    pub members: Vec<Member>,
}

/// A direct-message thread the authenticated user takes part in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// User id of the other participant
    pub other_user_id: String,
    /// Display name of the other participant
    pub other_user_name: String,
}

/// A file or image attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment type as reported by the service (`image`, `video`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Location of the attachment, absent for mentions and similar markers
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub url: Option<String>,
}

impl Attachment {
    /// Creates an attachment with a url.
    pub fn new(kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            url: Some(url.into()),
        }
    }
}

/// Confirmation returned by the service after a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Id assigned to the new message
    pub message_id: String,
    /// Epoch seconds at which the service stored the message
    pub created_at: i64,
    /// Deduplication guid sent with the request
    pub source_guid: String,
}

/// A message posted to a group chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMessage {
    /// Opaque id, ordered by the service within the conversation
    pub id: String,
    /// Group the message belongs to
    pub group_id: String,
    /// Sender's user id, or `"system"` / `"calendar"` for service notices
    pub sender_id: String,
    /// Sender display name at posting time
    #[serde(default)]
    pub name: Option<String>,
    /// Epoch seconds
    pub created_at: i64,
    /// Message text, absent for attachment-only posts
    #[serde(default)]
    pub text: Option<String>,
    /// User ids of members who liked the message, in order
    #[serde(default)]
    pub favorited_by: Vec<String>,
    /// Attachments, absent when the service omits them
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

impl GroupMessage {
    /// Creates a group message with no text, likes or attachments.
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        sender_id: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            sender_id: sender_id.into(),
            name: None,
            created_at,
            text: None,
            favorited_by: Vec::new(),
            attachments: None,
        }
    }

    /// Builder method to set the sender display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method to set the text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method to set the likes.
    #[must_use]
    pub fn with_likes<I, S>(mut self, likers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorited_by = likers.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to add an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.get_or_insert_with(Vec::new).push(attachment);
        self
    }
}

/// A message posted to a direct thread.
///
/// Direct records carry no group membership, so the sender can only be
/// identified by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    /// Opaque id, ordered by the service within the conversation
    pub id: String,
    /// Sender's user id
    pub sender_id: String,
    /// Sender display name
    #[serde(default)]
    pub name: Option<String>,
    /// Epoch seconds
    pub created_at: i64,
    /// Message text, absent for attachment-only posts
    #[serde(default)]
    pub text: Option<String>,
    /// User ids of participants who liked the message
    #[serde(default)]
    pub favorited_by: Vec<String>,
    /// Attachments, absent when the service omits them
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

impl DirectMessage {
    /// Creates a direct message with no text, likes or attachments.
    pub fn new(id: impl Into<String>, sender_id: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            sender_id: sender_id.into(),
            name: None,
            created_at,
            text: None,
            favorited_by: Vec::new(),
            attachments: None,
        }
    }

    /// Builder method to set the sender display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder method to set the text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method to set the likes.
    #[must_use]
    pub fn with_likes<I, S>(mut self, likers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorited_by = likers.into_iter().map(Into::into).collect();
        self
    }
}

/// A message from either kind of conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Message {
    /// Posted to a group chat
    Group(GroupMessage),
    /// Posted to a direct thread
    Direct(DirectMessage),
}

impl From<GroupMessage> for Message {
    fn from(msg: GroupMessage) -> Self {
        Message::Group(msg)
    }
}

impl From<DirectMessage> for Message {
    fn from(msg: DirectMessage) -> Self {
        Message::Direct(msg)
    }
}

impl Message {
    /// Returns the message id.
    pub fn id(&self) -> &str {
        match self {
            Message::Group(m) => &m.id,
            Message::Direct(m) => &m.id,
        }
    }

    /// Returns the sender id.
    pub fn sender_id(&self) -> &str {
        match self {
            Message::Group(m) => &m.sender_id,
            Message::Direct(m) => &m.sender_id,
        }
    }

    /// Returns the sender display name, if the record carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Message::Group(m) => m.name.as_deref(),
            Message::Direct(m) => m.name.as_deref(),
        }
    }

    /// Returns the creation time in epoch seconds.
    pub fn created_at(&self) -> i64 {
        match self {
            Message::Group(m) => m.created_at,
            Message::Direct(m) => m.created_at,
        }
    }

    /// Returns the text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Message::Group(m) => m.text.as_deref(),
            Message::Direct(m) => m.text.as_deref(),
        }
    }

    /// Returns the user ids that liked this message.
    pub fn favorited_by(&self) -> &[String] {
        match self {
            Message::Group(m) => &m.favorited_by,
            Message::Direct(m) => &m.favorited_by,
        }
    }

    /// Returns the number of likes.
    pub fn like_count(&self) -> usize {
        self.favorited_by().len()
    }

    /// Returns the attachments (empty when the record has none).
    pub fn attachments(&self) -> &[Attachment] {
        let attachments = match self {
            Message::Group(m) => m.attachments.as_deref(),
            Message::Direct(m) => m.attachments.as_deref(),
        };
        attachments.unwrap_or_default()
    }

    /// Returns the group id for group messages.
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Message::Group(m) => Some(&m.group_id),
            Message::Direct(_) => None,
        }
    }

    /// Returns the kind of conversation this message came from.
    pub fn kind(&self) -> ConversationKind {
        match self {
            Message::Group(_) => ConversationKind::Group,
            Message::Direct(_) => ConversationKind::Direct,
        }
    }

    /// Returns `true` for service notices (`sender_id == "system"`).
    pub fn is_system(&self) -> bool {
        self.sender_id() == SYSTEM_SENDER
    }

    /// Returns the creation time in the local time zone.
    pub fn local_datetime(&self) -> Option<DateTime<Local>> {
        local_datetime(self.created_at())
    }

    /// Returns the local calendar date the message was posted on.
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.local_datetime().map(|dt| dt.date_naive())
    }
}

/// Converts epoch seconds into a local date-time.
///
/// Returns `None` for timestamps outside chrono's representable range.
pub fn local_datetime(epoch_secs: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp(epoch_secs, 0).map(|utc| utc.with_timezone(&Local))
}
