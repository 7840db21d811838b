//! Raw response shapes of the REST API.
//!
//! The service wraps every payload in a `{"response": ..., "meta": ...}`
//! envelope and is loose about optional fields. These structs absorb that
//! looseness; conversion into [`crate::message`] types happens right after
//! decoding.

use serde::{Deserialize, Deserializer};

use crate::message::{
    Attachment, Chat, Conversation, DeliveryReceipt, DirectMessage, Group, GroupMessage, Member,
    Message,
};

/// Response envelope. `response` is `null` on some empty results.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: Option<T>,
}

/// Group record from `GET /groups` and `GET /groups/:id`.
#[derive(Debug, Deserialize)]
pub struct RawGroup {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<RawMember>,
}

/// Member record embedded in a group.
#[derive(Debug, Deserialize)]
pub struct RawMember {
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// Direct-thread record from `GET /chats`.
#[derive(Debug, Deserialize)]
pub struct RawChat {
    pub other_user: RawUser,
}

/// The other participant of a direct thread.
#[derive(Debug, Deserialize)]
pub struct RawUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Message page. Group pages use `messages`, direct pages `direct_messages`.
#[derive(Debug, Default, Deserialize)]
pub struct RawMessagePage {
    #[serde(default)]
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub direct_messages: Vec<RawMessage>,
}

impl RawMessagePage {
    /// Takes whichever list the endpoint filled.
    pub fn into_messages(self) -> Vec<RawMessage> {
        if self.direct_messages.is_empty() {
            self.messages
        } else {
            self.direct_messages
        }
    }
}

/// Message record, group or direct.
#[derive(Debug, Deserialize)]
pub struct RawMessage {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub sender_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub favorited_by: Option<Vec<String>>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

impl RawMessage {
    /// Converts into a domain message belonging to `conversation`.
    ///
    /// Group records missing their `group_id` inherit the conversation's id.
    pub fn into_message(self, conversation: &Conversation) -> Message {
        let sender_id = self.sender_id.unwrap_or_default();
        let favorited_by = self.favorited_by.unwrap_or_default();
        match conversation {
            Conversation::Group { group_id } => Message::Group(GroupMessage {
                id: self.id,
                group_id: self.group_id.unwrap_or_else(|| group_id.clone()),
                sender_id,
                name: self.name,
                created_at: self.created_at,
                text: self.text,
                favorited_by,
                attachments: self.attachments,
            }),
            Conversation::Direct { .. } => Message::Direct(DirectMessage {
                id: self.id,
                sender_id,
                name: self.name,
                created_at: self.created_at,
                text: self.text,
                favorited_by,
                attachments: self.attachments,
            }),
        }
    }
}

/// Body of a successful send. Only one of the two fields is present.
#[derive(Debug, Deserialize)]
pub struct RawSent {
    #[serde(default)]
    pub message: Option<RawMessage>,
    #[serde(default)]
    pub direct_message: Option<RawMessage>,
}

impl RawSent {
    /// Builds a receipt from whichever record the service echoed back.
    pub fn into_receipt(self, source_guid: &str) -> Option<DeliveryReceipt> {
        self.message
            .or(self.direct_message)
            .map(|raw| DeliveryReceipt {
                message_id: raw.id,
                created_at: raw.created_at,
                source_guid: source_guid.to_string(),
            })
    }
}

impl From<RawMember> for Member {
    fn from(raw: RawMember) -> Self {
        Member {
            user_id: raw.user_id,
            name: raw.name.unwrap_or_default(),
            nickname: raw.nickname.unwrap_or_default(),
        }
    }
}

impl From<RawGroup> for Group {
    fn from(raw: RawGroup) -> Self {
        Group {
            id: raw.id,
            name: raw.name,
            members: raw.members.into_iter().map(Member::from).collect(),
        }
    }
}

impl From<RawChat> for Chat {
    fn from(raw: RawChat) -> Self {
        Chat {
            other_user_id: raw.other_user.id,
            other_user_name: raw.other_user.name,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Ids are documented as strings, but tolerate numbers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer).map(|id| id.map(String::from))
}
