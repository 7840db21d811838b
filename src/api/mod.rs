//! The remote-service seam.
//!
//! Everything that talks to the messaging service goes through the
//! [`ApiClient`] trait. The rest of the crate (cursors, filters, aggregators,
//! sending) is written against the trait and never sees HTTP.
//!
//! # Implementations
//!
//! - [`HttpClient`] - blocking `reqwest` client for the real service
//! - [`MemoryClient`] - in-memory backing store with the same paging contract
//!
//! # Example
//!
//! ```rust
//! use gmkit::api::{ApiClient, MemoryClient};
//! use gmkit::message::{ConversationKind, Group, Member};
//!
//! let client = MemoryClient::new().with_group(Group {
//!     id: "42".into(),
//!     name: "Football Chat".into(),
//!     members: vec![Member::new("u1", "Alice", "Al")],
//! });
//!
//! assert_eq!(client.resolve_group_id("Football Chat")?, "42");
//! assert!(client.resolve_group_id("football chat").is_err());
//!
//! let conversation = client.resolve(ConversationKind::Group, "Football Chat")?;
//! assert_eq!(conversation.id(), "42");
//! # Ok::<(), gmkit::GmkitError>(())
//! ```

mod http;
mod memory;
pub mod wire;

pub use http::HttpClient;
pub use memory::MemoryClient;

use crate::error::{GmkitError, Result};
use crate::message::{Chat, Conversation, ConversationKind, DeliveryReceipt, Group, Member, Message};

/// Authenticated access to the messaging service.
///
/// Implementors perform one blocking request per call and report HTTP failure
/// classes as typed errors. No retries are expected at this layer.
///
/// # Object Safety
///
/// This trait is object-safe, so commands can hold a `&dyn ApiClient`.
pub trait ApiClient {
    /// Lists every group the authenticated user belongs to.
    fn groups(&self) -> Result<Vec<Group>>;

    /// Lists every direct-message thread of the authenticated user.
    fn chats(&self) -> Result<Vec<Chat>>;

    /// Returns the current member snapshot of a group.
    fn group_members(&self, group_id: &str) -> Result<Vec<Member>>;

    /// Fetches one page of messages, newest first.
    ///
    /// With `before_id == None` the newest page is returned; otherwise only
    /// messages strictly older than `before_id`. An empty vector means there
    /// are no more messages.
    fn fetch_page(&self, conversation: &Conversation, before_id: Option<&str>)
    -> Result<Vec<Message>>;

    /// Posts a single message. `text` must already respect the service limit.
    fn send(
        &self,
        conversation: &Conversation,
        text: &str,
        source_guid: &str,
    ) -> Result<DeliveryReceipt>;

    /// Resolves a group name to its id.
    ///
    /// Exact, case-sensitive match; the first group with that name wins.
    fn resolve_group_id(&self, name: &str) -> Result<String> {
        self.groups()?
            .into_iter()
            .find(|group| group.name == name)
            .map(|group| group.id)
            .ok_or_else(|| GmkitError::not_found(ConversationKind::Group, name))
    }

    /// Resolves the other participant's name to a direct-thread id.
    ///
    /// Exact, case-sensitive match; the first thread with that name wins.
    fn resolve_chat_id(&self, name: &str) -> Result<String> {
        self.chats()?
            .into_iter()
            .find(|chat| chat.other_user_name == name)
            .map(|chat| chat.other_user_id)
            .ok_or_else(|| GmkitError::not_found(ConversationKind::Direct, name))
    }

    /// Resolves a name to a [`Conversation`] of the given kind.
    fn resolve(&self, kind: ConversationKind, name: &str) -> Result<Conversation> {
        match kind {
            ConversationKind::Group => self.resolve_group_id(name).map(Conversation::group),
            ConversationKind::Direct => self.resolve_chat_id(name).map(Conversation::direct),
        }
    }
}
