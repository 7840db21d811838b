//! In-memory implementation of [`ApiClient`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::ApiClient;
use crate::config::MAX_PAGE_SIZE;
use crate::error::{GmkitError, Result};
use crate::message::{Chat, Conversation, DeliveryReceipt, Group, Member, Message};

/// A self-contained stand-in for the remote service.
///
/// Holds groups, direct threads and their message histories, and answers
/// page requests with the same contract as the real API: newest first, at
/// most `page_size` messages, strictly older than `before_id`. Sent messages
/// are recorded separately and can be inspected with [`MemoryClient::sent`].
///
/// # Example
///
/// ```rust
/// use gmkit::api::{ApiClient, MemoryClient};
/// use gmkit::message::{Conversation, GroupMessage};
///
/// let conversation = Conversation::group("g");
/// let history = (1..=250)
///     .map(|i| GroupMessage::new(i.to_string(), "g", "u1", i).into())
///     .collect();
/// let client = MemoryClient::new().with_history(conversation.clone(), history);
///
/// let newest = client.fetch_page(&conversation, None)?;
/// assert_eq!(newest.len(), 100);
/// assert_eq!(newest[0].id(), "250");
///
/// let older = client.fetch_page(&conversation, Some("151"))?;
/// assert_eq!(older[0].id(), "150");
/// # Ok::<(), gmkit::GmkitError>(())
/// ```
#[derive(Debug)]
pub struct MemoryClient {
    groups: Vec<Group>,
    chats: Vec<Chat>,
    /// Oldest first.
    histories: HashMap<Conversation, Vec<Message>>,
    page_size: usize,
    fail_after: Option<usize>,
    reject_containing: Option<String>,
    pages_served: Cell<usize>,
    sent: RefCell<Vec<(Conversation, String)>>,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            chats: Vec::new(),
            histories: HashMap::new(),
            page_size: MAX_PAGE_SIZE,
            fail_after: None,
            reject_containing: None,
            pages_served: Cell::new(0),
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl MemoryClient {
    /// Creates an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group.
    #[must_use]
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a direct thread.
    #[must_use]
    pub fn with_chat(mut self, chat: Chat) -> Self {
        self.chats.push(chat);
        self
    }

    /// Sets the history of a conversation, given oldest first.
    #[must_use]
    pub fn with_history(mut self, conversation: Conversation, messages: Vec<Message>) -> Self {
        self.histories.insert(conversation, messages);
        self
    }

    /// Sets the page size, clamped to `1..=100`.
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Makes every page request after the first `pages` fail with a 503.
    #[must_use]
    pub fn with_failure_after(mut self, pages: usize) -> Self {
        self.fail_after = Some(pages);
        self
    }

    /// Rejects (HTTP 400) any outbound text containing `needle`.
    #[must_use]
    pub fn with_rejected_text(mut self, needle: impl Into<String>) -> Self {
        self.reject_containing = Some(needle.into());
        self
    }

    /// Number of successful page requests answered so far.
    pub fn pages_served(&self) -> usize {
        self.pages_served.get()
    }

    /// Messages accepted by [`send`](ApiClient::send), in order.
    pub fn sent(&self) -> Vec<(Conversation, String)> {
        self.sent.borrow().clone()
    }

    fn history(&self, conversation: &Conversation) -> &[Message] {
        self.histories
            .get(conversation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl ApiClient for MemoryClient {
    fn groups(&self) -> Result<Vec<Group>> {
        Ok(self.groups.clone())
    }

    fn chats(&self) -> Result<Vec<Chat>> {
        Ok(self.chats.clone())
    }

    fn group_members(&self, group_id: &str) -> Result<Vec<Member>> {
        Ok(self
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .map(|g| g.members.clone())
            .unwrap_or_default())
    }

    fn fetch_page(
        &self,
        conversation: &Conversation,
        before_id: Option<&str>,
    ) -> Result<Vec<Message>> {
        if self.fail_after.is_some_and(|n| self.pages_served.get() >= n) {
            return Err(GmkitError::Status {
                status: 503,
                endpoint: format!("memory/{}", conversation.id()),
            });
        }

        let history = self.history(conversation);
        let end = match before_id {
            None => history.len(),
            Some(id) => match history.iter().position(|m| m.id() == id) {
                Some(pos) => pos,
                None => return Ok(Vec::new()),
            },
        };
        let start = end.saturating_sub(self.page_size);
        self.pages_served.set(self.pages_served.get() + 1);
        Ok(history[start..end].iter().rev().cloned().collect())
    }

    fn send(
        &self,
        conversation: &Conversation,
        text: &str,
        source_guid: &str,
    ) -> Result<DeliveryReceipt> {
        if self
            .reject_containing
            .as_deref()
            .is_some_and(|needle| text.contains(needle))
        {
            return Err(GmkitError::MessageRejected {
                status: 400,
                chunk: 0,
            });
        }

        let mut sent = self.sent.borrow_mut();
        sent.push((conversation.clone(), text.to_string()));
        let created_at = self
            .history(conversation)
            .last()
            .map_or(0, |m| m.created_at() + 1);
        Ok(DeliveryReceipt {
            message_id: format!("sent-{}", sent.len()),
            created_at,
            source_guid: source_guid.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DirectMessage, GroupMessage};

    fn client_with(n: usize) -> (MemoryClient, Conversation) {
        let conversation = Conversation::group("g");
        let history = (1..=n)
            .map(|i| GroupMessage::new(i.to_string(), "g", "u1", i as i64).into())
            .collect();
        (
            MemoryClient::new().with_history(conversation.clone(), history),
            conversation,
        )
    }

    #[test]
    fn test_newest_page_first() {
        let (client, conversation) = client_with(150);
        let page = client.fetch_page(&conversation, None).unwrap();
        assert_eq!(page.len(), 100);
        assert_eq!(page[0].id(), "150");
        assert_eq!(page[99].id(), "51");
    }

    #[test]
    fn test_before_id_is_exclusive() {
        let (client, conversation) = client_with(150);
        let page = client.fetch_page(&conversation, Some("51")).unwrap();
        assert_eq!(page.len(), 50);
        assert_eq!(page[0].id(), "50");
        assert!(client.fetch_page(&conversation, Some("1")).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_conversation_is_empty() {
        let client = MemoryClient::new();
        let page = client.fetch_page(&Conversation::direct("x"), None).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_failure_injection() {
        let (client, conversation) = client_with(10);
        let client = client.with_failure_after(1);
        assert!(client.fetch_page(&conversation, None).is_ok());
        let err = client.fetch_page(&conversation, None).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(client.pages_served(), 1);
    }

    #[test]
    fn test_send_and_reject() {
        let client = MemoryClient::new().with_rejected_text("☃");
        let conversation = Conversation::direct("7");

        let receipt = client.send(&conversation, "hello", "guid").unwrap();
        assert_eq!(receipt.message_id, "sent-1");
        assert_eq!(client.sent(), vec![(conversation.clone(), "hello".to_string())]);

        let err = client.send(&conversation, "snow ☃", "guid2").unwrap_err();
        assert!(err.is_rejected());
        assert_eq!(client.sent().len(), 1);
    }

    #[test]
    fn test_direct_history() {
        let conversation = Conversation::direct("u9");
        let history = vec![DirectMessage::new("3", "u9", 30).with_name("Rob").into()];
        let client = MemoryClient::new().with_history(conversation.clone(), history);
        let page = client.fetch_page(&conversation, None).unwrap();
        assert_eq!(page[0].name(), Some("Rob"));
        assert_eq!(page[0].id(), "3");
    }
}
