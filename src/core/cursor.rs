//! Page-by-page walk over a conversation's history.
//!
//! [`PageCursor`] fetches pages newest first and remembers the oldest message
//! id it has seen. Each fetch asks for messages strictly older than that id,
//! so messages posted during a walk are never observed and no message is
//! returned twice.
//!
//! # Raw and filtered pages
//!
//! A page that a filter empties out is not the end of the history. The cursor
//! therefore exposes both views:
//!
//! | Method | Returns | End of history |
//! |--------|---------|----------------|
//! | [`next`](PageCursor::next) | the raw page | `None` |
//! | [`next_filtered`](PageCursor::next_filtered) | the page after the filter, possibly empty | `None` |
//!
//! # Example
//!
//! ```rust
//! use gmkit::api::MemoryClient;
//! use gmkit::core::PageCursor;
//! use gmkit::message::{Conversation, Group, GroupMessage};
//!
//! # fn main() -> gmkit::Result<()> {
//! let history = (1..=250)
//!     .map(|i| GroupMessage::new(i.to_string(), "g", "u1", i).into())
//!     .collect();
//! let client = MemoryClient::new()
//!     .with_group(Group { id: "g".into(), name: "Team".into(), members: vec![] })
//!     .with_history(Conversation::group("g"), history);
//!
//! let mut cursor = PageCursor::group(&client, "Team")?;
//! let mut sizes = Vec::new();
//! while let Some(page) = cursor.next()? {
//!     sizes.push(page.len());
//! }
//! assert_eq!(sizes, [100, 100, 50]);
//! assert_eq!(cursor.last_message_id(), Some("1"));
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use crate::api::ApiClient;
use crate::core::filter::MessageFilter;
use crate::error::Result;
use crate::message::{Conversation, ConversationKind, Message};

/// Cursor over the pages of one conversation.
pub struct PageCursor<'a, C: ApiClient + ?Sized> {
    client: &'a C,
    conversation: Conversation,
    filter: Option<MessageFilter>,
    last_message_id: Option<String>,
    peeked: Option<Vec<Message>>,
    exhausted: bool,
    failed: bool,
    pages_fetched: usize,
}

impl<'a, C: ApiClient + ?Sized> PageCursor<'a, C> {
    /// Creates a cursor over an already resolved conversation.
    pub fn new(client: &'a C, conversation: Conversation) -> Self {
        Self {
            client,
            conversation,
            filter: None,
            last_message_id: None,
            peeked: None,
            exhausted: false,
            failed: false,
            pages_fetched: 0,
        }
    }

    /// Creates a cursor over the group called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GmkitError::ConversationNotFound`](crate::GmkitError::ConversationNotFound)
    /// if no group has that name. No page is fetched in that case.
    pub fn group(client: &'a C, name: &str) -> Result<Self> {
        let conversation = client.resolve(ConversationKind::Group, name)?;
        Ok(Self::new(client, conversation))
    }

    /// Creates a cursor over the direct thread with the user called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GmkitError::ConversationNotFound`](crate::GmkitError::ConversationNotFound)
    /// if no thread matches.
    pub fn direct(client: &'a C, name: &str) -> Result<Self> {
        let conversation = client.resolve(ConversationKind::Direct, name)?;
        Ok(Self::new(client, conversation))
    }

    /// Injects a filter used by [`next_filtered`](Self::next_filtered) and the
    /// [`Iterator`] impl.
    #[must_use]
    pub fn with_filter(mut self, filter: MessageFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// The conversation being walked.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Number of pages fetched from the client so far, including the empty
    /// page that ends the walk.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Id of the oldest message returned so far.
    pub fn last_message_id(&self) -> Option<&str> {
        self.last_message_id.as_deref()
    }

    /// Returns the next raw page, or `None` once the history is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates the client's error. The cursor position is unchanged, so
    /// the call may be repeated.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<Vec<Message>>> {
        if let Some(page) = self.peeked.take() {
            return Ok(Some(page));
        }
        self.fetch()
    }

    /// Returns the next page with the injected filter applied.
    ///
    /// `Some(vec![])` means every message on the page was filtered out and
    /// more pages may follow. Without a filter this is the same as
    /// [`next`](Self::next).
    ///
    /// # Errors
    ///
    /// Propagates the client's error.
    pub fn next_filtered(&mut self) -> Result<Option<Vec<Message>>> {
        let page = self.next()?;
        Ok(match (&self.filter, page) {
            (Some(filter), Some(page)) => Some(filter.filter(page)),
            (_, page) => page,
        })
    }

    /// Returns `true` if another raw page is available.
    ///
    /// The page is fetched and kept, so the following [`next`](Self::next)
    /// does not fetch it again.
    ///
    /// # Errors
    ///
    /// Propagates the client's error.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        match self.fetch()? {
            Some(page) => {
                self.peeked = Some(page);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Walks to the end and returns every message, filtered if a filter is
    /// injected, newest first.
    ///
    /// # Errors
    ///
    /// Stops at the first error.
    pub fn collect_all(mut self) -> Result<Vec<Message>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_filtered()? {
            all.extend(page);
        }
        Ok(all)
    }

    fn fetch(&mut self) -> Result<Option<Vec<Message>>> {
        if self.exhausted {
            return Ok(None);
        }
        let page = self
            .client
            .fetch_page(&self.conversation, self.last_message_id.as_deref())?;
        self.pages_fetched += 1;
        debug!(
            conversation = self.conversation.id(),
            before_id = self.last_message_id.as_deref().unwrap_or("-"),
            size = page.len(),
            "fetched page"
        );

        match page.last() {
            Some(oldest) => {
                self.last_message_id = Some(oldest.id().to_string());
                Ok(Some(page))
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}

impl<C: ApiClient + ?Sized> Iterator for PageCursor<'_, C> {
    type Item = Result<Vec<Message>>;

    /// Yields filtered pages until the history ends or an error occurs.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_filtered() {
            Ok(page) => page.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<C: ApiClient + ?Sized> std::fmt::Debug for PageCursor<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCursor")
            .field("conversation", &self.conversation)
            .field("last_message_id", &self.last_message_id)
            .field("pages_fetched", &self.pages_fetched)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryClient;
    use crate::core::filter::FilterSpec;
    use crate::message::{Chat, DirectMessage, Group, GroupMessage};

    fn client(n: i64) -> MemoryClient {
        let history = (1..=n)
            .map(|i| {
                let sender = if i % 2 == 0 { "u2" } else { "u1" };
                GroupMessage::new(i.to_string(), "g", sender, i).into()
            })
            .collect();
        MemoryClient::new()
            .with_group(Group {
                id: "g".into(),
                name: "Team".into(),
                members: vec![],
            })
            .with_history(Conversation::group("g"), history)
    }

    #[test]
    fn test_walk_to_exhaustion() {
        let client = client(250);
        let mut cursor = PageCursor::new(&client, Conversation::group("g"));
        let mut ids = Vec::new();
        while let Some(page) = cursor.next().unwrap() {
            ids.extend(page.iter().map(|m| m.id().parse::<i64>().unwrap()));
        }
        assert_eq!(ids, (1..=250).rev().collect::<Vec<_>>());
        assert_eq!(cursor.pages_fetched(), 4);
        assert!(cursor.next().unwrap().is_none());
        assert_eq!(cursor.pages_fetched(), 4);
    }

    #[test]
    fn test_unknown_group_fails_before_fetch() {
        let client = client(10);
        let err = PageCursor::group(&client, "team").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(client.pages_served(), 0);
    }

    #[test]
    fn test_direct_resolution() {
        let client = MemoryClient::new()
            .with_chat(Chat {
                other_user_id: "u9".into(),
                other_user_name: "Rob".into(),
            })
            .with_history(
                Conversation::direct("u9"),
                vec![DirectMessage::new("1", "u9", 1).into()],
            );
        let cursor = PageCursor::direct(&client, "Rob").unwrap();
        assert_eq!(cursor.conversation(), &Conversation::direct("u9"));
        assert_eq!(cursor.collect_all().unwrap().len(), 1);
    }

    #[test]
    fn test_has_next_buffers_page() {
        let client = client(150);
        let mut cursor = PageCursor::new(&client, Conversation::group("g"));
        assert!(cursor.has_next().unwrap());
        assert!(cursor.has_next().unwrap());
        assert_eq!(client.pages_served(), 1);

        let first = cursor.next().unwrap().unwrap();
        assert_eq!(first[0].id(), "150");
        assert_eq!(client.pages_served(), 1);

        assert!(cursor.has_next().unwrap());
        assert_eq!(cursor.next().unwrap().unwrap().len(), 50);
        assert!(!cursor.has_next().unwrap());
    }

    #[test]
    fn test_filtered_empty_page_is_not_the_end() {
        let history = (1..=20)
            .map(|i| {
                let sender = if i <= 10 { "u1" } else { "u2" };
                GroupMessage::new(i.to_string(), "g", sender, i).into()
            })
            .collect();
        let client = MemoryClient::new()
            .with_page_size(10)
            .with_history(Conversation::group("g"), history);
        let filter = FilterSpec::new()
            .with_username("A")
            .resolve(Some(&[crate::message::Member::new("u1", "A", "")]))
            .unwrap();
        let mut cursor = PageCursor::new(&client, Conversation::group("g")).with_filter(filter);

        assert_eq!(cursor.next_filtered().unwrap(), Some(vec![]));
        assert_eq!(cursor.next_filtered().unwrap().unwrap().len(), 10);
        assert_eq!(cursor.next_filtered().unwrap(), None);
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let client = client(250).with_failure_after(1);
        let cursor = PageCursor::new(&client, Conversation::group("g"));
        let results: Vec<_> = cursor.collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_transport());
    }

    #[test]
    fn test_collect_all_with_filter() {
        let client = client(30);
        let filter = FilterSpec::new()
            .with_username("Bob")
            .resolve(Some(&[crate::message::Member::new("u2", "Bob", "")]))
            .unwrap();
        let all = PageCursor::new(&client, Conversation::group("g"))
            .with_filter(filter)
            .collect_all()
            .unwrap();
        assert_eq!(all.len(), 15);
        assert!(all.iter().all(|m| m.sender_id() == "u2"));
    }
}
