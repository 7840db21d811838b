//! Core processing logic for gmkit.
//!
//! This module contains:
//! - [`cursor`] - Paging through a conversation's history
//! - [`filter`] - Message filtering by sender, date and text
//! - [`send`] - Splitting and sending outbound text
//! - [`conversation`] - Member lookups shared by the above
//! - [`models`] / [`output`] - Export records and format writers (text, CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use gmkit::api::MemoryClient;
//! use gmkit::core::{FilterSpec, PageCursor};
//! use gmkit::message::{Conversation, Group, GroupMessage, Member};
//!
//! # fn main() -> gmkit::Result<()> {
//! let members = vec![Member::new("u1", "Alice", "Al")];
//! let client = MemoryClient::new()
//!     .with_group(Group { id: "g".into(), name: "Team".into(), members })
//!     .with_history(
//!         Conversation::group("g"),
//!         vec![
//!             GroupMessage::new("1", "g", "u1", 0).with_text("first").into(),
//!             GroupMessage::new("2", "g", "u2", 0).with_text("second").into(),
//!         ],
//!     );
//!
//! let cursor = PageCursor::group(&client, "Team")?;
//! let filter = FilterSpec::new()
//!     .with_username("Al")
//!     .resolve_for(&client, cursor.conversation())?;
//! let mine = cursor.with_filter(filter).collect_all()?;
//! assert_eq!(mine.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod conversation;
pub mod cursor;
pub mod filter;
pub mod models;
pub mod output;
pub mod send;

pub use conversation::{find_member, member_names};
pub use cursor::PageCursor;
pub use filter::{FilterSpec, MessageFilter, Predicate};
pub use models::OutputConfig;
pub use output::{to_text, write_text};
pub use send::{send_message, split_message};

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
