//! # gmkit
//!
//! A Rust toolkit for reading, analysing and sending messages on a
//! GroupMe-style group messaging service.
//!
//! ## Overview
//!
//! gmkit wraps the service's REST API behind a small trait and builds the
//! useful pieces on top of it:
//! - **Paging** - walk a group or direct thread newest-first, one page at a time
//! - **Filtering** - keep messages by sender, date range or text pattern
//! - **Statistics** - per-member leaderboards, most-liked posts, departed senders
//! - **Sending** - split long text into chunks the service accepts
//! - **Export** - write history as CSV, JSON or JSON Lines
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gmkit::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let client = HttpClient::from_env()?;
//!
//!     // Everything Rob said in June
//!     let cursor = PageCursor::group(&client, "Football Chat")?;
//!     let filter = FilterSpec::new()
//!         .with_username("Rob")
//!         .with_date_after("2021-06-01")?
//!         .with_date_before("2021-06-30")?
//!         .resolve_for(&client, cursor.conversation())?;
//!     let messages = cursor.with_filter(filter).collect_all()?;
//!
//!     write_json(&messages, "rob.json", &OutputConfig::new(), &Default::default())?;
//!
//!     // Who posts the most?
//!     println!("{}", gmkit::stats::post_counts(&client, "Football Chat", None)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`api`] - the [`ApiClient`](api::ApiClient) seam, [`HttpClient`](api::HttpClient)
//!   and [`MemoryClient`](api::MemoryClient)
//! - [`message`] - [`Message`], conversations, members and attachments
//! - [`config`] - client and send-splitting configuration
//! - [`core`] - paging, filtering, sending and export
//!   - [`core::cursor`] - [`PageCursor`](core::PageCursor)
//!   - [`core::filter`] - [`FilterSpec`](core::FilterSpec), [`MessageFilter`](core::MessageFilter)
//!   - [`core::send`] - [`split_message`](core::split_message), [`send_message`](core::send_message)
//!   - [`core::output`] - CSV, JSON and JSONL writers
//! - [`stats`] - aggregators and their reports
//! - [`format`] - [`OutputFormat`](format::OutputFormat) dispatch
//! - [`cli`] - command-line argument types (feature `cli`)
//! - [`error`] - [`GmkitError`] and [`Result`]
//! - [`prelude`] - convenient re-exports

pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod stats;

// Re-export the main types at the crate root for convenience
pub use error::{GmkitError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use gmkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;
    pub use crate::error::{GmkitError, Result};

    // Service access
    pub use crate::api::{ApiClient, HttpClient, MemoryClient};
    pub use crate::config::{ClientConfig, SplitConfig};
    pub use crate::message::{Conversation, ConversationKind, Member};

    // Paging, filtering, sending
    pub use crate::core::{
        FilterSpec, MessageFilter, OutputConfig, PageCursor, send_message, split_message,
    };

    // Output
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    pub use crate::format::OutputFormat;
}
