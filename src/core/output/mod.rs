//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_text`] / [`to_text`] - plain listing for reading in a terminal
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of messages - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one object per line - requires `json-output` feature
//!
//! The structured writers take a `names` map from sender id to member display name,
//! usually built with [`member_names`](crate::core::member_names).
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> gmkit::Result<()> {
//! use std::collections::HashMap;
//!
//! use gmkit::core::models::OutputConfig;
//! use gmkit::core::output::{to_csv, to_jsonl};
//! use gmkit::message::{GroupMessage, Message};
//!
//! let messages: Vec<Message> = vec![GroupMessage::new("1", "g", "u1", 0).with_text("Hello!").into()];
//! let names = HashMap::from([("u1".to_string(), "Alice".to_string())]);
//!
//! let csv = to_csv(&messages, &OutputConfig::new(), &names)?;
//! assert!(csv.contains(";Alice;Hello!"));
//!
//! let jsonl = to_jsonl(&messages, &OutputConfig::new().with_ids(), &names)?;
//! assert!(jsonl.contains(r#""id":"1""#));
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod text_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use text_writer::{NO_MATCHES, to_text, write_text};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
