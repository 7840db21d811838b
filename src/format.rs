//! Output format selection for `messages` listings and exports.
//!
//! [`OutputFormat`] names a writer in [`core::output`](crate::core::output);
//! [`write_to_format`] and [`to_format_string`] dispatch to it. Structured
//! formats are behind cargo features, the plain listing is always there.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> gmkit::Result<()> {
//! use gmkit::core::models::OutputConfig;
//! use gmkit::format::{OutputFormat, to_format_string};
//! use gmkit::message::{GroupMessage, Member, Message};
//!
//! let members = vec![Member::new("u1", "Alice", "Al")];
//! let messages: Vec<Message> = vec![GroupMessage::new("1", "g", "u1", 0).with_text("Hello!").into()];
//!
//! let listing = to_format_string(&messages, OutputFormat::Text, &OutputConfig::new(), &members)?;
//! assert!(listing.contains("Sender: Alice (Al)"));
//! assert!(listing.contains("    Text: Hello!"));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

#[cfg(any(feature = "csv-output", feature = "json-output"))]
use crate::core::conversation::member_names;
use crate::core::models::OutputConfig;
use crate::core::output;
use crate::error::GmkitError;
use crate::message::{Member, Message};

/// How `messages` renders what it fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Sender, date and text per message, for reading (default)
    #[default]
    Text,

    /// CSV with semicolon delimiter
    Csv,

    /// JSON array of messages
    Json,

    /// JSON Lines, one object per message
    Jsonl,
}

/// Writes messages to `path` in the given format.
///
/// `members` are the conversation's members (empty for direct threads).
/// The text listing uses them for sender labels, the structured formats
/// for the `Sender` column. `config` only affects structured formats.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    messages: &[Message],
    path: &str,
    format: OutputFormat,
    config: &OutputConfig,
    members: &[Member],
) -> Result<(), GmkitError> {
    match format {
        OutputFormat::Text => output::write_text(messages, path, members),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::write_csv(messages, path, config, &member_names(members)),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => output::write_json(messages, path, config, &member_names(members)),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => output::write_jsonl(messages, path, config, &member_names(members)),
        #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
        _ => Err(feature_disabled(format)),
    }
}

/// Renders messages to a string in the given format.
///
/// Same arguments as [`write_to_format`].
#[allow(unused_variables)]
pub fn to_format_string(
    messages: &[Message],
    format: OutputFormat,
    config: &OutputConfig,
    members: &[Member],
) -> Result<String, GmkitError> {
    match format {
        OutputFormat::Text => Ok(output::to_text(messages, members)),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::to_csv(messages, config, &member_names(members)),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => output::to_json(messages, config, &member_names(members)),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => output::to_jsonl(messages, config, &member_names(members)),
        #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
        _ => Err(feature_disabled(format)),
    }
}

#[cfg(not(all(feature = "csv-output", feature = "json-output")))]
fn feature_disabled(format: OutputFormat) -> GmkitError {
    let feature = match format {
        OutputFormat::Csv => "csv-output",
        _ => "json-output",
    };
    GmkitError::InvalidFormat {
        message: format!("Output format {format:?} requires the '{feature}' feature to be enabled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::GroupMessage;

    fn messages() -> Vec<Message> {
        vec![GroupMessage::new("1", "g", "u1", 0).with_text("hi").into()]
    }

    #[test]
    fn test_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_text_ignores_columns() {
        let members = vec![Member::new("u1", "Alice", "Al")];
        let config = OutputConfig::all();
        let out = to_format_string(&messages(), OutputFormat::Text, &config, &members).unwrap();
        assert!(out.starts_with("\nSender: Alice (Al) | Date: "));
        assert!(!out.contains("Likes"));
    }

    #[cfg(all(feature = "csv-output", feature = "json-output"))]
    #[test]
    fn test_structured_formats_use_member_names() {
        let members = vec![Member::new("u1", "Alice", "Al")];
        let config = OutputConfig::new();

        let csv = to_format_string(&messages(), OutputFormat::Csv, &config, &members).unwrap();
        assert!(csv.starts_with("Date;Sender;Text"));
        assert!(csv.contains(";Alice;hi"));
        let json = to_format_string(&messages(), OutputFormat::Json, &config, &members).unwrap();
        assert!(json.trim_start().starts_with('['));
        let jsonl = to_format_string(&messages(), OutputFormat::Jsonl, &config, &[]).unwrap();
        assert_eq!(jsonl.lines().count(), 1);
    }

    #[test]
    fn test_format_serde() {
        let json = serde_json::to_string(&OutputFormat::Jsonl).unwrap();
        assert_eq!(json, "\"jsonl\"");

        let parsed: OutputFormat = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(parsed, OutputFormat::Text);
    }
}
