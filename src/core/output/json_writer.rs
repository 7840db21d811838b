//! JSON output writer.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;

use crate::core::models::{OutputConfig, export_records};
use crate::error::Result;
use crate::message::Message;

/// Writes messages to JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"date": "2021-06-01 12:00:00", "sender": "Alice", "text": "Hello"},
///   {"date": "2021-06-01 12:01:00", "sender": "Bob", "text": "Hi"}
/// ]
/// ```
pub fn write_json(
    messages: &[Message],
    output_path: &str,
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Result<()> {
    let json = to_json(messages, config, names)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts messages to JSON string as an array.
///
/// Same format as `write_json`, but returns a String instead of writing to file.
pub fn to_json(
    messages: &[Message],
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Result<String> {
    let records = export_records(messages, config, names);
    Ok(serde_json::to_string_pretty(&records)?)
}
