//! JSON Lines (JSONL) output writer.
//!
//! One object per line, so large histories can be appended to and streamed
//! without holding a whole array in memory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::core::models::{ExportRecord, OutputConfig};
use crate::error::Result;
use crate::message::Message;

/// Writes messages to JSONL (JSON Lines) format.
///
/// # Format
/// ```text
/// {"date":"2021-06-01 12:00:00","sender":"Alice","text":"Hello"}
/// {"date":"2021-06-01 12:01:00","sender":"Bob","text":"Hi"}
/// ```
pub fn write_jsonl(
    messages: &[Message],
    output_path: &str,
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_lines(BufWriter::new(file), messages, config, names)
}

/// Converts messages to a JSONL string. Same format as [`write_jsonl`].
pub fn to_jsonl(
    messages: &[Message],
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Result<String> {
    let mut buffer = Vec::new();
    write_lines(&mut buffer, messages, config, names)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_lines<W: Write>(
    mut writer: W,
    messages: &[Message],
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Result<()> {
    for msg in messages {
        let record = ExportRecord::from_message(msg, config, names);
        let line = serde_json::to_string(&record)?;
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Attachment, DirectMessage};
    use std::io::{BufRead, BufReader};
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_jsonl_basic() {
        let messages: Vec<Message> = vec![
            DirectMessage::new("1", "u1", 0).with_name("Alice").with_text("Hello").into(),
            DirectMessage::new("2", "u2", 0).with_name("Bob").with_text("Hi").into(),
        ];

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();
        write_jsonl(&messages, path, &OutputConfig::new(), &HashMap::new()).unwrap();

        let file = std::fs::File::open(path).unwrap();
        let lines: Vec<String> = BufReader::new(file).lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 2);

        let msg1: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(msg1["sender"], "Alice");
        assert_eq!(msg1["text"], "Hello");

        let msg2: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(msg2["sender"], "Bob");
    }

    #[test]
    fn test_to_jsonl_attachments() {
        let mut dm = DirectMessage::new("7", "u1", 0);
        dm.attachments = Some(vec![
            Attachment::new("image", "https://i.example/a.png"),
            Attachment {
                kind: "mentions".into(),
                url: None,
            },
        ]);

        let config = OutputConfig::new().with_attachments();
        let msg: Message = dm.into();
        let out = to_jsonl(&[msg], &config, &HashMap::new()).unwrap();
        assert_eq!(out.lines().count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(parsed["attachments"], serde_json::json!(["https://i.example/a.png"]));
    }
}
