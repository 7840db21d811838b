//! CSV output writer.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;

use crate::core::models::{ExportRecord, OutputConfig, export_records};
use crate::error::Result;
use crate::message::Message;

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: Depends on OutputConfig
///   - Basic: `Date`, `Sender`, `Text`
///   - With IDs: `ID` first
///   - With likes: `Likes` after `Text`
///   - With attachments: `Attachments` last, URLs separated by spaces
/// - Encoding: UTF-8
pub fn write_csv(
    messages: &[Message],
    output_path: &str,
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(file, messages, config, names)
}

/// Converts messages to a CSV string. Same format as [`write_csv`].
pub fn to_csv(
    messages: &[Message],
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, messages, config, names)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_records<W: Write>(
    out: W,
    messages: &[Message],
    config: &OutputConfig,
    names: &HashMap<String, String>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);

    writer.write_record(build_header(config))?;
    for record in export_records(messages, config, names) {
        writer.write_record(build_record(record))?;
    }

    writer.flush()?;
    Ok(())
}

/// Build CSV header based on output configuration.
fn build_header(config: &OutputConfig) -> Vec<&'static str> {
    let mut header = Vec::new();

    if config.include_ids {
        header.push("ID");
    }
    header.extend(["Date", "Sender", "Text"]);
    if config.include_likes {
        header.push("Likes");
    }
    if config.include_attachments {
        header.push("Attachments");
    }

    header
}

/// Build CSV record for a single message.
fn build_record(record: ExportRecord) -> Vec<String> {
    let mut row = Vec::new();

    row.extend(record.id);
    row.push(record.date);
    row.push(record.sender);
    row.push(record.text);
    row.extend(record.likes.map(|n| n.to_string()));
    row.extend(record.attachments.map(|urls| urls.join(" ")));

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Attachment, GroupMessage};
    use tempfile::NamedTempFile;

    fn messages() -> Vec<Message> {
        vec![
            GroupMessage::new("1", "g", "u1", 0).with_text("Hello").into(),
            GroupMessage::new("2", "g", "u2", 0)
                .with_name("Bob")
                .with_text("Hi; there")
                .with_likes(["u1"])
                .with_attachment(Attachment::new("image", "https://i.example/a.png"))
                .into(),
        ]
    }

    #[test]
    fn test_write_csv_basic() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();
        let names = HashMap::from([("u1".to_string(), "Alice".to_string())]);

        write_csv(&messages(), path, &OutputConfig::new(), &names).unwrap();
        let content = std::fs::read_to_string(path).unwrap();

        assert!(content.starts_with("Date;Sender;Text\n"));
        assert!(content.contains(";Alice;Hello"));
        assert!(content.contains(";Bob;\"Hi; there\""));
    }

    #[test]
    fn test_to_csv_all_columns() {
        let csv = to_csv(&messages(), &OutputConfig::all(), &HashMap::new()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID;Date;Sender;Text;Likes;Attachments"));
        assert!(lines.next().unwrap().starts_with("1;"));
        let second = lines.next().unwrap();
        assert!(second.starts_with("2;"));
        assert!(second.ends_with(";1;https://i.example/a.png"));
    }
}
