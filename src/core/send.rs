//! Outbound messages and the splitting of oversized text.
//!
//! The service refuses text longer than 1000 characters. [`send_message`]
//! posts short text as-is and longer text as several chunks produced by
//! [`split_message`].

use rand::Rng;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::config::SplitConfig;
use crate::error::{GmkitError, Result};
use crate::message::{Conversation, DeliveryReceipt};

const SEPARATORS: [char; 2] = ['\n', ' '];

/// Splits `text` into chunks of at most `config.chunk_len` characters.
///
/// Breaks at newlines where possible, then at spaces, and only then inside a
/// run of characters. The separator at a break is dropped. Lengths are
/// counted in characters, never bytes, so multi-byte text is never cut
/// through a code point. A run without separators is split so that joining
/// the chunks gives back the original.
///
/// # Examples
///
/// ```
/// use gmkit::config::SplitConfig;
/// use gmkit::core::split_message;
///
/// let config = SplitConfig::new().with_chunk_len(10);
/// assert_eq!(split_message("one two three\nfour", &config), ["one two", "three", "four"]);
///
/// let long = "x".repeat(25);
/// let chunks = split_message(&long, &config);
/// assert_eq!(chunks.len(), 3);
/// assert_eq!(chunks.concat(), long);
/// ```
pub fn split_message(text: &str, config: &SplitConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    split_into(text, &SEPARATORS, config.chunk_len.max(1), &mut chunks);
    if chunks.len() > 1 {
        chunks.retain(|chunk| !chunk.is_empty());
    }
    chunks
}

fn split_into(text: &str, separators: &[char], limit: usize, out: &mut Vec<String>) {
    if text.chars().count() <= limit {
        out.push(text.to_string());
        return;
    }
    let Some((&sep, finer)) = separators.split_first() else {
        hard_split(text, limit, out);
        return;
    };
    if !text.contains(sep) {
        split_into(text, finer, limit, out);
        return;
    }

    let mut current: Option<String> = None;
    let mut current_len = 0;
    for piece in text.split(sep) {
        let piece_len = piece.chars().count();
        if piece_len > limit {
            if let Some(chunk) = current.take() {
                out.push(chunk);
            }
            split_into(piece, finer, limit, out);
            continue;
        }

        let fits = current.is_some() && current_len + 1 + piece_len <= limit;
        if fits {
            if let Some(chunk) = current.as_mut() {
                chunk.push(sep);
                chunk.push_str(piece);
                current_len += 1 + piece_len;
            }
        } else {
            if let Some(chunk) = current.replace(piece.to_string()) {
                out.push(chunk);
            }
            current_len = piece_len;
        }
    }
    if let Some(chunk) = current {
        out.push(chunk);
    }
}

fn hard_split(text: &str, limit: usize, out: &mut Vec<String>) {
    let chars: Vec<char> = text.chars().collect();
    out.extend(chars.chunks(limit).map(|chunk| chunk.iter().collect::<String>()));
}

/// Returns a fresh random deduplication guid.
pub fn new_source_guid() -> String {
    let value: u128 = rand::thread_rng().r#gen();
    format!("{value:032x}")
}

/// Sends `text` to `conversation`, splitting it when it is longer than
/// `config.max_len` characters.
///
/// Chunks are posted in order, each with its own [`new_source_guid`]. Returns
/// one receipt per posted chunk.
///
/// # Errors
///
/// Stops at the first failing chunk. A [`GmkitError::MessageRejected`] carries
/// the index of that chunk. Chunks already posted stay posted.
///
/// # Examples
///
/// ```
/// use gmkit::api::MemoryClient;
/// use gmkit::config::SplitConfig;
/// use gmkit::core::send_message;
/// use gmkit::message::Conversation;
///
/// let client = MemoryClient::new();
/// let receipts = send_message(&client, &Conversation::group("g"), &"a ".repeat(800), &SplitConfig::default())?;
/// assert_eq!(receipts.len(), 2);
/// # Ok::<(), gmkit::GmkitError>(())
/// ```
pub fn send_message<C: ApiClient + ?Sized>(
    client: &C,
    conversation: &Conversation,
    text: &str,
    config: &SplitConfig,
) -> Result<Vec<DeliveryReceipt>> {
    let chunks = if text.chars().count() <= config.max_len {
        vec![text.to_string()]
    } else {
        split_message(text, config)
    };

    let mut receipts = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let guid = new_source_guid();
        match client.send(conversation, chunk, &guid) {
            Ok(receipt) => {
                debug!(
                    conversation = conversation.id(),
                    chunk = index,
                    message_id = receipt.message_id.as_str(),
                    "sent chunk"
                );
                receipts.push(receipt);
            }
            Err(GmkitError::MessageRejected { status, .. }) => {
                return Err(GmkitError::MessageRejected {
                    status,
                    chunk: index,
                });
            }
            Err(err) => {
                warn!(conversation = conversation.id(), chunk = index, "send failed");
                return Err(err);
            }
        }
    }
    Ok(receipts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryClient;

    fn lengths(chunks: &[String]) -> Vec<usize> {
        chunks.iter().map(|c| c.chars().count()).collect()
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_message("hello", &SplitConfig::default()), ["hello"]);
        assert_eq!(split_message("", &SplitConfig::default()), [""]);
    }

    #[test]
    fn test_unbroken_text_is_lossless() {
        let text = "a".repeat(2000);
        let chunks = split_message(&text, &SplitConfig::default());
        assert_eq!(lengths(&chunks), [920, 920, 160]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 999));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_prefers_newlines() {
        let line = "b".repeat(500);
        let text = format!("{line}\n{line}\n{line}");
        let chunks = split_message(&text, &SplitConfig::default());
        assert_eq!(chunks, [line.clone(), line.clone(), line]);
    }

    #[test]
    fn test_falls_back_to_spaces() {
        let word = "w".repeat(300);
        let text = vec![word.as_str(); 5].join(" ");
        let chunks = split_message(&text, &SplitConfig::default());
        assert_eq!(lengths(&chunks), [902, 601]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(1500);
        let chunks = split_message(&text, &SplitConfig::default());
        assert_eq!(lengths(&chunks), [920, 580]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_long_line_between_short_ones() {
        let config = SplitConfig::new().with_chunk_len(5);
        let chunks = split_message("ab\ncdefghijkl\nmn", &config);
        assert_eq!(chunks, ["ab", "cdefg", "hijkl", "mn"]);
    }

    #[test]
    fn test_send_short_text_unsplit() {
        let client = MemoryClient::new();
        let conversation = Conversation::group("g");
        let text = "z".repeat(1000);
        let receipts = send_message(&client, &conversation, &text, &SplitConfig::default()).unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(client.sent()[0].1, text);
    }

    #[test]
    fn test_send_long_text_in_order() {
        let client = MemoryClient::new();
        let conversation = Conversation::direct("u9");
        let text = "q".repeat(1001);
        let receipts = send_message(&client, &conversation, &text, &SplitConfig::default()).unwrap();
        assert_eq!(receipts.len(), 2);
        assert_ne!(receipts[0].source_guid, receipts[1].source_guid);
        let sent: Vec<String> = client.sent().into_iter().map(|(_, t)| t).collect();
        assert_eq!(sent.concat(), text);
    }

    #[test]
    fn test_rejection_reports_chunk_index() {
        let client = MemoryClient::new().with_rejected_text("!");
        let text = format!("{}\n{}!", "a".repeat(900), "b".repeat(900));
        let err = send_message(&client, &Conversation::group("g"), &text, &SplitConfig::default())
            .unwrap_err();
        assert!(matches!(err, GmkitError::MessageRejected { status: 400, chunk: 1 }));
        assert_eq!(client.sent().len(), 1);
    }

    #[test]
    fn test_source_guid_shape() {
        let guid = new_source_guid();
        assert_eq!(guid.len(), 32);
        assert!(guid.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
