//! Human-readable message listing.

use std::fs;

use crate::error::Result;
use crate::message::{Member, Message};

/// Printed instead of a listing when no message survived the filter.
pub const NO_MATCHES: &str = "No messages match filter";

/// Renders messages as the plain listing printed by `gmkit messages`.
///
/// The listing opens with a blank line. Each message takes two lines
/// followed by a blank one:
///
/// ```text
/// Sender: Rob (Robbo) | Date: 2021-06-01
///     Text: GOAL!!!
/// ```
///
/// Group senders are looked up in `members` by user id and shown as
/// `name (nickname)`. Direct messages and senders no longer in `members`
/// fall back to the name on the message. Missing text prints as `None`.
///
/// An empty slice renders as [`NO_MATCHES`] on its own line.
pub fn to_text(messages: &[Message], members: &[Member]) -> String {
    if messages.is_empty() {
        return format!("{NO_MATCHES}\n");
    }

    let mut out = String::from("\n");
    for msg in messages {
        let date = msg.local_date().map(|d| d.to_string()).unwrap_or_default();
        out.push_str(&format!("Sender: {} | Date: {date}\n", sender_label(msg, members)));
        out.push_str(&format!("    Text: {}\n\n", msg.text().unwrap_or("None")));
    }
    out
}

/// Writes the listing from [`to_text`] to a file.
pub fn write_text(messages: &[Message], output_path: &str, members: &[Member]) -> Result<()> {
    fs::write(output_path, to_text(messages, members))?;
    Ok(())
}

fn sender_label(msg: &Message, members: &[Member]) -> String {
    let fallback = || msg.name().unwrap_or(msg.sender_id()).to_string();
    match msg {
        Message::Group(_) => members
            .iter()
            .find(|m| m.user_id == msg.sender_id())
            .map_or_else(fallback, |m| format!("{} ({})", m.name, m.nickname)),
        Message::Direct(_) => fallback(),
    }
}
