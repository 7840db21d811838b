//! Typed reports and their text rendering.

use std::fmt;

use serde::Serialize;

use super::scoreboard::TallyKind;
use crate::message::Message;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// Member display name
    pub name: String,
    /// Posts or likes counted for the member
    pub value: u64,
}

/// Integer leaderboard: posts, likes received or likes given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    /// Heading, including the filter summary if any
    pub title: String,
    /// Rows, highest value first
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Builds a board for `kind`, appending the filter summary to the title
    /// when there is one.
    pub fn new(kind: TallyKind, filter: &str, entries: Vec<LeaderboardEntry>) -> Self {
        let base = match kind {
            TallyKind::Posts => "Number of posts by user",
            TallyKind::LikesReceived => "Total number of likes on posts by user",
            TallyKind::LikesGiven => "Total number of liked posts by user",
        };
        Self {
            title: with_filter(base, filter),
            entries,
        }
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.title)?;
        for entry in &self.entries {
            writeln!(f, "    {} - {}", entry.name, entry.value)?;
        }
        Ok(())
    }
}

/// Text volume of one member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthEntry {
    /// Member display name
    pub name: String,
    /// Characters across all text posts
    pub chars: u64,
    /// Posts that carried text
    pub posts: u64,
    /// `chars / posts`, or `0.0` without posts
    pub average: f64,
}

impl LengthEntry {
    /// Computes the average from the two totals.
    pub fn new(name: impl Into<String>, chars: u64, posts: u64) -> Self {
        let average = if posts == 0 {
            0.0
        } else {
            chars as f64 / posts as f64
        };
        Self {
            name: name.into(),
            chars,
            posts,
            average,
        }
    }
}

/// Text-length leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthBoard {
    /// Heading, including the filter summary if any
    pub title: String,
    /// Rows, most characters first
    pub entries: Vec<LengthEntry>,
}

impl LengthBoard {
    /// Builds the board, appending `filter` to the title when non-empty.
    pub fn new(filter: &str, entries: Vec<LengthEntry>) -> Self {
        Self {
            title: with_filter(
                "Total number of characters of text sent by user (avg characters per message)",
                filter,
            ),
            entries,
        }
    }
}

impl fmt::Display for LengthBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.title)?;
        for entry in &self.entries {
            writeln!(
                f,
                "    {} - {} ({})",
                entry.name,
                thousands(entry.chars),
                average(entry.average)
            )?;
        }
        Ok(())
    }
}

/// A post in the most-liked tie set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikedPost {
    /// Member name of the sender
    pub sender: Option<String>,
    /// The post itself
    pub message: Message,
}

/// Every post tied for the highest like count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostLiked {
    /// Like count shared by every post in `posts`
    pub top_likes: usize,
    /// Tied posts, newest first
    pub posts: Vec<LikedPost>,
}

impl fmt::Display for MostLiked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Most-liked post(s) in group ({} likes):", self.top_likes)?;
        writeln!(f)?;
        for post in &self.posts {
            let date = post
                .message
                .local_datetime()
                .map(|dt| dt.format(DATE_FORMAT).to_string())
                .unwrap_or_default();
            writeln!(
                f,
                "Sender: {} | Date: {}",
                post.sender.as_deref().unwrap_or("None"),
                date
            )?;
            writeln!(f, "    Text: {}", post.message.text().unwrap_or("None"))?;
            for attachment in post.message.attachments() {
                if let Some(url) = &attachment.url {
                    writeln!(f, "    Attachment: {url} ({})", attachment.kind)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A past sender who is no longer a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orphan {
    /// Sender id from the message history
    pub user_id: String,
    /// First non-null display name seen
    pub name: Option<String>,
}

/// Departed senders of a group, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanReport {
    /// Group name as given by the caller
    pub group: String,
    /// Senders missing from the member list
    pub orphans: Vec<Orphan>,
}

impl fmt::Display for OrphanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Users that have left group '{}':", self.group)?;
        for orphan in &self.orphans {
            writeln!(
                f,
                "    Name: {} | GroupMe ID #: {}",
                orphan.name.as_deref().unwrap_or("None"),
                orphan.user_id
            )?;
        }
        Ok(())
    }
}

fn with_filter(base: &str, filter: &str) -> String {
    if filter.is_empty() {
        base.to_string()
    } else {
        format!("{base} {filter}")
    }
}

/// Formats an integer with `,` between thousands.
fn thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Formats an average rounded to two places, like `1,234.5` or `4.0`.
///
/// Trailing zeros of the fraction are dropped but one digit always stays.
fn average(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    let frac = frac.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    format!("{}.{frac}", group_digits(int))
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
