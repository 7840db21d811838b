//! Per-member statistics over a group's full history.
//!
//! Every aggregator follows the same walk: resolve the group name, take the
//! current member snapshot, page through the whole history with a
//! [`PageCursor`], fold each message that passes the optional filter into an
//! [`Accumulator`], and render the result.
//!
//! | Function | Report | Counts |
//! |----------|--------|--------|
//! | [`post_counts`] | [`Leaderboard`] | posts per member |
//! | [`likes_received`] | [`Leaderboard`] | likes on each member's posts |
//! | [`likes_given`] | [`Leaderboard`] | posts each member liked |
//! | [`length_stats`] | [`LengthBoard`] | characters and average per post |
//! | [`most_liked`] | [`MostLiked`] | posts tied for the most likes |
//! | [`orphaned_users`] | [`OrphanReport`] | senders who left the group |
//!
//! Service notices (`system`) never count. Senders missing from the member
//! snapshot are dropped from the leaderboards; [`orphaned_users`] reports
//! exactly those.
//!
//! # Example
//!
//! ```rust
//! use gmkit::api::MemoryClient;
//! use gmkit::message::{Conversation, Group, GroupMessage, Member};
//! use gmkit::stats;
//!
//! # fn main() -> gmkit::Result<()> {
//! let client = MemoryClient::new()
//!     .with_group(Group {
//!         id: "g".into(),
//!         name: "Team".into(),
//!         members: vec![Member::new("a", "Amy", ""), Member::new("r", "Rob", "")],
//!     })
//!     .with_history(
//!         Conversation::group("g"),
//!         vec![
//!             GroupMessage::new("1", "g", "a", 1).into(),
//!             GroupMessage::new("2", "g", "a", 2).into(),
//!             GroupMessage::new("3", "g", "r", 3).into(),
//!             GroupMessage::new("4", "g", "system", 4).into(),
//!         ],
//!     );
//!
//! let board = stats::post_counts(&client, "Team", None)?;
//! assert_eq!(board.to_string(), "Number of posts by user:\n    Amy - 2\n    Rob - 1\n");
//! # Ok(())
//! # }
//! ```

mod report;
mod scoreboard;

pub use report::{
    Leaderboard, LeaderboardEntry, LengthBoard, LengthEntry, LikedPost, MostLiked, Orphan,
    OrphanReport,
};
pub use scoreboard::{
    Accumulator, LengthTally, MostLikedTracker, OrphanTracker, Scoreboard, Tally, TallyKind,
};

use tracing::info;

use crate::api::ApiClient;
use crate::core::cursor::PageCursor;
use crate::core::filter::MessageFilter;
use crate::error::Result;
use crate::message::{ConversationKind, Member};

/// Walks a group's history into the accumulator built by `seed`.
fn walk<C, A, F>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
    seed: F,
) -> Result<A::Output>
where
    C: ApiClient + ?Sized,
    A: Accumulator,
    F: FnOnce(&[Member]) -> A,
{
    let conversation = client.resolve(ConversationKind::Group, group_name)?;
    let members = client.group_members(conversation.id())?;
    let mut acc = seed(&members);

    let mut cursor = PageCursor::new(client, conversation);
    let mut seen = 0usize;
    let mut kept = 0usize;
    while let Some(page) = cursor.next()? {
        seen += page.len();
        for message in &page {
            if filter.is_none_or(|f| f.matches(message)) {
                kept += 1;
                acc.observe(message);
            }
        }
    }

    info!(
        group = group_name,
        pages = cursor.pages_fetched(),
        messages = seen,
        kept,
        "aggregation finished"
    );
    Ok(acc.finish())
}

fn tally<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
    kind: TallyKind,
) -> Result<Leaderboard> {
    let entries = walk(client, group_name, filter, |members| Tally::new(kind, members))?;
    Ok(Leaderboard::new(kind, &describe(filter), entries))
}

fn describe(filter: Option<&MessageFilter>) -> String {
    filter.map(MessageFilter::describe).unwrap_or_default()
}

/// Number of posts per current member.
///
/// # Errors
///
/// Fails with `ConversationNotFound` before any page is fetched if no group
/// has that name, and propagates API errors from the walk.
pub fn post_counts<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<Leaderboard> {
    tally(client, group_name, filter, TallyKind::Posts)
}

/// Total likes received on each current member's posts.
///
/// # Errors
///
/// Same as [`post_counts`].
pub fn likes_received<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<Leaderboard> {
    tally(client, group_name, filter, TallyKind::LikesReceived)
}

/// Number of posts each current member liked.
///
/// # Errors
///
/// Same as [`post_counts`].
pub fn likes_given<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<Leaderboard> {
    tally(client, group_name, filter, TallyKind::LikesGiven)
}

/// Characters of text sent per current member, with the per-post average.
///
/// # Errors
///
/// Same as [`post_counts`].
pub fn length_stats<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<LengthBoard> {
    let entries = walk(client, group_name, filter, LengthTally::new)?;
    Ok(LengthBoard::new(&describe(filter), entries))
}

/// The post or posts with the most likes.
///
/// # Errors
///
/// Same as [`post_counts`].
pub fn most_liked<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<MostLiked> {
    let (top_likes, posts) = walk(client, group_name, filter, MostLikedTracker::new)?;
    Ok(MostLiked { top_likes, posts })
}

/// Senders who posted in the group but are no longer members.
///
/// # Errors
///
/// Same as [`post_counts`].
pub fn orphaned_users<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<OrphanReport> {
    let orphans = walk(client, group_name, filter, OrphanTracker::new)?;
    Ok(OrphanReport {
        group: group_name.to_string(),
        orphans,
    })
}

/// [`post_counts`] rendered as text.
pub fn group_rank_num_posts<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<String> {
    post_counts(client, group_name, filter).map(|r| r.to_string())
}

/// [`likes_received`] rendered as text.
pub fn group_rank_num_likes<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<String> {
    likes_received(client, group_name, filter).map(|r| r.to_string())
}

/// [`likes_given`] rendered as text.
pub fn group_rank_num_liked<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<String> {
    likes_given(client, group_name, filter).map(|r| r.to_string())
}

/// [`length_stats`] rendered as text.
pub fn group_rank_len_posts<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<String> {
    length_stats(client, group_name, filter).map(|r| r.to_string())
}

/// [`most_liked`] rendered as text.
pub fn group_most_liked_post<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<String> {
    most_liked(client, group_name, filter).map(|r| r.to_string())
}

/// [`orphaned_users`] rendered as text.
pub fn orphaned_users_report<C: ApiClient + ?Sized>(
    client: &C,
    group_name: &str,
    filter: Option<&MessageFilter>,
) -> Result<String> {
    orphaned_users(client, group_name, filter).map(|r| r.to_string())
}
