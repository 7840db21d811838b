//! Pure accumulators behind the aggregators.
//!
//! Nothing here talks to the service. Each accumulator is seeded from a
//! member snapshot, fed messages one at a time through [`Accumulator`], and
//! finished into a report. This keeps the folding logic testable on plain
//! message slices.

use std::collections::HashMap;

use super::report::{LeaderboardEntry, LengthEntry, LikedPost, Orphan};
use crate::message::{CALENDAR_SENDER, Member, Message, SYSTEM_SENDER};

/// A fold over a message stream.
pub trait Accumulator {
    /// What the accumulator produces once the stream ends.
    type Output;

    /// Folds one message in.
    fn observe(&mut self, message: &Message);

    /// Consumes the accumulator.
    fn finish(self) -> Self::Output;

    /// Folds a whole page in, in order.
    fn observe_all(&mut self, messages: &[Message]) {
        for message in messages {
            self.observe(message);
        }
    }
}

/// Per-member scores, seeded from a member snapshot.
///
/// Only members present at seeding time have a slot; everyone else is
/// ignored. Duplicate user ids keep the first member's name.
#[derive(Debug, Clone)]
pub struct Scoreboard<T> {
    order: Vec<(String, String)>,
    scores: HashMap<String, T>,
}

impl<T: Default> Scoreboard<T> {
    /// Creates a zeroed slot for every member.
    pub fn seeded(members: &[Member]) -> Self {
        let mut order = Vec::with_capacity(members.len());
        let mut scores = HashMap::with_capacity(members.len());
        for member in members {
            if !scores.contains_key(&member.user_id) {
                scores.insert(member.user_id.clone(), T::default());
                order.push((member.user_id.clone(), member.name.clone()));
            }
        }
        Self { order, scores }
    }
}

impl<T> Scoreboard<T> {
    /// Returns `true` if `user_id` has a slot.
    pub fn contains(&self, user_id: &str) -> bool {
        self.scores.contains_key(user_id)
    }

    /// Score of a member.
    pub fn get(&self, user_id: &str) -> Option<&T> {
        self.scores.get(user_id)
    }

    /// Mutable score of a member, `None` for non-members.
    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut T> {
        self.scores.get_mut(user_id)
    }

    /// Display name of a member.
    pub fn name_of(&self, user_id: &str) -> Option<&str> {
        self.order
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, name)| name.as_str())
    }

    /// Number of members with a slot.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no member was seeded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(name, score)` pairs in seeding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.order
            .iter()
            .filter_map(|(id, name)| self.scores.get(id).map(|score| (name.as_str(), score)))
    }
}

/// Sorts ascending by metric then name, then reverses the whole order.
///
/// Ties therefore come out in descending name order.
pub(crate) fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| (a.value, &a.name).cmp(&(b.value, &b.name)));
    entries.reverse();
    entries
}

/// What a [`Tally`] counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyKind {
    /// One point per post.
    Posts,
    /// One point per like on the member's posts.
    LikesReceived,
    /// One point per post the member liked.
    LikesGiven,
}

/// Integer leaderboard accumulator.
#[derive(Debug, Clone)]
pub struct Tally {
    kind: TallyKind,
    board: Scoreboard<u64>,
}

impl Tally {
    /// Creates a tally seeded from `members`.
    pub fn new(kind: TallyKind, members: &[Member]) -> Self {
        Self {
            kind,
            board: Scoreboard::seeded(members),
        }
    }
}

impl Accumulator for Tally {
    type Output = Vec<LeaderboardEntry>;

    fn observe(&mut self, message: &Message) {
        if message.is_system() {
            return;
        }
        match self.kind {
            TallyKind::Posts => {
                if let Some(score) = self.board.get_mut(message.sender_id()) {
                    *score += 1;
                }
            }
            TallyKind::LikesReceived => {
                if let Some(score) = self.board.get_mut(message.sender_id()) {
                    *score += message.like_count() as u64;
                }
            }
            TallyKind::LikesGiven => {
                for liker in message.favorited_by() {
                    if let Some(score) = self.board.get_mut(liker) {
                        *score += 1;
                    }
                }
            }
        }
    }

    fn finish(self) -> Self::Output {
        let entries = self
            .board
            .iter()
            .map(|(name, value)| LeaderboardEntry {
                name: name.to_string(),
                value: *value,
            })
            .collect();
        rank(entries)
    }
}

/// Characters sent and posts counted per member.
#[derive(Debug, Clone)]
pub struct LengthTally {
    board: Scoreboard<(u64, u64)>,
}

impl LengthTally {
    /// Creates a tally seeded from `members`.
    pub fn new(members: &[Member]) -> Self {
        Self {
            board: Scoreboard::seeded(members),
        }
    }
}

impl Accumulator for LengthTally {
    type Output = Vec<LengthEntry>;

    fn observe(&mut self, message: &Message) {
        if message.is_system() {
            return;
        }
        let Some(text) = message.text() else {
            return;
        };
        if let Some((chars, posts)) = self.board.get_mut(message.sender_id()) {
            *chars += text.chars().count() as u64;
            *posts += 1;
        }
    }

    fn finish(self) -> Self::Output {
        let mut entries: Vec<LengthEntry> = self
            .board
            .iter()
            .map(|(name, &(chars, posts))| LengthEntry::new(name, chars, posts))
            .collect();
        entries.sort_by(|a, b| {
            a.chars
                .cmp(&b.chars)
                .then(a.average.total_cmp(&b.average))
                .then_with(|| a.name.cmp(&b.name))
        });
        entries.reverse();
        entries
    }
}

/// Tracks the posts tied for the most likes.
///
/// The running maximum starts at zero, so while no post has any likes every
/// post is part of the tie.
#[derive(Debug, Clone)]
pub struct MostLikedTracker {
    board: Scoreboard<()>,
    top_likes: usize,
    top_posts: Vec<Message>,
}

impl MostLikedTracker {
    /// Creates a tracker that only considers posts by `members`.
    pub fn new(members: &[Member]) -> Self {
        Self {
            board: Scoreboard::seeded(members),
            top_likes: 0,
            top_posts: Vec::new(),
        }
    }
}

impl Accumulator for MostLikedTracker {
    type Output = (usize, Vec<LikedPost>);

    fn observe(&mut self, message: &Message) {
        if message.is_system() || !self.board.contains(message.sender_id()) {
            return;
        }
        let likes = message.like_count();
        if likes > self.top_likes {
            self.top_likes = likes;
            self.top_posts = vec![message.clone()];
        } else if likes == self.top_likes {
            self.top_posts.push(message.clone());
        }
    }

    fn finish(self) -> Self::Output {
        let board = self.board;
        let posts = self
            .top_posts
            .into_iter()
            .map(|message| LikedPost {
                sender: board.name_of(message.sender_id()).map(str::to_string),
                message,
            })
            .collect();
        (self.top_likes, posts)
    }
}

/// Collects senders missing from the member snapshot.
#[derive(Debug, Clone)]
pub struct OrphanTracker {
    board: Scoreboard<()>,
    index: HashMap<String, usize>,
    orphans: Vec<Orphan>,
}

impl OrphanTracker {
    /// Creates a tracker against the current `members`.
    pub fn new(members: &[Member]) -> Self {
        Self {
            board: Scoreboard::seeded(members),
            index: HashMap::new(),
            orphans: Vec::new(),
        }
    }
}

impl Accumulator for OrphanTracker {
    type Output = Vec<Orphan>;

    fn observe(&mut self, message: &Message) {
        let sender = message.sender_id();
        if sender == SYSTEM_SENDER || sender == CALENDAR_SENDER || self.board.contains(sender) {
            return;
        }
        let name = message.name().map(str::to_string);
        match self.index.get(sender) {
            Some(&slot) => {
                let orphan = &mut self.orphans[slot];
                if orphan.name.is_none() {
                    orphan.name = name;
                }
            }
            None => {
                self.index.insert(sender.to_string(), self.orphans.len());
                self.orphans.push(Orphan {
                    user_id: sender.to_string(),
                    name,
                });
            }
        }
    }

    fn finish(self) -> Self::Output {
        self.orphans
    }
}
