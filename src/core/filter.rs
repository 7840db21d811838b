//! Filter messages by sender, date and text.
//!
//! Filtering happens in two phases. A [`FilterSpec`] holds what the user asked
//! for and can be built without touching the network. Resolving it against a
//! member list produces a [`MessageFilter`], an ordered list of
//! [`Predicate`]s that is applied to every message.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Sender | [`with_username`](FilterSpec::with_username) | Messages from a member (name or nickname) |
//! | Date | [`with_date_on`](FilterSpec::with_date_on) | Messages posted on that local date |
//! | Date to | [`with_date_before`](FilterSpec::with_date_before) | Messages on or before date |
//! | Date from | [`with_date_after`](FilterSpec::with_date_after) | Messages on or after date |
//! | Text | [`with_text`](FilterSpec::with_text) | Messages whose text contains a regex match |
//!
//! # Examples
//!
//! ```
//! use gmkit::core::filter::FilterSpec;
//! use gmkit::message::{GroupMessage, Member, Message};
//!
//! # fn main() -> gmkit::Result<()> {
//! let members = vec![Member::new("u1", "Alice", "Al"), Member::new("u2", "Bob", "")];
//! let messages: Vec<Message> = vec![
//!     GroupMessage::new("1", "g", "u1", 0).with_text("goal!").into(),
//!     GroupMessage::new("2", "g", "u2", 0).with_text("goal?").into(),
//!     GroupMessage::new("3", "g", "u1", 0).with_text("offside").into(),
//! ];
//!
//! let filter = FilterSpec::new()
//!     .with_username("Al")
//!     .with_text("^go")
//!     .resolve(Some(&members))?;
//!
//! let kept = filter.filter(messages);
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].id(), "1");
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Predicates run in a fixed order (sender, date, text) and stop at the
//!   first one that fails
//! - Dates are compared in the local time zone and both bounds are inclusive
//! - `date_on` replaces the range bounds entirely
//! - A message missing the field a predicate looks at fails that predicate

use std::fmt;

use chrono::NaiveDate;
use regex::Regex;

use crate::api::ApiClient;
use crate::core::conversation::find_member;
use crate::error::{GmkitError, Result};
use crate::message::{Conversation, Member, Message};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parses a filter date in `YYYY-MM-DD` or `DD/MM/YYYY` form.
///
/// # Errors
///
/// Returns [`GmkitError::InvalidDate`] if neither format matches.
///
/// # Examples
///
/// ```
/// use gmkit::core::filter::parse_date;
///
/// assert_eq!(parse_date("2021-06-01")?, parse_date("01/06/2021")?);
/// assert!(parse_date("June 1st").is_err());
/// # Ok::<(), gmkit::GmkitError>(())
/// ```
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| GmkitError::invalid_date(input))
}

/// Unresolved filter criteria.
///
/// All criteria are optional and combined with AND logic. Nothing is
/// validated beyond date syntax until [`resolve`](Self::resolve) is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Sender display name or nickname.
    pub username: Option<String>,

    /// Regular expression searched for anywhere in the text.
    pub text: Option<String>,

    /// Exact local date; when set the range bounds are ignored.
    pub date_on: Option<NaiveDate>,

    /// Latest local date to include.
    pub date_before: Option<NaiveDate>,

    /// Earliest local date to include.
    pub date_after: Option<NaiveDate>,
}

impl FilterSpec {
    /// Creates an empty set of criteria that lets every message through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only messages from this member.
    ///
    /// Resolved against the member list: the first member whose display
    /// name or nickname equals `username` wins. Direct messages, and
    /// usernames no member carries, are matched on the sender name.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Keeps only messages whose text contains a match for `pattern`.
    ///
    /// The pattern is compiled during [`resolve`](Self::resolve).
    #[must_use]
    pub fn with_text(mut self, pattern: impl Into<String>) -> Self {
        self.text = Some(pattern.into());
        self
    }

    /// Keeps only messages posted on this date.
    ///
    /// # Errors
    ///
    /// Returns [`GmkitError::InvalidDate`] if the date does not parse.
    pub fn with_date_on(mut self, date: &str) -> Result<Self> {
        self.date_on = Some(parse_date(date)?);
        Ok(self)
    }

    /// Keeps only messages posted on or before this date.
    ///
    /// # Errors
    ///
    /// Returns [`GmkitError::InvalidDate`] if the date does not parse.
    pub fn with_date_before(mut self, date: &str) -> Result<Self> {
        self.date_before = Some(parse_date(date)?);
        Ok(self)
    }

    /// Keeps only messages posted on or after this date.
    ///
    /// # Errors
    ///
    /// Returns [`GmkitError::InvalidDate`] if the date does not parse.
    pub fn with_date_after(mut self, date: &str) -> Result<Self> {
        self.date_after = Some(parse_date(date)?);
        Ok(self)
    }

    /// Returns `true` if any criterion is set.
    pub fn is_active(&self) -> bool {
        self.username.is_some()
            || self.text.is_some()
            || self.date_on.is_some()
            || self.date_before.is_some()
            || self.date_after.is_some()
    }

    /// Compiles these criteria into a [`MessageFilter`].
    ///
    /// `members` is the conversation's member list, or `None` for direct
    /// threads. A username that matches no member falls back to comparing
    /// the message's display name.
    ///
    /// # Errors
    ///
    /// Returns [`GmkitError::InvalidPattern`] if the text pattern is not a
    /// valid regular expression.
    pub fn resolve(&self, members: Option<&[Member]>) -> Result<MessageFilter> {
        let mut predicates = Vec::new();

        if let Some(username) = &self.username {
            let user_id = members
                .and_then(|members| find_member(members, username))
                .map(|member| member.user_id.clone());
            predicates.push(Predicate::Sender {
                username: username.clone(),
                user_id,
            });
        }

        if let Some(on) = self.date_on {
            predicates.push(Predicate::DateRange {
                after: Some(on),
                before: Some(on),
            });
        } else if self.date_after.is_some() || self.date_before.is_some() {
            predicates.push(Predicate::DateRange {
                after: self.date_after,
                before: self.date_before,
            });
        }

        if let Some(pattern) = &self.text {
            predicates.push(Predicate::TextMatch(Regex::new(pattern)?));
        }

        Ok(MessageFilter { predicates })
    }

    /// Resolves the criteria for a conversation, fetching the member list of
    /// group conversations when a username is set.
    ///
    /// # Errors
    ///
    /// Propagates API errors from the member lookup and pattern errors from
    /// [`resolve`](Self::resolve).
    pub fn resolve_for<C: ApiClient + ?Sized>(
        &self,
        client: &C,
        conversation: &Conversation,
    ) -> Result<MessageFilter> {
        match conversation {
            Conversation::Group { group_id } if self.username.is_some() => {
                let members = client.group_members(group_id)?;
                self.resolve(Some(&members))
            }
            _ => self.resolve(None),
        }
    }
}

/// A single filter criterion.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Sender identity. With a resolved `user_id` the message's `sender_id`
    /// is compared, otherwise its display name is compared to `username`.
    Sender {
        /// Name the user asked for
        username: String,
        /// Member id the name resolved to, if any
        user_id: Option<String>,
    },
    /// Inclusive local-date range; either side may be open.
    DateRange {
        /// Earliest date to accept
        after: Option<NaiveDate>,
        /// Latest date to accept
        before: Option<NaiveDate>,
    },
    /// Regex search over the text. Messages without text never match.
    TextMatch(Regex),
}

impl Predicate {
    /// Evaluates the predicate against one message.
    pub fn matches(&self, message: &Message) -> bool {
        match self {
            Predicate::Sender {
                user_id: Some(id), ..
            } => message.sender_id() == id,
            Predicate::Sender { username, .. } => message.name() == Some(username.as_str()),
            Predicate::DateRange { after, before } => match message.local_date() {
                Some(date) => {
                    after.is_none_or(|after| date >= after)
                        && before.is_none_or(|before| date <= before)
                }
                None => false,
            },
            Predicate::TextMatch(regex) => message.text().is_some_and(|text| regex.is_match(text)),
        }
    }
}

/// A resolved, ready-to-apply filter.
///
/// An empty filter accepts every message.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    predicates: Vec<Predicate>,
}

impl MessageFilter {
    /// Creates a filter from predicates, evaluated in the given order.
    pub fn from_predicates(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    /// Returns the predicates in evaluation order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns `true` if at least one predicate is set.
    pub fn is_active(&self) -> bool {
        !self.predicates.is_empty()
    }

    /// Returns `true` if the message passes every predicate.
    pub fn matches(&self, message: &Message) -> bool {
        self.predicates.iter().all(|p| p.matches(message))
    }

    /// Keeps the matching messages, preserving their order.
    pub fn filter(&self, messages: Vec<Message>) -> Vec<Message> {
        if !self.is_active() {
            return messages;
        }
        messages.into_iter().filter(|m| self.matches(m)).collect()
    }

    /// Like [`filter`](Self::filter) but clones out of a borrowed slice.
    pub fn filter_slice(&self, messages: &[Message]) -> Vec<Message> {
        messages
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }

    /// Human-readable summary, e.g. `from 'Rob' on 2021-06-01`.
    ///
    /// Empty when the filter is inactive.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MessageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for predicate in &self.predicates {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match predicate {
                Predicate::Sender { username, .. } => write!(f, "from '{username}'")?,
                Predicate::DateRange {
                    after: Some(a),
                    before: Some(b),
                } if a == b => write!(f, "on {a}")?,
                Predicate::DateRange {
                    after: Some(a),
                    before: Some(b),
                } => write!(f, "between {a} and {b}")?,
                Predicate::DateRange {
                    after: Some(a),
                    before: None,
                } => write!(f, "on or after {a}")?,
                Predicate::DateRange {
                    after: None,
                    before: Some(b),
                } => write!(f, "on or before {b}")?,
                Predicate::DateRange { .. } => f.write_str("at any date")?,
                Predicate::TextMatch(regex) => write!(f, "matching '{}'", regex.as_str())?,
            }
        }
        Ok(())
    }
}
