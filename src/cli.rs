//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Command`] - the subcommands
//! - [`Target`], [`FilterArgs`] - argument groups shared by several subcommands
//! - [`StatKind`], [`OutputFormat`] - value enums
//!
//! # Example
//!
//! ```rust
//! use clap::Parser;
//! use gmkit::cli::{Args, Command, StatKind};
//!
//! let args = Args::parse_from(["gmkit", "stats", "posts", "Team", "--from", "Rob"]);
//! match args.command {
//!     Command::Stats { report, group, filter } => {
//!         assert_eq!(report, StatKind::Posts);
//!         assert_eq!(group, "Team");
//!         assert_eq!(filter.from.as_deref(), Some("Rob"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{API_URL_ENV, ClientConfig, TOKEN_ENV};
use crate::core::filter::FilterSpec;
use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::message::ConversationKind;

/// Read message history, statistics and send messages from the command line.
#[derive(Parser, Debug, Clone)]
#[command(name = "gmkit")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    gmkit groups
    gmkit messages --group \"Football Chat\" --from Rob --on 2021-06-01
    gmkit messages --chat Rob --text 'goal+' --format jsonl -o rob.jsonl
    gmkit stats posts \"Football Chat\" --after 2021-01-01
    gmkit send --group \"Football Chat\" \"See you at 7\"")]
pub struct Args {
    /// API access token
    #[arg(long, env = TOKEN_ENV, global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, env = API_URL_ENV, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Log API calls to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Client configuration from the global flags.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url.clone());
        }
        config
    }
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List your groups
    Groups,

    /// List your direct-message threads
    Chats,

    /// Print the id of a group
    GroupId {
        /// Exact group name
        name: String,
    },

    /// Print the user id behind a direct-message thread
    ChatId {
        /// Exact name of the other participant
        name: String,
    },

    /// List the current members of a group
    Members {
        /// Exact group name
        group: String,
    },

    /// Print or export messages
    Messages {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print only the number of matching messages
        #[arg(long)]
        count: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<String>,

        /// Include message IDs
        #[arg(long)]
        ids: bool,

        /// Include like counts
        #[arg(long)]
        likes: bool,

        /// Include attachment URLs
        #[arg(long)]
        attachments: bool,
    },

    /// Send a message, split into chunks when too long
    Send {
        #[command(flatten)]
        target: Target,

        /// Message text
        text: String,
    },

    /// Group statistics
    Stats {
        /// Which report to print
        #[arg(value_enum)]
        report: StatKind,

        /// Exact group name
        group: String,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// The conversation a command acts on.
#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Group name
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Name of the other participant of a direct thread
    #[arg(long, value_name = "NAME")]
    pub chat: Option<String>,
}

impl Target {
    /// The kind and name of the selected conversation.
    pub fn kind_and_name(&self) -> (ConversationKind, &str) {
        match (&self.group, &self.chat) {
            (Some(group), _) => (ConversationKind::Group, group),
            (None, Some(chat)) => (ConversationKind::Direct, chat),
            (None, None) => (ConversationKind::Group, ""),
        }
    }
}

/// Message filter flags.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only messages from this member (name or nickname)
    #[arg(long, value_name = "USER")]
    pub from: Option<String>,

    /// Only messages whose text matches this regular expression
    #[arg(long, value_name = "REGEX")]
    pub text: Option<String>,

    /// Only messages posted on this date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, value_name = "DATE", conflicts_with_all = ["before", "after"])]
    pub on: Option<String>,

    /// Only messages posted on or before this date
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Only messages posted on or after this date
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,
}

impl FilterArgs {
    /// Builds the unresolved filter, validating dates.
    ///
    /// # Errors
    ///
    /// Returns [`GmkitError::InvalidDate`](crate::GmkitError::InvalidDate) for
    /// a malformed date.
    pub fn to_spec(&self) -> Result<FilterSpec> {
        let mut spec = FilterSpec::new();
        if let Some(from) = &self.from {
            spec = spec.with_username(from.clone());
        }
        if let Some(text) = &self.text {
            spec = spec.with_text(text.clone());
        }
        if let Some(on) = &self.on {
            spec = spec.with_date_on(on)?;
        }
        if let Some(before) = &self.before {
            spec = spec.with_date_before(before)?;
        }
        if let Some(after) = &self.after {
            spec = spec.with_date_after(after)?;
        }
        Ok(spec)
    }
}

/// Statistics reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum StatKind {
    /// Posts per member
    Posts,
    /// Likes received per member
    Likes,
    /// Posts liked per member
    Liked,
    /// Characters sent per member
    Length,
    /// The most-liked post(s)
    MostLiked,
    /// Past senders who left the group
    Orphans,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Sender, date and text per message
    #[default]
    Text,

    /// CSV with semicolon delimiter
    Csv,

    /// JSON array of messages
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Text => crate::format::OutputFormat::Text,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}

/// Export columns from the `messages` flags.
pub fn output_config(ids: bool, likes: bool, attachments: bool) -> OutputConfig {
    OutputConfig {
        include_ids: ids,
        include_likes: likes,
        include_attachments: attachments,
    }
}
