//! # gmkit CLI
//!
//! Command-line interface for the gmkit library.

use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use gmkit::api::{ApiClient, HttpClient};
use gmkit::cli::{Args, Command, FilterArgs, StatKind, output_config};
use gmkit::config::SplitConfig;
use gmkit::core::{MessageFilter, PageCursor, send_message};
use gmkit::format::{to_format_string, write_to_format};
use gmkit::message::{Conversation, ConversationKind};
use gmkit::{GmkitError, stats};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), GmkitError> {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    match &args.command {
        Command::Groups => {
            let client = HttpClient::new(args.client_config())?;
            for group in client.groups()? {
                println!("{}", group.name);
            }
        }
        Command::Chats => {
            let client = HttpClient::new(args.client_config())?;
            for chat in client.chats()? {
                println!("{}", chat.other_user_name);
            }
        }
        Command::GroupId { name } => {
            let client = HttpClient::new(args.client_config())?;
            println!("{}", client.resolve_group_id(name)?);
        }
        Command::ChatId { name } => {
            let client = HttpClient::new(args.client_config())?;
            println!("{}", client.resolve_chat_id(name)?);
        }
        Command::Members { group } => {
            let client = HttpClient::new(args.client_config())?;
            let id = client.resolve_group_id(group)?;
            for member in client.group_members(&id)? {
                println!(
                    "{} ({}) | ID: {}",
                    member.name, member.nickname, member.user_id
                );
            }
        }
        Command::Messages {
            target,
            filter,
            count,
            format,
            output,
            ids,
            likes,
            attachments,
        } => {
            let spec = filter.to_spec()?;
            let client = HttpClient::new(args.client_config())?;
            let (kind, name) = target.kind_and_name();
            let conversation = client.resolve(kind, name)?;
            let filter = spec.resolve_for(&client, &conversation)?;

            let messages = PageCursor::new(&client, conversation.clone())
                .with_filter(filter)
                .collect_all()?;

            if *count {
                println!("{}", messages.len());
                return Ok(());
            }

            let members = match &conversation {
                Conversation::Group { group_id } => client.group_members(group_id)?,
                Conversation::Direct { .. } => Vec::new(),
            };
            let config = output_config(*ids, *likes, *attachments);
            let format = (*format).into();
            match output {
                Some(path) => {
                    write_to_format(&messages, path, format, &config, &members)?;
                    eprintln!("Wrote {} messages to {path}", messages.len());
                }
                None => print!("{}", to_format_string(&messages, format, &config, &members)?),
            }
        }
        Command::Send { target, text } => {
            let client = HttpClient::new(args.client_config())?;
            let (kind, name) = target.kind_and_name();
            let conversation = client.resolve(kind, name)?;
            let receipts = send_message(&client, &conversation, text, &SplitConfig::default())?;
            println!("Sent {} message(s)", receipts.len());
        }
        Command::Stats {
            report,
            group,
            filter,
        } => {
            let spec = filter_spec(filter)?;
            let client = HttpClient::new(args.client_config())?;
            let filter = match spec {
                Some(spec) => {
                    let conversation = client.resolve(ConversationKind::Group, group)?;
                    Some(spec.resolve_for(&client, &conversation)?)
                }
                None => None,
            };
            println!("{}", render_stats(&client, *report, group, filter.as_ref())?);
        }
    }

    Ok(())
}

/// Parses the filter flags, `None` when no flag is set.
fn filter_spec(filter: &FilterArgs) -> Result<Option<gmkit::core::FilterSpec>, GmkitError> {
    let spec = filter.to_spec()?;
    Ok(spec.is_active().then_some(spec))
}

fn render_stats(
    client: &HttpClient,
    report: StatKind,
    group: &str,
    filter: Option<&MessageFilter>,
) -> Result<String, GmkitError> {
    match report {
        StatKind::Posts => stats::group_rank_num_posts(client, group, filter),
        StatKind::Likes => stats::group_rank_num_likes(client, group, filter),
        StatKind::Liked => stats::group_rank_num_liked(client, group, filter),
        StatKind::Length => stats::group_rank_len_posts(client, group, filter),
        StatKind::MostLiked => stats::group_most_liked_post(client, group, filter),
        StatKind::Orphans => stats::orphaned_users_report(client, group, filter),
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins unless `-v` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gmkit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gmkit=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
