//! Property-based tests for gmkit.
//!
//! These tests generate random histories and texts to find edge cases in the
//! cursor walk, the filter and the message splitter.

use proptest::prelude::*;

use gmkit::api::MemoryClient;
use gmkit::config::SplitConfig;
use gmkit::core::{FilterSpec, PageCursor, split_message};
use gmkit::message::{Conversation, GroupMessage, Message};

/// Generate a history of `(sender, text)` pairs; ids and timestamps follow
/// the position so the history is strictly ordered.
fn arb_history(max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["u1", "u2", "u3", "system"]),
            prop::sample::select(vec![
                Some("Hello".to_string()),
                Some("goal goal".to_string()),
                Some("Привет мир".to_string()),
                Some("🎉🔥 emoji".to_string()),
                Some(String::new()),
                None,
            ]),
        ),
        0..max_len,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (sender, text))| {
                let mut msg = GroupMessage::new((i + 1).to_string(), "g", sender, i as i64 * 3600)
                    .with_name(sender);
                if let Some(text) = text {
                    msg = msg.with_text(text);
                }
                msg.into()
            })
            .collect()
    })
}

/// Text made of words, newlines and long unbroken runs.
fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "word ".to_string(),
            "\n".to_string(),
            "é".to_string(),
            "🚀".to_string(),
            "x".repeat(300),
            "long-sentence-without-spaces ".repeat(10),
        ]),
        0..120,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    /// The walk returns every message exactly once, newest first, whatever
    /// the page size.
    #[test]
    fn cursor_yields_each_message_once(history in arb_history(300), page_size in 1usize..=100) {
        let conversation = Conversation::group("g");
        let expected: Vec<String> = history.iter().rev().map(|m| m.id().to_string()).collect();
        let client = MemoryClient::new()
            .with_history(conversation.clone(), history)
            .with_page_size(page_size);

        let all = PageCursor::new(&client, conversation).collect_all().unwrap();
        let ids: Vec<String> = all.iter().map(|m| m.id().to_string()).collect();
        prop_assert_eq!(ids, expected);
    }

    /// Filtering a second time changes nothing.
    #[test]
    fn filter_is_idempotent(history in arb_history(100)) {
        let filter = FilterSpec::new().with_text("goal").resolve(None).unwrap();
        let once = filter.filter(history);
        let twice = filter.filter(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// A filtered walk equals filtering the full history.
    #[test]
    fn filtered_walk_matches_filtered_history(history in arb_history(250), page_size in 1usize..=100) {
        let conversation = Conversation::group("g");
        let filter = FilterSpec::new().with_username("u2").resolve(None).unwrap();
        let mut newest_first = history.clone();
        newest_first.reverse();
        let expected = filter.filter(newest_first);

        let client = MemoryClient::new()
            .with_history(conversation.clone(), history)
            .with_page_size(page_size);
        let walked = PageCursor::new(&client, conversation)
            .with_filter(filter)
            .collect_all()
            .unwrap();
        prop_assert_eq!(walked, expected);
    }

    /// Chunks stay under the hard limit and lose nothing but break characters.
    #[test]
    fn split_is_bounded_and_lossless(text in arb_text()) {
        let config = SplitConfig::default();
        let chunks = split_message(&text, &config);

        prop_assert!(!chunks.is_empty());
        for chunk in &chunks {
            prop_assert!(chunk.chars().count() < config.max_len);
        }

        let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        prop_assert_eq!(strip(&chunks.concat()), strip(&text));
    }
}
