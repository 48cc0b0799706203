//! Property-based tests for chatcorpus.
//!
//! These tests generate random inputs to find edge cases.

#![cfg(feature = "full")]

use proptest::prelude::*;

use chatcorpus::Message;
use chatcorpus::classify::{LINK, MEDIA_OMITTED, TextClassifier, is_link};
use chatcorpus::config::Locale;
use chatcorpus::core::output::{OutputConfig, to_csv};
use chatcorpus::core::{FilterConfig, apply_filters};
use chatcorpus::corpus::Corpus;
use chatcorpus::markup::{EmoticonTable, MarkupNode, Tag, flatten};
use chatcorpus::parser::Platform;
use chatcorpus::parsers::WhatsAppParser;
use chatcorpus::parsing::instagram::repair_encoding;
use chatcorpus::parsing::skype::parse_arrival_time;
use chatcorpus::parsing::telegram::parse_date_title;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

fn arb_platform() -> impl Strategy<Value = Platform> {
    prop::sample::select(Platform::all().to_vec())
}

/// Generate a random Message from predefined senders and contents.
fn arb_message() -> impl Strategy<Value = Message> {
    (
        prop::sample::select(vec!["Alice", "Bob", "Charlie", "Иван", "Me"]),
        prop::sample::select(vec!["Hello", "Hi there!", "Привет мир", "ok", "see you tomorrow"]),
        0i64..10_000,
        arb_platform(),
    )
        .prop_map(|(sender, text, minutes, source)| {
            Message::new(source, base_time() + Duration::minutes(minutes), sender, text).with_conversation("Bob")
        })
}

/// Undoes what the export does to non-ASCII text: one char per UTF-8 byte.
fn mojibake(s: &str) -> String {
    s.bytes().map(char::from).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Classification
    // =========================================================================

    #[test]
    fn url_prefix_is_link_for_every_source(
        prefix in prop::sample::select(vec!["http://", "https://", "www.", "HTTP://", "Https://", "WWW."]),
        rest in "[a-z0-9./?=-]{0,30}",
        source in arb_platform(),
    ) {
        let classifier = TextClassifier::default();
        let english = Locale::english();
        let text = format!("{prefix}{rest}");
        let locale = (source == Platform::WhatsApp).then_some(&english);
        prop_assert_eq!(classifier.classify(&text, source, locale), Some(LINK.to_string()));
    }

    #[test]
    fn plain_text_is_kept_verbatim(text in "[A-Za-z0-9 ,!?]{1,50}") {
        prop_assume!(!is_link(&text));
        let classifier = TextClassifier::default();
        prop_assert_eq!(classifier.classify(&text, Platform::Skype, None), Some(text.clone()));
        prop_assert_eq!(classifier.classify(&text, Platform::Telegram, None), Some(text));
    }

    // =========================================================================
    // Encoding repair
    // =========================================================================

    #[test]
    fn repair_is_identity_on_ascii(text in "[ -~]{0,100}") {
        prop_assert_eq!(repair_encoding(&text).unwrap(), text);
    }

    #[test]
    fn repair_reverses_latin1_mangling(text in "\\PC{0,40}") {
        prop_assert_eq!(repair_encoding(&mojibake(&text)).unwrap(), text);
    }

    // =========================================================================
    // Timestamps
    // =========================================================================

    #[test]
    fn telegram_title_drops_seconds(
        day in 1u32..=28, month in 1u32..=12, year in 2010i32..2030,
        hour in 0u32..24, minute in 0u32..60, second in 0u32..60,
    ) {
        let title = format!("{day:02}.{month:02}.{year} {hour:02}:{minute:02}:{second:02}");
        let parsed = parse_date_title(&title).unwrap();
        prop_assert_eq!(parsed, Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap());
    }

    #[test]
    fn skype_arrival_time_shifts_by_offset(hour in 0u32..24, offset in -12i64..=14) {
        let input = format!("2019-03-01T{hour:02}:30:59.123Z");
        let parsed = parse_arrival_time(&input, offset).unwrap();
        let expected = Utc.with_ymd_and_hms(2019, 3, 1, hour, 30, 0).unwrap() + Duration::hours(offset);
        prop_assert_eq!(parsed, expected);
    }

    // =========================================================================
    // WhatsApp continuation lines
    // =========================================================================

    #[test]
    fn continuation_lines_extend_the_open_message(
        first in "[a-z]{1,20}",
        continuations in prop::collection::vec("[a-z]{1,20}", 0..8),
    ) {
        let mut content = format!("1/2/20, 10:15 - Bob: {first}");
        for line in &continuations {
            content.push('\n');
            content.push_str(line);
        }

        let report = WhatsAppParser::new()
            .parse_conversation("WhatsApp Chat with Bob.txt", &content)
            .unwrap();

        prop_assert_eq!(report.messages.len(), 1);
        prop_assert!(report.skipped.is_empty());
        let expected = std::iter::once(first).chain(continuations).collect::<Vec<_>>().join("\n");
        prop_assert_eq!(report.messages[0].text(), expected.as_str());
    }

    // =========================================================================
    // Markup flattening
    // =========================================================================

    #[test]
    fn quote_keeps_only_following_siblings(
        quoted in "[a-z ]{0,20}",
        after in prop::collection::vec("[a-z ]{1,10}", 0..5),
    ) {
        let mut nodes = vec![MarkupNode::element(Tag::Quote, vec![MarkupNode::text(quoted)])];
        nodes.extend(after.iter().map(MarkupNode::text));

        let flat = flatten(&nodes, &EmoticonTable::default()).unwrap();
        prop_assert_eq!(flat, after.concat());
    }

    #[test]
    fn media_object_ignores_children(children in prop::collection::vec("[a-z]{0,10}", 0..5)) {
        let nodes = vec![MarkupNode::element(
            Tag::MediaObject,
            children.into_iter().map(MarkupNode::text).collect(),
        )];
        prop_assert_eq!(flatten(&nodes, &EmoticonTable::default()).unwrap(), MEDIA_OMITTED);
    }

    // =========================================================================
    // Corpus operations
    // =========================================================================

    #[test]
    fn sort_is_ordered_and_stable(minutes in prop::collection::vec(0i64..5, 0..60)) {
        // Few distinct timestamps so ties are common; the text records input order.
        let messages: Vec<Message> = minutes
            .iter()
            .enumerate()
            .map(|(i, m)| Message::new(Platform::Skype, base_time() + Duration::minutes(*m), "Bob", i.to_string()))
            .collect();

        let mut corpus = Corpus::from_messages(messages);
        corpus.sort_chronologically();

        for pair in corpus.messages.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
            if pair[0].timestamp == pair[1].timestamp {
                let a: usize = pair[0].text().parse().unwrap();
                let b: usize = pair[1].text().parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }

    #[test]
    fn filters_never_add_messages(
        messages in prop::collection::vec(arb_message(), 0..50),
        sender in prop::sample::select(vec!["Alice", "Bob", "Nobody"]),
        cutoff in 0i64..10_000,
    ) {
        let config = FilterConfig::new()
            .with_sender(sender)
            .with_after(base_time() + Duration::minutes(cutoff));
        let count = messages.len();
        let filtered = apply_filters(messages, &config);

        prop_assert!(filtered.len() <= count);
        for msg in &filtered {
            prop_assert_eq!(msg.sender(), sender);
            prop_assert!(msg.timestamp >= base_time() + Duration::minutes(cutoff));
        }
    }

    #[test]
    fn source_filter_keeps_one_platform(
        messages in prop::collection::vec(arb_message(), 0..50),
        source in arb_platform(),
    ) {
        let expected = messages.iter().filter(|m| m.source == source).count();
        let filtered = apply_filters(messages, &FilterConfig::new().with_source(source));
        prop_assert_eq!(filtered.len(), expected);
    }

    // =========================================================================
    // Output
    // =========================================================================

    #[test]
    fn csv_has_one_line_per_message(messages in prop::collection::vec(arb_message(), 0..50)) {
        let csv = to_csv(&messages, &OutputConfig::new()).unwrap();
        prop_assert_eq!(csv.lines().count(), messages.len() + 1);
    }
}
