//! Instagram JSON export parser.
//!
//! Handles Meta's JSON exports with Mojibake encoding fix.
//!
//! Instagram exports messages as JSON (from "Download Your Data" feature),
//! one directory per conversation holding `message_1.json`,
//! `message_2.json`, ... The main quirk is that Meta exports UTF-8 text
//! encoded as ISO-8859-1, causing Cyrillic, accented and emoji text to appear
//! as garbage (Mojibake).

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::Message;
use crate::classify::{LINK, MEDIA_OMITTED, TextClassifier};
use crate::config::InstagramConfig;
use crate::error::CorpusError;
use crate::parser::{ParseReport, Parser, Platform};
use crate::parsing::instagram::{
    InstagramConversation, InstagramRawMessage, parse_ms_timestamp, repair_encoding,
};
use crate::parsing::{has_extension, sorted_entries};

/// Parser for Instagram JSON exports.
///
/// # Example
///
/// ```rust
/// use chatcorpus::config::InstagramConfig;
/// use chatcorpus::parsers::InstagramParser;
/// use std::path::Path;
///
/// let parser = InstagramParser::with_config(InstagramConfig::new().with_myself("me"));
/// let json = r#"{
///     "participants": [{"name": "bob"}, {"name": "me"}],
///     "messages": [{"sender_name": "bob", "timestamp_ms": 1600000000000, "content": "hey"}]
/// }"#;
/// let report = parser.parse_conversation(json, Path::new("message_1.json")).unwrap();
/// assert_eq!(report.messages[0].conversation(), Some("bob"));
/// ```
pub struct InstagramParser {
    config: InstagramConfig,
    classifier: TextClassifier,
}

impl InstagramParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(InstagramConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: InstagramConfig) -> Self {
        let classifier = TextClassifier::new(config.phrases.clone());
        Self { config, classifier }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &InstagramConfig {
        &self.config
    }

    // A direct chat has exactly one participant besides `myself`.
    fn myself(&self) -> Result<&str, CorpusError> {
        self.config
            .myself
            .as_deref()
            .ok_or_else(|| CorpusError::missing_field("myself", "Instagram configuration"))
    }

    fn repair(&self, s: &str) -> Result<String, CorpusError> {
        if self.config.fix_encoding {
            repair_encoding(s)
        } else {
            Ok(s.to_string())
        }
    }

    /// Parses one conversation file held in memory.
    ///
    /// Messages are returned in file order. `file` is only used to label
    /// skipped messages.
    ///
    /// # Errors
    ///
    /// Returns an error if `myself` is not configured, the JSON is invalid or
    /// no participant other than `myself` is listed.
    pub fn parse_conversation(&self, json: &str, file: &Path) -> Result<ParseReport, CorpusError> {
        let myself = self.myself()?;
        let conversation: InstagramConversation = serde_json::from_str(json)?;

        let mut others = Vec::new();
        for participant in &conversation.participants {
            let name = self.repair(&participant.name)?;
            if name != myself {
                others.push(name);
            }
        }
        let peer = match others.len() {
            0 => return Err(CorpusError::missing_field("participants", "Instagram conversation")),
            1 => others.pop(),
            _ => None,
        };

        let mut report = ParseReport::new(Platform::Instagram);
        for (index, value) in conversation.messages.into_iter().enumerate() {
            match self.parse_message(value) {
                Ok(msg) => report.messages.push(msg.with_identity(peer.as_deref())),
                Err(e) => report.skip_item(file, index, e),
            }
        }
        Ok(report)
    }

    fn parse_message(&self, value: Value) -> Result<Message, CorpusError> {
        let raw: InstagramRawMessage = serde_json::from_value(value)?;
        let sender = self.repair(&raw.sender_name)?;
        let timestamp = parse_ms_timestamp(raw.timestamp_ms).ok_or_else(|| {
            CorpusError::malformed_timestamp(raw.timestamp_ms.to_string(), "milliseconds since the Unix epoch")
        })?;

        let (raw_content, text) = if let Some(share) = raw.share {
            (Some(share.to_string()), LINK.to_string())
        } else if let Some(content) = raw.content {
            let content = self.repair(&content)?;
            let text = self
                .classifier
                .classify(&content, Platform::Instagram, None)
                .ok_or_else(|| CorpusError::invalid_format("Instagram", "dropped text"))?;
            (Some(content), text)
        } else {
            (None, MEDIA_OMITTED.to_string())
        };

        Ok(Message::new(Platform::Instagram, timestamp, sender, text).with_raw_content(raw_content))
    }

    fn parse_file_at(&self, file: &Path) -> Result<ParseReport, CorpusError> {
        let json = fs::read_to_string(file)?;
        self.parse_conversation(&json, file)
    }
}

impl Default for InstagramParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for InstagramParser {
    fn name(&self) -> &'static str {
        "Instagram"
    }

    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn parse(&self, path: &Path) -> Result<ParseReport, CorpusError> {
        self.myself()?;
        let conversations = sorted_entries(Platform::Instagram, path, Path::is_dir)?;
        let mut report = ParseReport::new(Platform::Instagram);
        let mut files = 0;

        for dir in &conversations {
            let entries = match sorted_entries(Platform::Instagram, dir, |p| has_extension(p, "json")) {
                Ok(entries) => entries,
                Err(e) => {
                    report.fail_unit(dir, e);
                    continue;
                }
            };
            for file in &entries {
                files += 1;
                match self.parse_file_at(file) {
                    Ok(conversation) => report.extend(conversation),
                    Err(e) => report.fail_unit(file, e),
                }
            }
        }

        tracing::info!(
            files,
            messages = report.messages.len(),
            skipped = report.skipped.len(),
            "Parsed Instagram exports"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::REACTION;
    use crate::parser::SkipKind;
    use tempfile::tempdir;

    fn mojibake(s: &str) -> String {
        s.bytes().map(char::from).collect()
    }

    fn parser() -> InstagramParser {
        InstagramParser::with_config(InstagramConfig::new().with_myself("me"))
    }

    #[test]
    fn test_parser_name() {
        let parser = InstagramParser::new();
        assert_eq!(Parser::name(&parser), "Instagram");
        assert!(parser.config().fix_encoding);
    }

    #[test]
    fn test_direct_conversation_kinds() {
        let json = serde_json::json!({
            "participants": [{"name": mojibake("Zoë")}, {"name": "me"}],
            "messages": [
                {"sender_name": mojibake("Zoë"), "timestamp_ms": 1_600_000_002_000_i64, "content": mojibake("ciao è")},
                {"sender_name": "me", "timestamp_ms": 1_600_000_001_000_i64, "share": {"link": "https://x.y"}},
                {"sender_name": "me", "timestamp_ms": 1_600_000_000_000_i64},
                {"sender_name": "me", "timestamp_ms": 1_600_000_000_000_i64, "content": "Liked a message"}
            ]
        })
        .to_string();

        let report = parser().parse_conversation(&json, Path::new("message_1.json")).unwrap();
        let texts: Vec<_> = report.messages.iter().map(Message::text).collect();
        assert_eq!(texts, vec!["ciao è", LINK, MEDIA_OMITTED, REACTION]);

        let first = &report.messages[0];
        assert_eq!(first.sender(), "Zoë");
        assert_eq!(first.conversation(), Some("Zoë"));
        assert!(report.messages[1].raw_content.as_deref().unwrap().contains("https://x.y"));
        assert!(report.messages[2].raw_content.is_none());
        // File order is kept, newest first as exported.
        assert!(report.messages[0].timestamp > report.messages[1].timestamp);
    }

    #[test]
    fn test_group_conversation() {
        let json = r#"{"participants":[{"name":"a"},{"name":"b"},{"name":"me"}],
            "messages":[{"sender_name":"a","timestamp_ms":1600000000000,"content":"hi"}]}"#;
        let report = parser().parse_conversation(json, Path::new("m.json")).unwrap();
        assert!(report.messages[0].is_group());
        assert!(report.messages[0].conversation().is_none());
    }

    #[test]
    fn test_no_other_participant_is_error() {
        let json = r#"{"participants":[{"name":"me"}],"messages":[]}"#;
        let err = parser().parse_conversation(json, Path::new("m.json")).unwrap_err();
        assert!(matches!(err, CorpusError::MissingField { .. }));
    }

    #[test]
    fn test_missing_myself_is_error() {
        let parser = InstagramParser::new();
        let json = r#"{"participants":[{"name":"bob"},{"name":"me"}],
            "messages":[{"sender_name":"bob","timestamp_ms":1600000000000,"content":"hi"}]}"#;
        let err = parser.parse_conversation(json, Path::new("m.json")).unwrap_err();
        assert!(matches!(err, CorpusError::MissingField { field: "myself", .. }));

        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("bob_1")).unwrap();
        fs::write(root.path().join("bob_1").join("message_1.json"), json).unwrap();
        assert!(parser.parse(root.path()).is_err());
    }

    #[test]
    fn test_direct_chat_has_one_other_participant() {
        let json = r#"{"participants":[{"name":"bob"},{"name":"me"}],
            "messages":[{"sender_name":"bob","timestamp_ms":1600000000000,"content":"hi"}]}"#;
        let report = parser().parse_conversation(json, Path::new("m.json")).unwrap();
        assert!(!report.messages[0].is_group());
        assert_eq!(report.messages[0].conversation(), Some("bob"));
    }

    #[test]
    fn test_bad_message_is_skipped() {
        let json = r#"{"participants":[{"name":"bob"}],"messages":[
            {"sender_name":"bob","content":"no time"},
            {"sender_name":"bob","timestamp_ms":1600000000000,"content":"caffè"},
            {"sender_name":"bob","timestamp_ms":1600000000000,"content":"ok"}]}"#;
        let report = parser().parse_conversation(json, Path::new("m.json")).unwrap();
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.count(SkipKind::Item), 2);
        assert_eq!(report.skipped[1].index, Some(1));
    }

    #[test]
    fn test_fix_encoding_disabled() {
        let parser =
            InstagramParser::with_config(InstagramConfig::new().with_myself("me").with_fix_encoding(false));
        let json = r#"{"participants":[{"name":"bob"}],
            "messages":[{"sender_name":"bob","timestamp_ms":1600000000000,"content":"caffè"}]}"#;
        let report = parser.parse_conversation(json, Path::new("m.json")).unwrap();
        assert_eq!(report.messages[0].text(), "caffè");
    }

    #[test]
    fn test_parse_directory() {
        let root = tempdir().unwrap();
        let chat = root.path().join("bob_123");
        fs::create_dir(&chat).unwrap();
        fs::write(
            chat.join("message_1.json"),
            r#"{"participants":[{"name":"bob"},{"name":"me"}],
                "messages":[{"sender_name":"bob","timestamp_ms":1600000000000,"content":"hi"}]}"#,
        )
        .unwrap();
        fs::write(chat.join("message_2.json"), "{ not json").unwrap();
        fs::write(root.path().join("stray.json"), "{}").unwrap();

        let report = parser().parse(root.path()).unwrap();
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.count(SkipKind::Unit), 1);
    }
}
