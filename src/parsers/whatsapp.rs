//! `WhatsApp` TXT export parser.
//!
//! The input is a directory with one `*.txt` file per conversation, named the
//! way the app names them (`WhatsApp Chat with Bob.txt`,
//! `Chat WhatsApp con Luca.txt`). The file name decides the export language,
//! which in turn decides the date order and the placeholder phrases.
//!
//! Supported line format:
//! - `M/D/YY, HH:MM - Sender: Message` (English)
//! - `D/M/YY, HH:MM - Sender: Message` (Italian)

use std::fs;
use std::path::Path;

use crate::Message;
use crate::classify::TextClassifier;
use crate::config::WhatsAppConfig;
use crate::error::CorpusError;
use crate::parser::{ParseReport, Parser, Platform};
use crate::parsing::whatsapp::{self, Line};
use crate::parsing::{file_name, has_extension, sorted_entries};

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust
/// use chatcorpus::parsers::WhatsAppParser;
///
/// let parser = WhatsAppParser::new();
/// let report = parser
///     .parse_conversation(
///         "WhatsApp Chat with Bob.txt",
///         "1/2/20, 10:15 - Bob: Hello\n1/2/20, 10:20 - Me: Hi",
///     )
///     .unwrap();
/// assert_eq!(report.messages.len(), 2);
/// assert_eq!(report.messages[0].conversation(), Some("Bob"));
/// ```
pub struct WhatsAppParser {
    config: WhatsAppConfig,
    classifier: TextClassifier,
}

impl WhatsAppParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(WhatsAppConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: WhatsAppConfig) -> Self {
        let classifier = TextClassifier::new(config.phrases.clone());
        Self { config, classifier }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }

    /// Parses one conversation held in memory.
    ///
    /// `file_name` is the export's file name; it carries the language and,
    /// for direct chats, the peer name.
    ///
    /// # Errors
    ///
    /// [`CorpusError::LanguageDetection`] if no known header occurs in the
    /// file name. Line-level problems are recorded in the report instead.
    pub fn parse_conversation(&self, file_name: &str, content: &str) -> Result<ParseReport, CorpusError> {
        let locale = whatsapp::detect_locale(file_name, &self.config.phrases)?;
        let lines: Vec<&str> = content.lines().collect();
        let peer = if whatsapp::is_group(&lines, locale) {
            None
        } else {
            Some(whatsapp::peer_from_file_name(file_name, locale))
        };

        let path = Path::new(file_name);
        let mut report = ParseReport::new(Platform::WhatsApp);
        // Index of the message continuation lines are appended to.
        let mut open: Option<usize> = None;

        for (index, line) in lines.iter().enumerate() {
            match whatsapp::parse_line(line, locale) {
                Ok(Line::Message {
                    timestamp,
                    sender,
                    content,
                }) => match self.classifier.classify(content, Platform::WhatsApp, Some(locale)) {
                    Some(text) => {
                        let msg = Message::new(Platform::WhatsApp, timestamp, sender, text)
                            .with_identity(peer.as_deref())
                            .with_raw_content(Some(content.to_string()));
                        report.messages.push(msg);
                        open = Some(report.messages.len() - 1);
                    }
                    None => {
                        open = None;
                        report.drop_item(path, index, CorpusError::invalid_format("WhatsApp", "deleted message"));
                    }
                },
                Ok(Line::System) => {}
                Ok(Line::Continuation(raw)) => {
                    let raw = raw.trim();
                    let Some(open_index) = open else {
                        report.skip_item(
                            path,
                            index,
                            CorpusError::missing_field("open message", "WhatsApp continuation line"),
                        );
                        continue;
                    };
                    match self.classifier.classify(raw, Platform::WhatsApp, Some(locale)) {
                        Some(text) => report.messages[open_index].append_line(raw, &text),
                        None => report.skip_item(
                            path,
                            index,
                            CorpusError::invalid_format("WhatsApp", "deleted placeholder inside a message"),
                        ),
                    }
                }
                Err(e) => report.skip_item(path, index, e),
            }
        }

        Ok(report)
    }

    fn parse_file_at(&self, path: &Path) -> Result<ParseReport, CorpusError> {
        let content = fs::read_to_string(path)?;
        let mut report = self.parse_conversation(&file_name(path), &content)?;
        // Records carry the full path rather than the bare file name.
        for skipped in &mut report.skipped {
            skipped.file = path.to_path_buf();
        }
        Ok(report)
    }
}

impl Default for WhatsAppParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn platform(&self) -> Platform {
        Platform::WhatsApp
    }

    fn parse(&self, path: &Path) -> Result<ParseReport, CorpusError> {
        let files = sorted_entries(Platform::WhatsApp, path, |p| has_extension(p, "txt"))?;
        let mut report = ParseReport::new(Platform::WhatsApp);

        for file in &files {
            match self.parse_file_at(file) {
                Ok(conversation) => report.extend(conversation),
                Err(e) => report.fail_unit(file, e),
            }
        }

        tracing::info!(
            files = files.len(),
            messages = report.messages.len(),
            skipped = report.skipped.len(),
            "Parsed WhatsApp exports"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{LINK, MEDIA_OMITTED};
    use crate::parser::SkipKind;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    #[test]
    fn test_parser_name() {
        let parser = WhatsAppParser::new();
        assert_eq!(Parser::name(&parser), "WhatsApp");
        assert_eq!(parser.platform(), Platform::WhatsApp);
    }

    #[test]
    fn test_direct_conversation() {
        let parser = WhatsAppParser::new();
        let content = "1/2/20, 10:15 - Bob: Hello\n1/2/20, 11:40 - Me: <Media omitted>\n";
        let report = parser.parse_conversation("WhatsApp Chat with Bob.txt", content).unwrap();

        assert_eq!(report.messages.len(), 2);
        let first = &report.messages[0];
        assert_eq!(first.sender(), "Bob");
        assert_eq!(first.text(), "Hello");
        assert_eq!(first.conversation(), Some("Bob"));
        assert!(!first.is_group());
        assert_eq!(first.timestamp, Utc.with_ymd_and_hms(2020, 1, 2, 10, 0, 0).unwrap());
        assert_eq!(report.messages[1].text(), MEDIA_OMITTED);
        assert_eq!(report.messages[1].raw_content.as_deref(), Some("<Media omitted>"));
    }

    #[test]
    fn test_group_conversation() {
        let parser = WhatsAppParser::new();
        let content = "1/2/20, 10:00 - Messages and calls are end-to-end encrypted.\n\
                       1/2/20, 10:01 - Alice created group \"Trip\"\n\
                       1/2/20, 10:05 - Alice: www.example.com\n";
        let report = parser.parse_conversation("WhatsApp Chat with Trip.txt", content).unwrap();

        assert_eq!(report.messages.len(), 1);
        assert!(report.messages[0].is_group());
        assert!(report.messages[0].conversation().is_none());
        assert_eq!(report.messages[0].text(), LINK);
    }

    #[test]
    fn test_continuation_and_system_lines() {
        let parser = WhatsAppParser::new();
        let content = "1/2/20, 10:15 - Bob: first\n\
                       second line\n\
                       1/2/20, 10:16 - Bob changed the subject\n\
                       third line\n";
        let report = parser.parse_conversation("WhatsApp Chat with Bob.txt", content).unwrap();

        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].text(), "first\nsecond line\nthird line");
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_deleted_message_is_dropped() {
        let parser = WhatsAppParser::new();
        let content = "1/2/20, 10:15 - Bob: This message was deleted\n\
                       orphan\n\
                       1/2/20, 10:16 - Bob: ok\n";
        let report = parser.parse_conversation("WhatsApp Chat with Bob.txt", content).unwrap();

        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].text(), "ok");
        assert_eq!(report.count(SkipKind::Dropped), 1);
        assert_eq!(report.count(SkipKind::Item), 1);
        assert_eq!(report.skipped[1].index, Some(1));
    }

    #[test]
    fn test_italian_export() {
        let parser = WhatsAppParser::new();
        let content = "3/4/21, 09:30 - Luca: <Media omessi>\n3/4/21, 09:31 - Luca: Questo messaggio è stato eliminato\n";
        let report = parser.parse_conversation("Chat WhatsApp con Luca.txt", content).unwrap();

        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].text(), MEDIA_OMITTED);
        assert_eq!(report.messages[0].conversation(), Some("Luca"));
        assert_eq!(
            report.messages[0].timestamp,
            Utc.with_ymd_and_hms(2021, 4, 3, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unknown_language() {
        let parser = WhatsAppParser::new();
        let err = parser.parse_conversation("chat.txt", "1/2/20, 10:15 - Bob: x").unwrap_err();
        assert!(matches!(err, CorpusError::LanguageDetection { .. }));
    }

    #[test]
    fn test_parse_directory_isolates_bad_files() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("WhatsApp Chat with Bob.txt"),
            "1/2/20, 10:15 - Bob: Hello\n",
        )
        .unwrap();
        fs::write(dir.path().join("random.txt"), "1/2/20, 10:15 - Eve: x\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let report = WhatsAppParser::new().parse(dir.path()).unwrap();
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.count(SkipKind::Unit), 1);
        assert!(report.skipped[0].file.ends_with("random.txt"));
    }

    #[test]
    fn test_parse_missing_directory() {
        let dir = tempdir().unwrap();
        let err = WhatsAppParser::new().parse(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, CorpusError::SourceUnavailable { .. }));
    }
}
