//! Telegram HTML export parser.

use std::fs;
use std::path::Path;

use scraper::Html;

use crate::Message;
use crate::classify::{MEDIA_OMITTED, TextClassifier};
use crate::config::TelegramConfig;
use crate::error::CorpusError;
use crate::parser::{ParseReport, Parser, Platform};
use crate::parsing::telegram::{self, PageHeader, RawContent};
use crate::parsing::{has_extension, sorted_entries};

/// Parser for Telegram HTML exports.
///
/// The input is a directory holding one subdirectory per conversation, as
/// produced by Telegram Desktop's "Export chat history" in HTML mode:
///
/// ```text
/// telegram/
/// ├── Bob/
/// │   ├── messages.html
/// │   └── messages2.html
/// └── Trip/
///     └── messages.html
/// ```
///
/// Joined messages (consecutive messages of one sender) take their sender
/// from the closest earlier message of the same conversation, across pages.
pub struct TelegramParser {
    config: TelegramConfig,
    classifier: TextClassifier,
}

impl TelegramParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(TelegramConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: TelegramConfig) -> Self {
        Self {
            config,
            classifier: TextClassifier::default(),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// Parses one export page.
    ///
    /// `last_sender` is the sender of the previous message in the
    /// conversation; the returned sender is the one to hand to the next page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page has no `div.history`.
    pub fn parse_page(
        &self,
        html: &str,
        file: &Path,
        header: &PageHeader,
        last_sender: Option<String>,
    ) -> Result<(ParseReport, Option<String>), CorpusError> {
        let document = Html::parse_document(html);
        let blocks = telegram::message_blocks(&document)?;
        let mut report = ParseReport::new(Platform::Telegram);

        let last_sender = blocks
            .into_iter()
            .enumerate()
            .fold(last_sender, |last_sender, (index, block)| {
                let raw = match telegram::parse_message(block) {
                    Ok(raw) => raw,
                    Err(e) => {
                        report.skip_item(file, index, e);
                        return telegram::sender_of(block).or(last_sender);
                    }
                };

                let last_sender = raw.from_name.or(last_sender);
                let Some(sender) = last_sender.as_deref() else {
                    report.skip_item(file, index, CorpusError::missing_field("from_name", "Telegram message"));
                    return last_sender;
                };

                let (raw_content, text) = match raw.content {
                    RawContent::Text(body) => {
                        match self.classifier.classify(&body, Platform::Telegram, None) {
                            Some(text) => (body, text),
                            None => {
                                report.drop_item(file, index, CorpusError::invalid_format("Telegram", "dropped text"));
                                return last_sender;
                            }
                        }
                    }
                    RawContent::Media(descriptor) => (descriptor, MEDIA_OMITTED.to_string()),
                };

                report.messages.push(
                    Message::new(Platform::Telegram, raw.timestamp, sender, text)
                        .with_identity(header.peer.as_deref())
                        .with_raw_content(Some(raw_content)),
                );
                last_sender
            });

        Ok((report, last_sender))
    }

    /// Parses one conversation directory.
    fn parse_conversation(&self, dir: &Path) -> Result<ParseReport, CorpusError> {
        let first_page = fs::read_to_string(dir.join(&self.config.first_page))?;
        let header = telegram::parse_page_header(&Html::parse_document(&first_page))?;

        let mut pages = sorted_entries(Platform::Telegram, dir, |p| has_extension(p, "html"))?;
        pages.sort_by(|a, b| telegram::compare_pages(a, b));

        let mut report = ParseReport::new(Platform::Telegram);
        let mut last_sender = None;
        for page in &pages {
            let parsed = fs::read_to_string(page)
                .map_err(CorpusError::from)
                .and_then(|html| self.parse_page(&html, page, &header, last_sender.clone()));
            match parsed {
                Ok((page_report, sender)) => {
                    report.extend(page_report);
                    last_sender = sender;
                }
                Err(e) => report.fail_unit(page, e),
            }
        }
        Ok(report)
    }
}

impl Default for TelegramParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for TelegramParser {
    fn name(&self) -> &'static str {
        "Telegram"
    }

    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    fn parse(&self, path: &Path) -> Result<ParseReport, CorpusError> {
        let conversations = sorted_entries(Platform::Telegram, path, Path::is_dir)?;
        let mut report = ParseReport::new(Platform::Telegram);

        for dir in &conversations {
            match self.parse_conversation(dir) {
                Ok(conversation) => report.extend(conversation),
                Err(e) => report.fail_unit(dir, e),
            }
        }

        tracing::info!(
            conversations = conversations.len(),
            messages = report.messages.len(),
            skipped = report.skipped.len(),
            "Parsed Telegram exports"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::LINK;
    use crate::parser::SkipKind;
    use tempfile::tempdir;

    fn page(header: &str, services: usize, body: &str) -> String {
        let mut html = format!(
            "<html><body><div class=\"page_header\"><div class=\"text bold\">{header}</div></div><div class=\"history\">"
        );
        for i in 0..services {
            html.push_str(&format!(
                "<div class=\"message service\"><div class=\"body details\">service {i}</div></div>"
            ));
        }
        html.push_str(body);
        html.push_str("</div></body></html>");
        html
    }

    fn message(title: &str, from: Option<&str>, text: &str) -> String {
        let from = from
            .map(|f| format!("<div class=\"from_name\">{f}</div>"))
            .unwrap_or_default();
        format!(
            "<div class=\"message default clearfix\"><div class=\"body\">\
             <div class=\"pull_right date details\" title=\"{title}\"></div>{from}\
             <div class=\"text\">{text}</div></div></div>"
        )
    }

    fn direct() -> PageHeader {
        PageHeader {
            is_group: false,
            peer: Some("Bob".to_string()),
        }
    }

    #[test]
    fn test_parser_name() {
        let parser = TelegramParser::new();
        assert_eq!(Parser::name(&parser), "Telegram");
        assert_eq!(parser.config().first_page, "messages.html");
    }

    #[test]
    fn test_parse_page_carries_sender() {
        let body = [
            message("01.02.2021 10:00:00", Some("Bob"), "Hi"),
            message("01.02.2021 10:01:00", None, "https://t.me/x"),
        ]
        .concat();
        let html = page("Bob", 1, &body);
        let parser = TelegramParser::new();

        let (report, last) = parser
            .parse_page(&html, Path::new("messages.html"), &direct(), None)
            .unwrap();
        assert_eq!(report.messages.len(), 2);
        assert_eq!(report.messages[1].sender(), "Bob");
        assert_eq!(report.messages[1].text(), LINK);
        assert_eq!(report.messages[1].conversation(), Some("Bob"));
        assert_eq!(last.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_parse_page_broken_block_still_sets_sender() {
        let broken = "<div class=\"message default clearfix\"><div class=\"body\">\
             <div class=\"pull_right date details\" title=\"01.02.2021 10:01:00\"></div>\
             <div class=\"from_name\">Bob</div></div></div>";
        let body = [
            message("01.02.2021 10:00:00", Some("Alice"), "a"),
            broken.to_string(),
            message("01.02.2021 10:02:00", None, "joined"),
        ]
        .concat();
        let html = page("Bob", 1, &body);

        let (report, last) = TelegramParser::new()
            .parse_page(&html, Path::new("messages.html"), &direct(), None)
            .unwrap();
        let senders: Vec<_> = report.messages.iter().map(Message::sender).collect();
        assert_eq!(senders, vec!["Alice", "Bob"]);
        assert_eq!(report.count(SkipKind::Item), 1);
        assert_eq!(report.skipped[0].index, Some(1));
        assert_eq!(last.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_parse_page_unknown_sender_is_skipped() {
        let html = page("Bob", 1, &message("01.02.2021 10:00:00", None, "orphan"));
        let (report, last) = TelegramParser::new()
            .parse_page(&html, Path::new("messages.html"), &direct(), None)
            .unwrap();
        assert!(report.messages.is_empty());
        assert_eq!(report.count(SkipKind::Item), 1);
        assert!(last.is_none());
    }

    #[test]
    fn test_parse_page_incoming_sender() {
        let html = page("Bob", 1, &message("01.02.2021 10:00:00", None, "continued"));
        let (report, _) = TelegramParser::new()
            .parse_page(&html, Path::new("messages2.html"), &direct(), Some("Alice".to_string()))
            .unwrap();
        assert_eq!(report.messages[0].sender(), "Alice");
    }

    #[test]
    fn test_parse_directory_across_pages() {
        let root = tempdir().unwrap();
        let chat = root.path().join("Bob");
        fs::create_dir(&chat).unwrap();
        fs::write(
            chat.join("messages.html"),
            page("Bob", 1, &message("01.02.2021 10:00:00", Some("Bob"), "first")),
        )
        .unwrap();
        fs::write(
            chat.join("messages2.html"),
            page("Bob", 0, &message("01.02.2021 11:00:00", None, "second")),
        )
        .unwrap();

        let group = root.path().join("Trip");
        fs::create_dir(&group).unwrap();
        let body = format!(
            "<div class=\"message service\"><div>Alice created group</div></div>{}",
            message("02.02.2021 09:00:00", Some("Alice"), "hey all")
        );
        fs::write(group.join("messages.html"), page("Trip", 1, &body)).unwrap();

        let broken = root.path().join("Broken");
        fs::create_dir(&broken).unwrap();

        let report = TelegramParser::new().parse(root.path()).unwrap();
        let texts: Vec<_> = report.messages.iter().map(|m| m.text().to_string()).collect();
        assert_eq!(texts, vec!["first", "second", "hey all"]);
        assert_eq!(report.messages[1].sender(), "Bob");
        assert!(report.messages[2].is_group());
        assert_eq!(report.count(SkipKind::Unit), 1);
    }
}
