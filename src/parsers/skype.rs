//! Skype JSON export parser.
//!
//! Skype exports every conversation into a single `messages.json`:
//!
//! ```json
//! {
//!   "conversations": [
//!     {
//!       "id": "8:bob",
//!       "displayName": "Bob",
//!       "threadProperties": null,
//!       "MessageList": [
//!         {
//!           "originalarrivaltime": "2019-03-01T22:30:59.123Z",
//!           "displayName": "Bob",
//!           "content": "<b>hi</b> <ss type=\"smile\">:)</ss>",
//!           "properties": null
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Message bodies are small markup fragments flattened through
//! [`markup`](crate::markup).

use std::fs;
use std::path::{Path, PathBuf};

use crate::Message;
use crate::classify::TextClassifier;
use crate::config::SkypeConfig;
use crate::error::CorpusError;
use crate::markup::{self, EmoticonTable};
use crate::parser::{ParseReport, Parser, Platform};
use crate::parsing::skype::{SkypeConversation, SkypeExport, SkypeRawMessage, parse_arrival_time, parse_markup};

/// Parser for Skype JSON exports.
///
/// # Example
///
/// ```rust
/// use chatcorpus::config::SkypeConfig;
/// use chatcorpus::markup::EmoticonTable;
/// use chatcorpus::parsers::SkypeParser;
/// use std::path::Path;
///
/// let parser = SkypeParser::with_config(SkypeConfig::new().with_myself("Me"));
/// let emoticons = EmoticonTable::parse("smile 🙂");
/// let json = r#"{"conversations": [{"id": "8:bob", "displayName": "Bob", "threadProperties": null,
///     "MessageList": [{"originalarrivaltime": "2019-03-01T10:00:00Z",
///                      "content": "<ss type=\"smile\">smile</ss>"}]}]}"#;
///
/// let report = parser
///     .parse_export(json, &emoticons, Path::new("messages.json"))
///     .unwrap();
/// assert_eq!(report.messages[0].text(), "🙂");
/// assert_eq!(report.messages[0].sender(), "Me");
/// ```
pub struct SkypeParser {
    config: SkypeConfig,
    classifier: TextClassifier,
}

enum Outcome {
    Message(Message),
    ServerGenerated,
    Dropped(CorpusError),
}

impl SkypeParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(SkypeConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: SkypeConfig) -> Self {
        Self {
            config,
            classifier: TextClassifier::default(),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &SkypeConfig {
        &self.config
    }

    /// Loads the configured emoticon map, or an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured map cannot be read.
    pub fn load_emoticons(&self) -> Result<EmoticonTable, CorpusError> {
        match &self.config.emoticons {
            Some(path) => EmoticonTable::load(path),
            None => Ok(EmoticonTable::default()),
        }
    }

    /// Export file for an input path: the path itself, or the export file
    /// inside it when it is a directory.
    pub fn export_path(&self, path: &Path) -> PathBuf {
        if path.is_dir() {
            path.join(&self.config.export_file)
        } else {
            path.to_path_buf()
        }
    }

    /// Parses a whole export held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be decoded. Conversation and
    /// message failures are recorded in the report.
    pub fn parse_export(
        &self,
        json: &str,
        emoticons: &EmoticonTable,
        file: &Path,
    ) -> Result<ParseReport, CorpusError> {
        let export: SkypeExport = serde_json::from_str(json)?;
        let mut report = ParseReport::new(Platform::Skype);
        for conversation in export.conversations {
            self.parse_conversation(conversation, emoticons, file, &mut report);
        }
        Ok(report)
    }

    #[tracing::instrument(
        skip_all,
        fields(conversation = %conversation.label(), group = conversation.is_group())
    )]
    fn parse_conversation(
        &self,
        conversation: SkypeConversation,
        emoticons: &EmoticonTable,
        file: &Path,
        report: &mut ParseReport,
    ) {
        let peer = if conversation.is_group() {
            None
        } else {
            match conversation.display_name.clone().or(conversation.id.clone()) {
                Some(peer) => Some(peer),
                None => {
                    report.fail_unit(file, CorpusError::missing_field("displayName", "Skype conversation"));
                    return;
                }
            }
        };

        for (index, value) in conversation.message_list.into_iter().enumerate() {
            match self.parse_message(value, emoticons) {
                Ok(Outcome::Message(msg)) => report.messages.push(msg.with_identity(peer.as_deref())),
                Ok(Outcome::ServerGenerated) => {
                    tracing::debug!(index, "Skipping server-generated message");
                }
                Ok(Outcome::Dropped(reason)) => report.drop_item(file, index, reason),
                Err(e) => report.skip_item(file, index, e),
            }
        }
    }

    fn parse_message(&self, value: serde_json::Value, emoticons: &EmoticonTable) -> Result<Outcome, CorpusError> {
        let raw: SkypeRawMessage = serde_json::from_value(value)?;
        if raw.is_server_generated() {
            return Ok(Outcome::ServerGenerated);
        }

        let timestamp = parse_arrival_time(&raw.originalarrivaltime, self.config.utc_offset_hours)?;
        let content = raw.content.unwrap_or_default();
        let nodes = parse_markup(&content)?;

        match nodes.first().and_then(markup::MarkupNode::tag) {
            Some(tag) if tag.is_recognized() => {}
            Some(tag) => return Ok(Outcome::Dropped(CorpusError::markup(format!("unrecognized root {tag:?}")))),
            None => return Ok(Outcome::Dropped(CorpusError::markup("body has no root element"))),
        }

        let flattened = markup::flatten(&nodes, emoticons)?;
        let Some(text) = self.classifier.classify(&flattened, Platform::Skype, None) else {
            return Ok(Outcome::Dropped(CorpusError::invalid_format("Skype", "dropped text")));
        };

        let sender = raw
            .display_name
            .or_else(|| self.config.myself.clone())
            .ok_or_else(|| CorpusError::missing_field("displayName", "Skype message"))?;

        Ok(Outcome::Message(
            Message::new(Platform::Skype, timestamp, sender, text).with_raw_content(Some(content)),
        ))
    }
}

impl Default for SkypeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for SkypeParser {
    fn name(&self) -> &'static str {
        "Skype"
    }

    fn platform(&self) -> Platform {
        Platform::Skype
    }

    fn parse(&self, path: &Path) -> Result<ParseReport, CorpusError> {
        let file = self.export_path(path);
        if !file.is_file() {
            return Err(CorpusError::source_unavailable(Platform::Skype, file));
        }
        let emoticons = self.load_emoticons()?;
        let json = fs::read_to_string(&file)?;
        let report = self.parse_export(&json, &emoticons, &file)?;

        tracing::info!(
            emoticons = emoticons.len(),
            messages = report.messages.len(),
            skipped = report.skipped.len(),
            "Parsed Skype export"
        );
        Ok(report)
    }
}
