//! Aggregation of all sources into one message corpus.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatcorpus::config::IngestConfig;
//! use chatcorpus::corpus::Corpus;
//!
//! let config = IngestConfig::new()
//!     .with_whatsapp("exports/whatsapp")
//!     .with_telegram("exports/telegram")
//!     .with_myself("Me");
//!
//! let mut corpus = Corpus::ingest(&config);
//! corpus.sort_chronologically();
//! println!("{} messages, {} skipped", corpus.len(), corpus.skipped_count());
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::config::IngestConfig;
use crate::error::CorpusError;
use crate::parser::{ParseReport, Platform, SkipKind, Skipped, create_parser};

/// What happened to one configured source.
#[derive(Debug)]
pub struct SourceReport {
    pub platform: Platform,
    /// Input path the source was read from.
    pub path: PathBuf,
    /// Messages contributed to the corpus.
    pub messages: usize,
    /// Soft failures inside the source.
    pub skipped: Vec<Skipped>,
    /// Set when the whole source could not be read.
    pub failure: Option<CorpusError>,
}

impl SourceReport {
    /// Returns `true` if the source was ingested at all.
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

/// Rename map applied to senders and conversation peers.
///
/// Loaded from a JSON object of `"original": "replacement"` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aliases(HashMap<String, String>);

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one rename.
    #[must_use]
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.0.insert(from.into(), to.into());
        self
    }

    /// Replacement for `name`, if any.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.0.get(name).map_or(name, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a JSON rename map.
    #[cfg(any(feature = "instagram", feature = "skype", feature = "json-output"))]
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON rename map file.
    #[cfg(any(feature = "instagram", feature = "skype", feature = "json-output"))]
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Messages of every ingested source plus what each source reported.
#[derive(Debug, Default)]
pub struct Corpus {
    pub messages: Vec<Message>,
    pub reports: Vec<SourceReport>,
}

impl Corpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps already parsed messages.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            reports: Vec::new(),
        }
    }

    /// Runs every configured source, in platform order.
    ///
    /// A source that cannot be read is logged and recorded; the others still
    /// run.
    pub fn ingest(config: &IngestConfig) -> Self {
        let mut corpus = Self::new();
        for (platform, path) in config.inputs() {
            match create_parser(platform, config).and_then(|parser| parser.parse(&path)) {
                Ok(report) => corpus.add_report(report, path),
                Err(e) => {
                    tracing::error!(
                        platform = %platform,
                        path = %path.display(),
                        error = %e,
                        "Source failed; continuing with the remaining sources"
                    );
                    corpus.reports.push(SourceReport {
                        platform,
                        path,
                        messages: 0,
                        skipped: Vec::new(),
                        failure: Some(e),
                    });
                }
            }
        }
        corpus
    }

    /// Appends one parser's output.
    pub fn add_report(&mut self, report: ParseReport, path: impl Into<PathBuf>) {
        let ParseReport {
            platform,
            messages,
            skipped,
        } = report;
        self.reports.push(SourceReport {
            platform,
            path: path.into(),
            messages: messages.len(),
            skipped,
            failure: None,
        });
        self.messages.extend(messages);
    }

    /// Sorts all messages by timestamp. Ties keep ingestion order.
    pub fn sort_chronologically(&mut self) {
        self.messages.sort_by_key(|m| m.timestamp);
    }

    /// Renames senders and conversation peers.
    pub fn apply_aliases(&mut self, aliases: &Aliases) {
        if aliases.is_empty() {
            return;
        }
        for msg in &mut self.messages {
            let sender = aliases.resolve(&msg.sender).to_string();
            msg.sender = sender;
            if let Some(peer) = msg.conversation.as_deref() {
                msg.conversation = Some(aliases.resolve(peer).to_string());
            }
        }
    }

    /// Distinct sender names, sorted.
    pub fn senders(&self) -> BTreeSet<&str> {
        self.messages.iter().map(Message::sender).collect()
    }

    pub fn contains_sender(&self, name: &str) -> bool {
        self.messages.iter().any(|m| m.sender == name)
    }

    /// Fails unless `name` authored at least one message.
    pub fn require_sender(&self, name: &str) -> Result<(), CorpusError> {
        if self.contains_sender(name) {
            Ok(())
        } else {
            Err(CorpusError::unknown_sender(name))
        }
    }

    /// Messages produced by one platform.
    pub fn by_source(&self, platform: Platform) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.source == platform)
    }

    /// Skipped lines, messages, files and directories across all sources.
    pub fn skipped_count(&self) -> usize {
        self.reports.iter().map(|r| r.skipped.len()).sum()
    }

    /// Skips of one kind across all sources.
    pub fn skipped_of(&self, kind: SkipKind) -> usize {
        self.reports
            .iter()
            .flat_map(|r| &r.skipped)
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Sources that could not be read at all.
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.reports.iter().filter(|r| !r.is_ok())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::Path;

    fn msg(source: Platform, hour: u32, sender: &str) -> Message {
        let ts = Utc.with_ymd_and_hms(2021, 6, 1, hour, 0, 0).unwrap();
        Message::new(source, ts, sender, "x").with_conversation("Bob")
    }

    #[test]
    fn test_sort_is_stable() {
        let mut corpus = Corpus::from_messages(vec![
            msg(Platform::Skype, 12, "a"),
            msg(Platform::WhatsApp, 9, "b"),
            msg(Platform::Telegram, 12, "c"),
        ]);
        corpus.sort_chronologically();
        let senders: Vec<_> = corpus.messages.iter().map(Message::sender).collect();
        assert_eq!(senders, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_apply_aliases() {
        let mut corpus = Corpus::from_messages(vec![msg(Platform::Skype, 1, "bob.live"), msg(Platform::Skype, 2, "Me")]);
        let aliases = Aliases::new().with("bob.live", "Bob Smith").with("Bob", "Bob Smith");
        corpus.apply_aliases(&aliases);
        assert_eq!(corpus.messages[0].sender(), "Bob Smith");
        assert_eq!(corpus.messages[0].conversation(), Some("Bob Smith"));
        assert_eq!(corpus.messages[1].sender(), "Me");
    }

    #[cfg(feature = "json-output")]
    #[test]
    fn test_aliases_from_json() {
        let aliases = Aliases::from_json(r#"{"live:bob": "Bob"}"#).unwrap();
        assert_eq!(aliases.resolve("live:bob"), "Bob");
        assert_eq!(aliases.resolve("other"), "other");
        assert!(Aliases::from_json("[1]").is_err());
    }

    #[test]
    fn test_senders_and_sources() {
        let corpus = Corpus::from_messages(vec![
            msg(Platform::Skype, 1, "b"),
            msg(Platform::WhatsApp, 2, "a"),
            msg(Platform::Skype, 3, "b"),
        ]);
        assert_eq!(corpus.senders().into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(corpus.contains_sender("a"));
        assert!(corpus.require_sender("zed").is_err());
        assert_eq!(corpus.by_source(Platform::Skype).count(), 2);
    }

    #[test]
    fn test_add_report_counts() {
        let mut report = ParseReport::new(Platform::WhatsApp);
        report.messages.push(msg(Platform::WhatsApp, 1, "a"));
        report.skip_item(Path::new("f.txt"), 2, CorpusError::markup("x"));

        let mut corpus = Corpus::new();
        corpus.add_report(report, "dir");
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.skipped_count(), 1);
        assert_eq!(corpus.skipped_of(SkipKind::Item), 1);
        assert_eq!(corpus.failed_sources().count(), 0);
    }

    #[cfg(feature = "full")]
    #[test]
    fn test_ingest_isolates_failed_source() {
        let dir = tempfile::tempdir().unwrap();
        let wa = dir.path().join("wa");
        std::fs::create_dir(&wa).unwrap();
        std::fs::write(wa.join("WhatsApp Chat with Bob.txt"), "1/2/20, 10:15 - Bob: hi\n").unwrap();

        let config = IngestConfig::new()
            .with_whatsapp(&wa)
            .with_skype(dir.path().join("missing"));
        let corpus = Corpus::ingest(&config);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.reports.len(), 2);
        assert_eq!(corpus.failed_sources().count(), 1);
        assert_eq!(corpus.failed_sources().next().unwrap().platform, Platform::Skype);
    }

    #[cfg(all(feature = "whatsapp", feature = "instagram"))]
    #[test]
    fn test_ingest_instagram_without_myself_fails_that_source() {
        let dir = tempfile::tempdir().unwrap();
        let wa = dir.path().join("wa");
        std::fs::create_dir(&wa).unwrap();
        std::fs::write(wa.join("WhatsApp Chat with Bob.txt"), "1/2/20, 10:15 - Bob: hi\n").unwrap();
        let ig = dir.path().join("ig");
        std::fs::create_dir(&ig).unwrap();

        let corpus = Corpus::ingest(&IngestConfig::new().with_whatsapp(&wa).with_instagram(&ig));
        assert_eq!(corpus.len(), 1);
        let failed = corpus.failed_sources().next().unwrap();
        assert_eq!(failed.platform, Platform::Instagram);
        assert!(matches!(failed.failure, Some(CorpusError::MissingField { field: "myself", .. })));
    }

    #[cfg(all(feature = "whatsapp", not(feature = "skype")))]
    #[test]
    fn test_ingest_disabled_parser_fails_that_source() {
        let dir = tempfile::tempdir().unwrap();
        let wa = dir.path().join("wa");
        std::fs::create_dir(&wa).unwrap();
        std::fs::write(wa.join("WhatsApp Chat with Bob.txt"), "1/2/20, 10:15 - Bob: hi\n").unwrap();

        let corpus = Corpus::ingest(&IngestConfig::new().with_whatsapp(&wa).with_skype(dir.path()));
        assert_eq!(corpus.len(), 1);
        let failed = corpus.failed_sources().next().unwrap();
        assert_eq!(failed.platform, Platform::Skype);
        assert!(matches!(failed.failure, Some(CorpusError::InvalidFormat { format: "skype", .. })));
    }
}
