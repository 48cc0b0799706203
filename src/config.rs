//! Configuration types for parsers and ingestion.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! # Parser Configurations
//!
//! - [`WhatsAppConfig`] - WhatsApp TXT export settings and locale phrases
//! - [`TelegramConfig`] - Telegram HTML export settings
//! - [`InstagramConfig`] - Instagram JSON export settings
//! - [`SkypeConfig`] - Skype JSON export settings and emoticon map
//! - [`IngestConfig`] - Input locations for every source plus the configs above
//!
//! Language-dependent phrases live in a [`PhraseBook`] that is built once and
//! handed to the parsers that need it.
//!
//! # Example
//!
//! ```rust
//! use chatcorpus::config::{IngestConfig, SkypeConfig};
//!
//! let config = IngestConfig::new()
//!     .with_whatsapp("exports/whatsapp")
//!     .with_skype("exports/skype/messages.json")
//!     .with_myself("Me")
//!     .with_skype_config(SkypeConfig::new().with_emoticons("emoticons.txt"));
//!
//! assert_eq!(config.inputs().len(), 2);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::parser::Platform;

/// Phrases of one export language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locale {
    /// Two-letter language code.
    pub code: String,

    /// Text found in WhatsApp export file names of this language.
    pub header: String,

    /// Word after which WhatsApp file names carry the peer name.
    pub trigger_word: String,

    /// Service line fragment announcing group creation.
    pub created_group: String,

    /// Placeholder WhatsApp writes for attachments (lowercase).
    pub media_omitted: String,

    /// Placeholders for deleted messages (lowercase, without dots).
    pub deleted: Vec<String>,

    /// Whether dates are written month first (`M/D/YY`).
    pub month_first: bool,
}

impl Locale {
    /// English export phrases.
    pub fn english() -> Self {
        Self {
            code: "en".to_string(),
            header: "WhatsApp Chat with".to_string(),
            trigger_word: "with".to_string(),
            created_group: "created group".to_string(),
            media_omitted: "<media omitted>".to_string(),
            deleted: vec![
                "you deleted this message".to_string(),
                "this message was deleted".to_string(),
            ],
            month_first: true,
        }
    }

    /// Italian export phrases.
    pub fn italian() -> Self {
        Self {
            code: "it".to_string(),
            header: "Chat WhatsApp con".to_string(),
            trigger_word: "con".to_string(),
            created_group: "creato il gruppo".to_string(),
            media_omitted: "<media omessi>".to_string(),
            deleted: vec![
                "hai eliminato questo messaggio".to_string(),
                "questo messaggio è stato eliminato".to_string(),
            ],
            month_first: false,
        }
    }
}

/// Language-keyed phrase tables used for classification and detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseBook {
    /// Known export languages, checked in order.
    pub locales: Vec<Locale>,

    /// Instagram "liked a message" notices, matched exactly.
    pub liked_message: Vec<String>,
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self {
            locales: vec![Locale::english(), Locale::italian()],
            liked_message: vec![
                "Liked a message".to_string(),
                "Ha messo \"Mi piace\" a un messaggio".to_string(),
            ],
        }
    }
}

impl PhraseBook {
    /// Creates the default English/Italian phrase book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds another export language.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locales.push(locale);
        self
    }

    /// Looks up a locale by its two-letter code.
    pub fn locale(&self, code: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.code == code)
    }

    /// Finds the first locale whose file-name header occurs in `stem`.
    pub fn detect(&self, stem: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| stem.contains(l.header.as_str()))
    }
}

/// Configuration for WhatsApp export parsing.
///
/// # Example
///
/// ```rust
/// use chatcorpus::config::{Locale, PhraseBook, WhatsAppConfig};
///
/// let config = WhatsAppConfig::new()
///     .with_phrases(PhraseBook::new().with_locale(Locale::english()));
/// assert!(config.phrases.locale("en").is_some());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Phrase tables for language detection and classification
    pub phrases: PhraseBook,
}

impl WhatsAppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the phrase tables.
    #[must_use]
    pub fn with_phrases(mut self, phrases: PhraseBook) -> Self {
        self.phrases = phrases;
        self
    }
}

/// Configuration for Telegram HTML export parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Page that carries the chat header and service block (default: `messages.html`)
    pub first_page: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            first_page: "messages.html".to_string(),
        }
    }
}

impl TelegramConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the first export page.
    #[must_use]
    pub fn with_first_page(mut self, name: impl Into<String>) -> Self {
        self.first_page = name.into();
        self
    }
}

/// Configuration for Instagram export parsing.
///
/// Meta exports UTF-8 text as Latin-1 code points; the parser repairs it
/// unless `fix_encoding` is turned off.
///
/// # Example
///
/// ```rust
/// use chatcorpus::config::InstagramConfig;
///
/// let config = InstagramConfig::new()
///     .with_myself("me.myself")
///     .with_fix_encoding(true);
/// assert_eq!(config.myself.as_deref(), Some("me.myself"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramConfig {
    /// Display name of the exporting user, excluded from participants.
    /// Parsing fails while it is unset.
    pub myself: Option<String>,

    /// Repair Latin-1 mis-decoded text (default: true)
    pub fix_encoding: bool,

    /// Phrase tables for classification
    pub phrases: PhraseBook,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            myself: None,
            fix_encoding: true,
            phrases: PhraseBook::default(),
        }
    }
}

impl InstagramConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exporting user's display name.
    #[must_use]
    pub fn with_myself(mut self, name: impl Into<String>) -> Self {
        self.myself = Some(name.into());
        self
    }

    /// Enables or disables encoding fix.
    #[must_use]
    pub fn with_fix_encoding(mut self, fix: bool) -> Self {
        self.fix_encoding = fix;
        self
    }

    /// Replaces the phrase tables.
    #[must_use]
    pub fn with_phrases(mut self, phrases: PhraseBook) -> Self {
        self.phrases = phrases;
        self
    }
}

/// Configuration for Skype export parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkypeConfig {
    /// Sender used when a message has no display name
    pub myself: Option<String>,

    /// Emoticon map file (`code glyph` per line)
    pub emoticons: Option<PathBuf>,

    /// Hours added to every arrival time (default: 2)
    pub utc_offset_hours: i64,

    /// Export file looked up when the input is a directory (default: `messages.json`)
    pub export_file: String,
}

impl Default for SkypeConfig {
    fn default() -> Self {
        Self {
            myself: None,
            emoticons: None,
            utc_offset_hours: 2,
            export_file: "messages.json".to_string(),
        }
    }
}

impl SkypeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback sender name.
    #[must_use]
    pub fn with_myself(mut self, name: impl Into<String>) -> Self {
        self.myself = Some(name.into());
        self
    }

    /// Sets the emoticon map file.
    #[must_use]
    pub fn with_emoticons(mut self, path: impl Into<PathBuf>) -> Self {
        self.emoticons = Some(path.into());
        self
    }

    /// Sets the fixed arrival-time correction.
    #[must_use]
    pub fn with_utc_offset_hours(mut self, hours: i64) -> Self {
        self.utc_offset_hours = hours;
        self
    }
}

/// Everything needed to build a corpus from several sources in one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory of WhatsApp `*.txt` exports
    pub whatsapp_dir: Option<PathBuf>,
    /// Directory of Telegram conversation directories
    pub telegram_dir: Option<PathBuf>,
    /// Directory of Instagram conversation directories
    pub instagram_dir: Option<PathBuf>,
    /// Skype `messages.json` (or its directory)
    pub skype_path: Option<PathBuf>,

    pub whatsapp: WhatsAppConfig,
    pub telegram: TelegramConfig,
    pub instagram: InstagramConfig,
    pub skype: SkypeConfig,
}

impl IngestConfig {
    /// Creates a configuration with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_whatsapp(mut self, dir: impl Into<PathBuf>) -> Self {
        self.whatsapp_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_telegram(mut self, dir: impl Into<PathBuf>) -> Self {
        self.telegram_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_instagram(mut self, dir: impl Into<PathBuf>) -> Self {
        self.instagram_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_skype(mut self, path: impl Into<PathBuf>) -> Self {
        self.skype_path = Some(path.into());
        self
    }

    /// Sets the exporting user's name for every source that needs it.
    #[must_use]
    pub fn with_myself(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.instagram.myself = Some(name.clone());
        self.skype.myself = Some(name);
        self
    }

    #[must_use]
    pub fn with_whatsapp_config(mut self, config: WhatsAppConfig) -> Self {
        self.whatsapp = config;
        self
    }

    #[must_use]
    pub fn with_instagram_config(mut self, config: InstagramConfig) -> Self {
        self.instagram = config;
        self
    }

    #[must_use]
    pub fn with_skype_config(mut self, config: SkypeConfig) -> Self {
        // Keep a previously configured identity unless the new config sets one.
        let myself = config.myself.clone().or(self.skype.myself.take());
        self.skype = SkypeConfig { myself, ..config };
        self
    }

    /// Configured sources in processing order.
    pub fn inputs(&self) -> Vec<(Platform, PathBuf)> {
        [
            (Platform::WhatsApp, &self.whatsapp_dir),
            (Platform::Telegram, &self.telegram_dir),
            (Platform::Instagram, &self.instagram_dir),
            (Platform::Skype, &self.skype_path),
        ]
        .into_iter()
        .filter_map(|(platform, path)| path.clone().map(|p| (platform, p)))
        .collect()
    }
}
