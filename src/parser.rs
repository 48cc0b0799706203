//! Unified parser trait for chat exports.
//!
//! Every source format is read by one [`Parser`] implementation that walks its
//! on-disk layout and returns a [`ParseReport`]: the normalized messages plus
//! a record of everything that had to be skipped along the way.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "whatsapp")]
//! # fn main() -> chatcorpus::Result<()> {
//! use chatcorpus::parser::Parser;
//! use chatcorpus::parsers::WhatsAppParser;
//! use std::path::Path;
//!
//! let parser = WhatsAppParser::new();
//! let report = parser.parse(Path::new("exports/whatsapp"))?;
//!
//! for msg in &report.messages {
//!     println!("{}: {}", msg.sender, msg.text);
//! }
//! println!("{} lines skipped", report.skipped.len());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "whatsapp"))]
//! # fn main() {}
//! ```
//!
//! # Platform Selection
//!
//! Use [`Platform`] enum to dynamically select parsers:
//!
//! ```rust
//! # #[cfg(feature = "telegram")]
//! # fn main() {
//! use chatcorpus::config::IngestConfig;
//! use chatcorpus::parser::{Platform, create_parser};
//!
//! let parser = create_parser(Platform::Telegram, &IngestConfig::new()).unwrap();
//! assert_eq!(parser.name(), "Telegram");
//! # }
//! # #[cfg(not(feature = "telegram"))]
//! # fn main() {}
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::config::IngestConfig;
use crate::error::CorpusError;

/// Supported messaging platforms.
///
/// Doubles as the `source` tag of every [`Message`].
///
/// # Example
///
/// ```rust
/// use chatcorpus::parser::Platform;
/// use std::str::FromStr;
///
/// let platform = Platform::from_str("skype").unwrap();
/// assert_eq!(platform, Platform::Skype);
///
/// // Aliases are supported
/// let platform = Platform::from_str("wa").unwrap();
/// assert_eq!(platform, Platform::WhatsApp);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// WhatsApp TXT exports, one file per conversation
    #[serde(alias = "wa")]
    WhatsApp,

    /// Telegram HTML exports, one directory per conversation
    #[serde(alias = "tg")]
    Telegram,

    /// Instagram JSON exports, one directory per conversation
    #[serde(alias = "ig")]
    Instagram,

    /// Skype JSON export, one file for all conversations
    #[serde(alias = "sk")]
    Skype,
}

impl Platform {
    /// Returns the extension of the files this platform's exports consist of.
    pub fn default_extension(&self) -> &'static str {
        match self {
            Platform::WhatsApp => "txt",
            Platform::Telegram => "html",
            Platform::Instagram | Platform::Skype => "json",
        }
    }

    /// Returns the lowercase tag used in serialized output.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::WhatsApp => "whatsapp",
            Platform::Telegram => "telegram",
            Platform::Instagram => "instagram",
            Platform::Skype => "skype",
        }
    }

    /// Returns all platform names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &[
            "whatsapp", "wa", "telegram", "tg", "instagram", "ig", "skype", "sk",
        ]
    }

    /// Returns all available platforms.
    pub fn all() -> &'static [Platform] {
        &[
            Platform::WhatsApp,
            Platform::Telegram,
            Platform::Instagram,
            Platform::Skype,
        ]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::WhatsApp => write!(f, "WhatsApp"),
            Platform::Telegram => write!(f, "Telegram"),
            Platform::Instagram => write!(f, "Instagram"),
            Platform::Skype => write!(f, "Skype"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whatsapp" | "wa" => Ok(Platform::WhatsApp),
            "telegram" | "tg" => Ok(Platform::Telegram),
            "instagram" | "ig" => Ok(Platform::Instagram),
            "skype" | "sk" => Ok(Platform::Skype),
            _ => Err(format!(
                "Unknown platform: '{}'. Expected one of: {}",
                s,
                Platform::all_names().join(", ")
            )),
        }
    }
}

/// Granularity at which something was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipKind {
    /// A record the format deliberately discards (e.g. unrecognized markup root).
    Dropped,
    /// A single line or message that failed to parse.
    Item,
    /// A whole file, page or conversation directory that failed.
    Unit,
}

/// One skipped line, message, file or directory.
#[derive(Debug)]
pub struct Skipped {
    /// File or directory the failure belongs to.
    pub file: PathBuf,
    /// Line or message index inside `file`, for item-level skips.
    pub index: Option<usize>,
    /// Granularity of the skip.
    pub kind: SkipKind,
    /// What went wrong.
    pub error: CorpusError,
}

/// Output of one parser run: messages in source order plus soft failures.
#[derive(Debug)]
pub struct ParseReport {
    /// Platform that produced this report.
    pub platform: Platform,
    /// Normalized messages, in source order.
    pub messages: Vec<Message>,
    /// Everything that was skipped, in the order it was encountered.
    pub skipped: Vec<Skipped>,
}

impl ParseReport {
    /// Creates an empty report.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            messages: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Records a per-line or per-message failure and logs it.
    pub fn skip_item(&mut self, file: &Path, index: usize, error: CorpusError) {
        tracing::warn!(
            platform = %self.platform,
            file = %file.display(),
            index,
            error = %error,
            "Skipping record"
        );
        self.skipped.push(Skipped {
            file: file.to_path_buf(),
            index: Some(index),
            kind: SkipKind::Item,
            error,
        });
    }

    /// Records a record that the format discards on purpose.
    pub fn drop_item(&mut self, file: &Path, index: usize, error: CorpusError) {
        tracing::debug!(
            platform = %self.platform,
            file = %file.display(),
            index,
            reason = %error,
            "Dropping record"
        );
        self.skipped.push(Skipped {
            file: file.to_path_buf(),
            index: Some(index),
            kind: SkipKind::Dropped,
            error,
        });
    }

    /// Records a failed file, page or directory and logs it once.
    pub fn fail_unit(&mut self, file: &Path, error: CorpusError) {
        tracing::error!(
            platform = %self.platform,
            file = %file.display(),
            error = %error,
            "Error while parsing"
        );
        self.skipped.push(Skipped {
            file: file.to_path_buf(),
            index: None,
            kind: SkipKind::Unit,
            error,
        });
    }

    /// Appends another report's content (used when a unit is parsed in isolation).
    pub fn extend(&mut self, other: ParseReport) {
        self.messages.extend(other.messages);
        self.skipped.extend(other.skipped);
    }

    /// Number of skips of the given kind.
    pub fn count(&self, kind: SkipKind) -> usize {
        self.skipped.iter().filter(|s| s.kind == kind).count()
    }
}

/// Unified trait for parsing chat exports.
///
/// `parse` returns `Err` only when the source cannot be read at all; any
/// narrower failure ends up in [`ParseReport::skipped`].
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Returns the platform this parser handles.
    fn platform(&self) -> Platform;

    /// Parses the export rooted at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] if the input as a whole is unusable
    /// (missing directory, unreadable export file, undecodable JSON).
    fn parse(&self, path: &Path) -> Result<ParseReport, CorpusError>;

    /// Parses an export (convenience method accepting &str path).
    fn parse_file(&self, path: &str) -> Result<ParseReport, CorpusError> {
        self.parse(Path::new(path))
    }
}

/// Creates a parser for the specified platform.
///
/// # Errors
///
/// Returns [`CorpusError::InvalidFormat`] if the parser feature for
/// `platform` is not enabled.
#[allow(unused_variables)]
pub fn create_parser(platform: Platform, config: &IngestConfig) -> Result<Box<dyn Parser>, CorpusError> {
    Ok(match platform {
        #[cfg(feature = "whatsapp")]
        Platform::WhatsApp => Box::new(crate::parsers::WhatsAppParser::with_config(
            config.whatsapp.clone(),
        )),
        #[cfg(feature = "telegram")]
        Platform::Telegram => Box::new(crate::parsers::TelegramParser::with_config(
            config.telegram.clone(),
        )),
        #[cfg(feature = "instagram")]
        Platform::Instagram => Box::new(crate::parsers::InstagramParser::with_config(
            config.instagram.clone(),
        )),
        #[cfg(feature = "skype")]
        Platform::Skype => Box::new(crate::parsers::SkypeParser::with_config(
            config.skype.clone(),
        )),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(CorpusError::invalid_format(
                platform.tag(),
                format!("parser not compiled in; enable the '{}' feature", platform.tag()),
            ));
        }
    })
}
