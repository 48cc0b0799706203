//! # chatcorpus
//!
//! Normalizes chat exports from several messaging platforms into one corpus
//! of uniform [`Message`] records.
//!
//! ## Overview
//!
//! Supported exports:
//! - **WhatsApp** - `.txt` conversation files (English and Italian phrasing)
//! - **Telegram** - HTML export, one directory per conversation
//! - **Instagram** - JSON export, one directory per conversation
//! - **Skype** - a single `messages.json` with HTML-like message bodies
//!
//! Every message carries a timestamp, sender, conversation identity and a
//! classified text: literal text, or a sentinel such as
//! [`MEDIA_OMITTED`](classify::MEDIA_OMITTED) or [`LINK`](classify::LINK).
//! Bad lines, messages and files are skipped and logged through `tracing`;
//! they never abort the rest of the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatcorpus::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = IngestConfig::new()
//!         .with_whatsapp("exports/whatsapp")
//!         .with_skype("exports/skype/messages.json")
//!         .with_myself("Me");
//!
//!     let mut corpus = Corpus::ingest(&config);
//!     corpus.require_sender("Me")?;
//!     corpus.sort_chronologically();
//!
//!     write_jsonl(&corpus.messages, "corpus.jsonl", &OutputConfig::new())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Single Source
//!
//! ```rust,no_run
//! use chatcorpus::parser::{Parser, Platform, create_parser};
//! use chatcorpus::config::IngestConfig;
//!
//! let parser = create_parser(Platform::Telegram, &IngestConfig::new())?;
//! let report = parser.parse("exports/telegram".as_ref())?;
//! for skipped in &report.skipped {
//!     eprintln!("{}: {}", skipped.file.display(), skipped.error);
//! }
//! # Ok::<(), chatcorpus::CorpusError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`Parser`](parser::Parser) trait, [`Platform`](parser::Platform), [`ParseReport`](parser::ParseReport)
//! - [`parsers`] - one parser per platform
//! - [`parsing`] - format-level helpers (line grammar, page headers, markup)
//! - [`classify`] - [`TextClassifier`](classify::TextClassifier) and sentinels
//! - [`markup`] - Skype body tree and flattening
//! - [`corpus`] - [`Corpus`](corpus::Corpus) aggregation and [`Aliases`](corpus::Aliases)
//! - [`config`] - per-platform configuration and phrase tables
//! - [`core`] - filters and output writers
//! - [`format`] - [`OutputFormat`](format::OutputFormat) dispatch
//! - [`error`] - [`CorpusError`] and [`Result`]

#[cfg(feature = "cli")]
pub mod cli;
pub mod classify;
pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
pub mod format;
pub mod markup;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod parsing;

pub use error::{CorpusError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatcorpus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;

    pub use crate::error::{CorpusError, Result};

    pub use crate::parser::{ParseReport, Parser, Platform, SkipKind, Skipped, create_parser};

    pub use crate::config::{
        IngestConfig, InstagramConfig, PhraseBook, SkypeConfig, TelegramConfig, WhatsAppConfig,
    };

    pub use crate::classify::TextClassifier;
    pub use crate::corpus::{Aliases, Corpus};

    pub use crate::core::filter::{FilterConfig, apply_filters};
    pub use crate::core::output::OutputConfig;

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    #[cfg(feature = "instagram")]
    pub use crate::parsers::InstagramParser;
    #[cfg(feature = "skype")]
    pub use crate::parsers::SkypeParser;
    #[cfg(feature = "telegram")]
    pub use crate::parsers::TelegramParser;
    #[cfg(feature = "whatsapp")]
    pub use crate::parsers::WhatsAppParser;
}
