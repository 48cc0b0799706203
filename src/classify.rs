//! Text classification shared by all parsers.
//!
//! A raw fragment is mapped to one of:
//! - `None` - a deleted-message placeholder, the record is dropped
//! - [`MEDIA_OMITTED`] - an attachment placeholder
//! - [`LINK`] - anything that starts like a URL
//! - [`REACTION`] - an Instagram "liked a message" notice
//! - the text itself, HTML-unescaped unless it comes from Skype, whose
//!   markup parser has already decoded entities
//!
//! # Example
//!
//! ```
//! use chatcorpus::classify::{LINK, TextClassifier};
//! use chatcorpus::parser::Platform;
//!
//! let classifier = TextClassifier::default();
//! assert_eq!(classifier.classify("www.rust-lang.org", Platform::Skype, None).as_deref(), Some(LINK));
//! assert_eq!(classifier.classify("Tom &amp; Jerry", Platform::Telegram, None).as_deref(), Some("Tom & Jerry"));
//! ```

use crate::config::{Locale, PhraseBook};
use crate::parser::Platform;

/// Placeholder for attachments (photos, stickers, voice notes...).
pub const MEDIA_OMITTED: &str = "$$media_omitted$$";

/// Placeholder for links.
pub const LINK: &str = "$$link$$";

/// Glyph standing in for Instagram "liked a message" notices.
pub const REACTION: &str = "♥";

/// Glyph used for Skype emoticon codes missing from the emoticon map.
pub const UNKNOWN_EMOTICON: &str = "🏳️";

const LINK_PREFIXES: [&str; 3] = ["http://", "https://", "www."];

/// Returns `true` if `text` is one of the placeholder tokens.
pub fn is_sentinel(text: &str) -> bool {
    text == MEDIA_OMITTED || text == LINK || text == REACTION
}

/// Returns `true` if the lowercase form of `text` starts like a URL.
pub fn is_link(text: &str) -> bool {
    let lower = text.to_lowercase();
    LINK_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Stateless classifier over an immutable [`PhraseBook`].
#[derive(Debug, Clone, Default)]
pub struct TextClassifier {
    phrases: PhraseBook,
}

impl TextClassifier {
    pub fn new(phrases: PhraseBook) -> Self {
        Self { phrases }
    }

    pub fn phrases(&self) -> &PhraseBook {
        &self.phrases
    }

    /// Classifies `text` coming from `source`.
    ///
    /// `locale` only matters for WhatsApp, whose deleted and media
    /// placeholders are language dependent. First matching rule wins.
    pub fn classify(&self, text: &str, source: Platform, locale: Option<&Locale>) -> Option<String> {
        if source == Platform::WhatsApp {
            if let Some(locale) = locale {
                let lower = text.to_lowercase();
                let undotted = lower.replace('.', "");
                if locale.deleted.iter().any(|p| *p == undotted) {
                    return None;
                }
                if lower == locale.media_omitted {
                    return Some(MEDIA_OMITTED.to_string());
                }
            }
        }

        if is_link(text) {
            return Some(LINK.to_string());
        }

        if source == Platform::Instagram && self.phrases.liked_message.iter().any(|p| p == text) {
            return Some(REACTION.to_string());
        }

        if source == Platform::Skype {
            return Some(text.to_string());
        }
        Some(html_escape::decode_html_entities(text).into_owned())
    }
}
