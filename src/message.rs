//! Unified message record produced by every source parser.
//!
//! # Examples
//!
//! ```
//! use chatcorpus::Message;
//! use chatcorpus::parser::Platform;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2020, 1, 2, 10, 0, 0).unwrap();
//! let msg = Message::new(Platform::WhatsApp, ts, "Alice", "Hello")
//!     .with_conversation("Alice");
//!
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.conversation(), Some("Alice"));
//! assert!(!msg.is_group());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::Platform;

/// A normalized chat message from any supported platform.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `DateTime<Utc>` | When the message was sent |
/// | `sender` | `String` | Display name of the author |
/// | `conversation` | `Option<String>` | Peer of a direct conversation, `None` for groups |
/// | `is_group` | `bool` | Whether the conversation has more than one peer |
/// | `raw_content` | `Option<String>` | Unfiltered text or media descriptor |
/// | `text` | `String` | Classified text (literal text or a sentinel) |
/// | `source` | `Platform` | Parser that produced the record |
///
/// `conversation` is `None` exactly when `is_group` is `true`; the builder
/// methods keep that pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,

    /// Display name of the message author.
    pub sender: String,

    /// Peer of a direct conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub conversation: Option<String>,

    /// Whether the message belongs to a group conversation.
    #[serde(default)]
    pub is_group: bool,

    /// The original text or media descriptor as found in the export.
    ///
    /// Structured payloads (Instagram shares) are kept as compact JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub raw_content: Option<String>,

    /// Classified text: literal text, or one of the sentinels in
    /// [`classify`](crate::classify).
    pub text: String,

    /// Which parser produced the record.
    pub source: Platform,
}

impl Message {
    /// Creates a group-less message whose raw content equals its text.
    ///
    /// Use [`with_conversation`](Self::with_conversation) or
    /// [`in_group`](Self::in_group) to attach the conversation identity.
    pub fn new(
        source: Platform,
        timestamp: DateTime<Utc>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        Self {
            timestamp,
            sender: sender.into(),
            conversation: None,
            is_group: false,
            raw_content: Some(text.clone()),
            text,
            source,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Marks the message as part of a direct conversation with `peer`.
    #[must_use]
    pub fn with_conversation(mut self, peer: impl Into<String>) -> Self {
        self.conversation = Some(peer.into());
        self.is_group = false;
        self
    }

    /// Marks the message as part of a group conversation.
    #[must_use]
    pub fn in_group(mut self) -> Self {
        self.conversation = None;
        self.is_group = true;
        self
    }

    /// Applies a resolved conversation identity (`None` means group).
    #[must_use]
    pub fn with_identity(self, peer: Option<&str>) -> Self {
        match peer {
            Some(peer) => self.with_conversation(peer),
            None => self.in_group(),
        }
    }

    /// Sets the raw content.
    #[must_use]
    pub fn with_raw_content(mut self, raw: Option<String>) -> Self {
        self.raw_content = raw;
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the classified text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the direct-conversation peer, if any.
    pub fn conversation(&self) -> Option<&str> {
        self.conversation.as_deref()
    }

    /// Returns `true` for group conversations.
    pub fn is_group(&self) -> bool {
        self.is_group
    }

    /// Returns `true` if `text` is one of the sentinel tokens.
    pub fn is_placeholder(&self) -> bool {
        crate::classify::is_sentinel(&self.text)
    }

    /// Appends a continuation line to both raw content and text.
    pub(crate) fn append_line(&mut self, raw: &str, text: &str) {
        match self.raw_content.as_mut() {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(raw);
            }
            None => self.raw_content = Some(raw.to_string()),
        }
        self.text.push('\n');
        self.text.push_str(text);
    }
}
