//! Output format writers.
//!
//! This module provides writers for the corpus:
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of messages - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one message per line - requires `json-output` feature
//!
//! Every writer emits the same record: `timestamp`, `source`,
//! `conversation`, `is_group`, `sender`, `text`, plus `raw_content` when
//! [`OutputConfig::with_raw_content`] is set.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatcorpus::Result<()> {
//! use chatcorpus::core::output::{OutputConfig, to_csv, write_jsonl};
//! use chatcorpus::Message;
//! use chatcorpus::parser::Platform;
//! use chrono::Utc;
//!
//! let messages = vec![Message::new(Platform::WhatsApp, Utc::now(), "Alice", "Hello!")];
//!
//! write_jsonl(&messages, "corpus.jsonl", &OutputConfig::new())?;
//! let csv_string = to_csv(&messages, &OutputConfig::new().with_raw_content())?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

use serde::Serialize;

use crate::Message;

/// Timestamp layout shared by all writers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Controls optional columns of the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Include the unclassified `raw_content`.
    pub include_raw: bool,
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_raw_content(mut self) -> Self {
        self.include_raw = true;
        self
    }
}

/// One output row, borrowed from a [`Message`].
#[derive(Debug, Serialize)]
#[cfg_attr(not(any(feature = "csv-output", feature = "json-output")), allow(dead_code))]
pub(crate) struct Record<'a> {
    timestamp: String,
    source: &'static str,
    conversation: Option<&'a str>,
    is_group: bool,
    sender: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_content: Option<&'a str>,
}

impl<'a> Record<'a> {
    #[cfg_attr(not(any(feature = "csv-output", feature = "json-output")), allow(dead_code))]
    pub(crate) fn new(msg: &'a Message, config: &OutputConfig) -> Self {
        Self {
            timestamp: msg.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            source: msg.source.tag(),
            conversation: msg.conversation(),
            is_group: msg.is_group(),
            sender: msg.sender(),
            text: msg.text(),
            raw_content: if config.include_raw {
                msg.raw_content.as_deref()
            } else {
                None
            },
        }
    }

    #[cfg(feature = "csv-output")]
    pub(crate) fn into_row(self, config: &OutputConfig) -> Vec<String> {
        let mut row = vec![
            self.timestamp,
            self.source.to_string(),
            self.conversation.unwrap_or_default().to_string(),
            self.is_group.to_string(),
            self.sender.to_string(),
            self.text.to_string(),
        ];
        if config.include_raw {
            row.push(self.raw_content.unwrap_or_default().to_string());
        }
        row
    }
}
