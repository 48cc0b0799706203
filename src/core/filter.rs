//! Filter messages by date range, sender and source.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for filtering message collections.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Messages on or after date |
//! | Date to | [`with_date_to`](FilterConfig::with_date_to) | Messages on or before date |
//! | Sender | [`with_sender`](FilterConfig::with_sender) | Messages from any selected user |
//! | Source | [`with_source`](FilterConfig::with_source) | Messages from one platform |
//!
//! # Examples
//!
//! ```
//! use chatcorpus::core::filter::{FilterConfig, apply_filters};
//! use chatcorpus::Message;
//! use chatcorpus::parser::Platform;
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> chatcorpus::Result<()> {
//! let at = |m| Utc.with_ymd_and_hms(2024, m, 15, 12, 0, 0).unwrap();
//! let messages = vec![
//!     Message::new(Platform::Skype, at(1), "Alice", "Old"),
//!     Message::new(Platform::Skype, at(6), "Alice", "New"),
//!     Message::new(Platform::Skype, at(6), "Bob", "Other"),
//! ];
//!
//! let config = FilterConfig::new()
//!     .with_sender("alice")
//!     .with_date_from("2024-06-01")?
//!     .with_date_to("2024-12-31")?;
//!
//! let filtered = apply_filters(messages, &config);
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].text, "New");
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Date bounds are whole days in UTC, both inclusive
//! - Sender matching is case-insensitive for ASCII characters
//! - Several senders select the union of their messages
//! - Multiple filters are combined with AND logic

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::Message;
use crate::error::CorpusError;
use crate::parser::Platform;

/// Configuration for filtering messages.
///
/// Filters are combined with AND logic: a message must match all active
/// filters to be included in the result.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Include only messages on or after this timestamp.
    pub after: Option<DateTime<Utc>>,

    /// Include only messages on or before this timestamp.
    pub before: Option<DateTime<Utc>>,

    /// Include only messages from one of these senders (case-insensitive).
    /// Empty means any sender.
    pub from: Vec<String>,

    /// Include only messages from this platform.
    pub source: Option<Platform>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all messages pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive), `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self, CorpusError> {
        self.after = Some(parse_date(date_str)?.and_time(NaiveTime::MIN).and_utc());
        Ok(self)
    }

    /// Sets the end date filter (inclusive), `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self, CorpusError> {
        let end_of_day = parse_date(date_str)?
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| CorpusError::invalid_date(date_str))?;
        self.before = Some(end_of_day.and_utc());
        Ok(self)
    }

    /// Adds a sender to the selection.
    ///
    /// Matching is case-insensitive for ASCII characters.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.from.push(sender.into());
        self
    }

    /// Adds several senders to the selection.
    #[must_use]
    pub fn with_senders<I, S>(mut self, senders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from.extend(senders.into_iter().map(Into::into));
        self
    }

    /// Keeps only messages from `source`.
    #[must_use]
    pub fn with_source(mut self, source: Platform) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the start timestamp directly.
    #[must_use]
    pub fn with_after(mut self, dt: DateTime<Utc>) -> Self {
        self.after = Some(dt);
        self
    }

    /// Sets the end timestamp directly.
    #[must_use]
    pub fn with_before(mut self, dt: DateTime<Utc>) -> Self {
        self.before = Some(dt);
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.after.is_some() || self.before.is_some() || !self.from.is_empty() || self.source.is_some()
    }

    /// Returns `true` if `msg` passes every active filter.
    pub fn matches(&self, msg: &Message) -> bool {
        if !self.from.is_empty() && !self.from.iter().any(|from| msg.sender.eq_ignore_ascii_case(from)) {
            return false;
        }
        if self.source.is_some_and(|s| s != msg.source) {
            return false;
        }
        if self.after.is_some_and(|after| msg.timestamp < after) {
            return false;
        }
        if self.before.is_some_and(|before| msg.timestamp > before) {
            return false;
        }
        true
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate, CorpusError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| CorpusError::invalid_date(date_str))
}

/// Filters a collection of messages based on the provided configuration.
///
/// If no filters are active, returns the original messages unchanged.
pub fn apply_filters(messages: Vec<Message>, config: &FilterConfig) -> Vec<Message> {
    if !config.is_active() {
        return messages;
    }
    messages.into_iter().filter(|msg| config.matches(msg)).collect()
}
