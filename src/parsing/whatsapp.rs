//! WhatsApp line grammar and file-name conventions.
//!
//! An export line is one of three things:
//!
//! ```text
//! 1/2/20, 10:15 - Alice: Hello           new message
//! 1/2/20, 10:16 - Alice created group "x"   system notice
//! and a second line                      continuation of the previous message
//! ```

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use crate::config::{Locale, PhraseBook};
use crate::error::CorpusError;

static LINE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)/(\d+)/(\d+),\s(\d+):(\d+)\s-\s(.*)").expect("static pattern")
});

/// Shape of a timestamp prefix, used in error messages.
pub const TIMESTAMP_SHAPE: &str = "D/M/YY, HH:MM - ";

/// One classified export line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Timestamped `Sender: content` line.
    Message {
        timestamp: DateTime<Utc>,
        sender: &'a str,
        content: &'a str,
    },
    /// Timestamped line without a `": "` separator.
    System,
    /// Anything without a timestamp prefix.
    Continuation(&'a str),
}

/// Splits one export line according to `locale`'s date convention.
///
/// Only the hour of the timestamp is kept. Two-digit years are read as
/// `20yy`.
pub fn parse_line<'a>(line: &'a str, locale: &Locale) -> Result<Line<'a>, CorpusError> {
    let Some(caps) = LINE_START.captures(line) else {
        return Ok(Line::Continuation(line));
    };

    let number = |i: usize| -> Result<u32, CorpusError> {
        caps[i]
            .parse::<u32>()
            .map_err(|_| CorpusError::malformed_timestamp(line, TIMESTAMP_SHAPE))
    };

    let (first, second, hour) = (number(1)?, number(2)?, number(4)?);
    let year_digits = &caps[3];
    let year = number(3)?;
    let year = if year_digits.len() <= 2 { 2000 + year } else { year };
    let (month, day) = if locale.month_first {
        (first, second)
    } else {
        (second, first)
    };

    let timestamp = i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CorpusError::malformed_timestamp(line, TIMESTAMP_SHAPE))?;

    let rest = caps.get(6).map_or("", |m| m.as_str());
    Ok(match rest.split_once(": ") {
        Some((sender, content)) => Line::Message {
            timestamp,
            sender,
            content: content.trim(),
        },
        None => Line::System,
    })
}

/// Text of a file name before its first `.`.
pub fn file_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Finds the export language from a file name.
pub fn detect_locale<'a>(file_name: &str, phrases: &'a PhraseBook) -> Result<&'a Locale, CorpusError> {
    phrases
        .detect(file_stem(file_name))
        .ok_or_else(|| CorpusError::language_detection(file_name))
}

/// Whether the opening lines announce a group creation.
pub fn is_group(lines: &[&str], locale: &Locale) -> bool {
    lines
        .iter()
        .take(2)
        .any(|line| line.contains(locale.created_group.as_str()))
}

/// Peer name of a direct conversation, read from the file name.
///
/// `"WhatsApp Chat with Bob.txt"` gives `"Bob"`.
pub fn peer_from_file_name(file_name: &str, locale: &Locale) -> String {
    let tail = file_name
        .rsplit(locale.trigger_word.as_str())
        .next()
        .unwrap_or(file_name)
        .trim();
    file_stem(tail).to_string()
}
