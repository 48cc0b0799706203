//! Unified error types for chatcorpus.
//!
//! This module provides a single [`CorpusError`] enum that covers all error
//! cases in the library. Parsers never abort a whole run because of one bad
//! record: per-line and per-message errors are turned into
//! [`Skipped`](crate::parser::Skipped) entries, and only resource failures
//! (missing input, unreadable emoticon map, broken JSON) surface as `Err`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::Platform;

/// A specialized [`Result`] type for chatcorpus operations.
///
/// # Example
///
/// ```rust
/// use chatcorpus::error::Result;
/// use chatcorpus::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, CorpusError>;

/// The error type for all chatcorpus operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CorpusError {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    #[cfg(any(feature = "instagram", feature = "skype", feature = "json-output"))]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A WhatsApp file name does not carry any known export header.
    #[error("Cannot detect language of WhatsApp export '{file}'")]
    LanguageDetection {
        /// File name that was inspected
        file: String,
    },

    /// A timestamp did not match the format the export uses.
    #[error("Malformed timestamp '{input}'. Expected format: {expected}")]
    MalformedTimestamp {
        /// The offending timestamp text
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A field the record cannot do without is absent.
    #[error("Missing required field '{field}' in {context}")]
    MissingField {
        /// Field, element or attribute name
        field: &'static str,
        /// Where it was looked up
        context: &'static str,
    },

    /// Inline markup has no recognized root or is too deep to flatten.
    #[error("Markup structure error: {0}")]
    MarkupStructure(String),

    /// Latin-1 to UTF-8 repair of Meta exports failed.
    #[error("Cannot repair encoding of '{input}'")]
    EncodingRepair {
        /// The text that could not be repaired
        input: String,
    },

    /// The input doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Invalid date format in filter configuration.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A source's top-level input could not be used at all.
    #[error("{platform} input unavailable: {}", .path.display())]
    SourceUnavailable {
        /// Which source failed
        platform: Platform,
        /// The path that was given
        path: PathBuf,
    },

    /// The exporting user never appears as a sender.
    #[error("'{name}' does not appear among the senders of the corpus")]
    UnknownSender {
        /// The configured name
        name: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl CorpusError {
    /// Creates a language detection error.
    pub fn language_detection(file: impl Into<String>) -> Self {
        CorpusError::LanguageDetection { file: file.into() }
    }

    /// Creates a malformed timestamp error.
    pub fn malformed_timestamp(input: impl Into<String>, expected: &'static str) -> Self {
        CorpusError::MalformedTimestamp {
            input: input.into(),
            expected,
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: &'static str, context: &'static str) -> Self {
        CorpusError::MissingField { field, context }
    }

    /// Creates a markup structure error.
    pub fn markup(message: impl Into<String>) -> Self {
        CorpusError::MarkupStructure(message.into())
    }

    /// Creates an encoding repair error.
    pub fn encoding_repair(input: impl Into<String>) -> Self {
        CorpusError::EncodingRepair {
            input: input.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        CorpusError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        CorpusError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a source unavailable error.
    pub fn source_unavailable(platform: Platform, path: impl Into<PathBuf>) -> Self {
        CorpusError::SourceUnavailable {
            platform,
            path: path.into(),
        }
    }

    /// Creates an unknown sender error.
    pub fn unknown_sender(name: impl Into<String>) -> Self {
        CorpusError::UnknownSender { name: name.into() }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, CorpusError::Io(_))
    }

    /// Returns `true` if this is a markup structure error.
    pub fn is_markup(&self) -> bool {
        matches!(self, CorpusError::MarkupStructure(_))
    }

    /// Returns `true` if this is a malformed timestamp error.
    pub fn is_malformed_timestamp(&self) -> bool {
        matches!(self, CorpusError::MalformedTimestamp { .. })
    }

    /// Returns `true` if this is an invalid date error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, CorpusError::InvalidDate { .. })
    }
}
