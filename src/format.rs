//! Output format selection.
//!
//! Maps format names and file extensions to the writers in
//! [`core::output`](crate::core::output).
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> chatcorpus::Result<()> {
//! use chatcorpus::format::{OutputFormat, to_format_string};
//! use chatcorpus::core::OutputConfig;
//! use chatcorpus::Message;
//! use chatcorpus::parser::Platform;
//! use chrono::Utc;
//!
//! let messages = vec![Message::new(Platform::Telegram, Utc::now(), "Alice", "Hello!")];
//!
//! let format = OutputFormat::from_path("corpus.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! let jsonl = to_format_string(&messages, format, &OutputConfig::new())?;
//! assert_eq!(jsonl.lines().count(), 1);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::core::output::OutputConfig;
use crate::error::CorpusError;

/// Serialization format of the corpus.
///
/// `ndjson` is accepted as a name and extension for [`Jsonl`](OutputFormat::Jsonl).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// `;` separated rows under a header line
    #[default]
    Csv,

    /// Pretty-printed array of records
    Json,

    /// One compact record per line
    Jsonl,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Feature that compiles in the writer for this format.
    pub fn required_feature(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv-output",
            OutputFormat::Json | OutputFormat::Jsonl => "json-output",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            "jsonl" | "ndjson" => Some(OutputFormat::Jsonl),
            _ => None,
        }
    }

    /// Format implied by the extension of `path`.
    ///
    /// ```rust
    /// use chatcorpus::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out/Corpus.NDJSON").unwrap(), OutputFormat::Jsonl);
    /// assert!(OutputFormat::from_path("corpus").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`CorpusError::InvalidFormat`] for a missing or unknown extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
            .ok_or_else(|| {
                CorpusError::invalid_format(
                    "output",
                    format!("cannot infer a format from '{}'; expected .csv, .json or .jsonl", path.display()),
                )
            })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            CorpusError::invalid_format("output", format!("unknown format '{s}'; expected csv, json, jsonl or ndjson"))
        })
    }
}

fn compiled_out(format: OutputFormat) -> CorpusError {
    CorpusError::invalid_format(
        "output",
        format!("{format} output requires the '{}' feature", format.required_feature()),
    )
}

/// Writes messages to `path` in the given format.
///
/// # Errors
///
/// Fails if the writer for `format` was compiled out or the file cannot be
/// written.
#[allow(unused_variables)]
pub fn write_to_format(
    messages: &[Message],
    path: &str,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<(), CorpusError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(messages, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(messages, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(messages, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(compiled_out(format)),
    }
}

/// Renders messages as a string in the given format.
#[allow(unused_variables)]
pub fn to_format_string(
    messages: &[Message],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String, CorpusError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(messages, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(messages, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(messages, config),
        #[allow(unreachable_patterns)]
        _ => Err(compiled_out(format)),
    }
}
