//! Command-line interface definition using clap.
//!
//! [`Args`] describes the `chatcorpus` binary. [`Args::ingest_config`] turns
//! the parsed flags into an [`IngestConfig`] so the library can be driven
//! the same way from code:
//!
//! ```rust
//! use chatcorpus::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatcorpus", "--whatsapp", "wa/", "--myself", "Me"]);
//! let config = args.ingest_config();
//! assert_eq!(config.inputs().len(), 1);
//! assert_eq!(config.skype.myself.as_deref(), Some("Me"));
//! ```

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::IngestConfig;

/// Merge WhatsApp, Telegram, Instagram and Skype exports into one
/// chronological message corpus.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatcorpus")]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("sources")
        .required(true)
        .multiple(true)
        .args(["whatsapp", "telegram", "instagram", "skype"])
))]
#[command(after_help = "EXAMPLES:
    chatcorpus --whatsapp exports/wa --telegram exports/tg -o corpus.csv
    chatcorpus --skype messages.json --emoticons emoticons.txt --myself Me
    chatcorpus --instagram inbox/ --myself Me --format jsonl --sort
    chatcorpus --whatsapp wa/ --after 2020-01-01 --from Alice --from Bob")]
pub struct Args {
    /// Directory of WhatsApp `.txt` exports
    #[arg(long, value_name = "DIR")]
    pub whatsapp: Option<PathBuf>,

    /// Directory of Telegram HTML conversation directories
    #[arg(long, value_name = "DIR")]
    pub telegram: Option<PathBuf>,

    /// Directory of Instagram conversation directories (needs `--myself`)
    #[arg(long, value_name = "DIR", requires = "myself")]
    pub instagram: Option<PathBuf>,

    /// Skype `messages.json`, or the directory holding it
    #[arg(long, value_name = "PATH")]
    pub skype: Option<PathBuf>,

    /// Skype emoticon map (`code glyph` per line)
    #[arg(long, value_name = "FILE")]
    pub emoticons: Option<PathBuf>,

    /// Hours added to Skype arrival times
    #[arg(long, value_name = "HOURS", allow_hyphen_values = true)]
    pub utc_offset: Option<i64>,

    /// Your own display name; must appear among the senders
    #[arg(long, value_name = "NAME")]
    pub myself: Option<String>,

    /// JSON object renaming senders and conversations
    #[arg(long, value_name = "FILE")]
    pub aliases: Option<PathBuf>,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Output format (defaults to the output file extension, then csv)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Filter messages after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Filter messages before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Keep only messages from this user (repeatable)
    #[arg(long, value_name = "USER")]
    pub from: Vec<String>,

    /// Sort the corpus chronologically
    #[arg(long)]
    pub sort: bool,

    /// Include the unclassified raw content in the output
    #[arg(long)]
    pub raw: bool,
}

/// Output path used when `-o` is not given.
pub const DEFAULT_OUTPUT: &str = "corpus.csv";

impl Args {
    /// Builds the ingestion configuration described by the flags.
    pub fn ingest_config(&self) -> IngestConfig {
        let mut config = IngestConfig::new();
        if let Some(dir) = &self.whatsapp {
            config = config.with_whatsapp(dir);
        }
        if let Some(dir) = &self.telegram {
            config = config.with_telegram(dir);
        }
        if let Some(dir) = &self.instagram {
            config = config.with_instagram(dir);
        }
        if let Some(path) = &self.skype {
            config = config.with_skype(path);
        }
        if let Some(name) = &self.myself {
            config = config.with_myself(name);
        }

        let mut skype = config.skype.clone();
        if let Some(path) = &self.emoticons {
            skype = skype.with_emoticons(path);
        }
        if let Some(hours) = self.utc_offset {
            skype = skype.with_utc_offset_hours(hours);
        }
        config.with_skype_config(skype)
    }

    /// Format from `--format`, else from the output extension, else CSV.
    pub fn output_format(&self) -> crate::format::OutputFormat {
        match self.format {
            Some(format) => format.into(),
            None => crate::format::OutputFormat::from_path(&self.output).unwrap_or_default(),
        }
    }

    /// Output path, with the extension following `--format` when the
    /// default path is in use.
    pub fn output_path(&self) -> String {
        if self.output != DEFAULT_OUTPUT {
            return self.output.clone();
        }
        format!("corpus.{}", self.output_format().extension())
    }
}

/// Output format options.
///
/// - [`Csv`](OutputFormat::Csv) - semicolon separated rows
/// - [`Json`](OutputFormat::Json) - pretty-printed array
/// - [`Jsonl`](OutputFormat::Jsonl) - one JSON object per line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV with semicolon delimiter
    #[default]
    Csv,

    /// JSON array of messages
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::format::OutputFormat::from(*self).fmt(f)
    }
}

impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
