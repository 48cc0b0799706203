//! Post-processing of the corpus.
//!
//! - [`filter`] - Message filtering by date, sender and source
//! - [`output`] - Format writers (CSV, JSON, JSONL)
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() {
//! use chatcorpus::core::{FilterConfig, OutputConfig, apply_filters, to_csv, write_jsonl};
//! # }
//! ```

pub mod filter;
pub mod output;

pub use filter::{FilterConfig, apply_filters};
pub use output::OutputConfig;

pub use crate::Message;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
