//! JSON Lines (JSONL) output writer.
//!
//! One message per line, suited to line-oriented processing of large
//! corpora.

use std::fs::File;
use std::io::{BufWriter, Write};

use super::{OutputConfig, Record};
use crate::Message;
use crate::error::CorpusError;

/// Writes messages to JSONL (JSON Lines) format.
pub fn write_jsonl(messages: &[Message], output_path: &str, config: &OutputConfig) -> Result<(), CorpusError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(messages, &mut writer, config)?;
    writer.flush()?;
    Ok(())
}

/// Converts messages to a JSONL string.
pub fn to_jsonl(messages: &[Message], config: &OutputConfig) -> Result<String, CorpusError> {
    let mut buffer = Vec::new();
    write_lines(messages, &mut buffer, config)?;
    String::from_utf8(buffer).map_err(|e| CorpusError::invalid_format("jsonl", e.to_string()))
}

fn write_lines<W: Write>(messages: &[Message], out: &mut W, config: &OutputConfig) -> Result<(), CorpusError> {
    for msg in messages {
        serde_json::to_writer(&mut *out, &Record::new(msg, config))?;
        out.write_all(b"\n")?;
    }
    Ok(())
}
