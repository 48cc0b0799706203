//! CSV output writer.

use std::fs::File;
use std::io::Write;

use super::{OutputConfig, Record};
use crate::Message;
use crate::error::CorpusError;

const HEADER: [&str; 6] = ["timestamp", "source", "conversation", "is_group", "sender", "text"];

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `timestamp;source;conversation;is_group;sender;text`, then
///   `raw_content` if enabled
/// - Group messages leave `conversation` empty
/// - Encoding: UTF-8
pub fn write_csv(messages: &[Message], output_path: &str, config: &OutputConfig) -> Result<(), CorpusError> {
    let file = File::create(output_path)?;
    write_records(messages, file, config)
}

/// Converts messages to a CSV string.
pub fn to_csv(messages: &[Message], config: &OutputConfig) -> Result<String, CorpusError> {
    let mut buffer = Vec::new();
    write_records(messages, &mut buffer, config)?;
    String::from_utf8(buffer).map_err(|e| CorpusError::invalid_format("csv", e.to_string()))
}

fn write_records<W: Write>(messages: &[Message], out: W, config: &OutputConfig) -> Result<(), CorpusError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);

    let mut header = HEADER.to_vec();
    if config.include_raw {
        header.push("raw_content");
    }
    writer.write_record(&header)?;

    for msg in messages {
        writer.write_record(Record::new(msg, config).into_row(config))?;
    }

    writer.flush()?;
    Ok(())
}
