//! JSON output writer.

use std::fs::File;
use std::io::Write;

use super::{OutputConfig, Record};
use crate::Message;
use crate::error::CorpusError;

/// Writes messages to a JSON file as a pretty-printed array.
///
/// # Format
/// ```json
/// [
///   {"timestamp": "2024-06-15T12:30:00Z", "source": "skype", "conversation": "Bob",
///    "is_group": false, "sender": "Bob", "text": "Hello"}
/// ]
/// ```
pub fn write_json(messages: &[Message], output_path: &str, config: &OutputConfig) -> Result<(), CorpusError> {
    let json = to_json(messages, config)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts messages to a JSON array string.
pub fn to_json(messages: &[Message], config: &OutputConfig) -> Result<String, CorpusError> {
    let records: Vec<Record<'_>> = messages.iter().map(|m| Record::new(m, config)).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}
