//! Instagram JSON export structures and the Latin-1 text repair.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CorpusError;

/// One `message_N.json` file of a conversation directory.
///
/// Messages stay as raw JSON values so that a single malformed message can be
/// skipped without losing the rest of the file.
#[derive(Debug, Deserialize)]
pub struct InstagramConversation {
    #[serde(default)]
    pub participants: Vec<InstagramParticipant>,
    #[serde(default)]
    pub messages: Vec<Value>,
}

/// Conversation participant.
#[derive(Debug, Deserialize)]
pub struct InstagramParticipant {
    pub name: String,
}

/// Raw Instagram message structure for deserialization.
#[derive(Debug, Deserialize)]
pub struct InstagramRawMessage {
    pub sender_name: String,
    pub timestamp_ms: i64,
    pub content: Option<String>,
    /// Shared post or link; kept verbatim.
    pub share: Option<Value>,
}

/// Fix Meta's broken encoding (Mojibake).
///
/// Meta exports UTF-8 text encoded as if it were ISO-8859-1: each UTF-8 byte
/// is stored as a separate code point. Example: `"Привет"` becomes
/// `"ÐŸÑ€Ð¸Ð²ÐµÑ‚"`. Taking every char as one byte and decoding the bytes as
/// UTF-8 reverses that.
///
/// # Errors
///
/// [`CorpusError::EncodingRepair`] if a char lies above U+00FF or the bytes
/// are not valid UTF-8.
///
/// # Example
///
/// ```
/// use chatcorpus::parsing::instagram::repair_encoding;
///
/// assert_eq!(repair_encoding("Hello").unwrap(), "Hello");
/// assert_eq!(repair_encoding("caffÃ¨").unwrap(), "caffè");
/// assert!(repair_encoding("già").is_err());
/// ```
pub fn repair_encoding(s: &str) -> Result<String, CorpusError> {
    if s.is_ascii() {
        return Ok(s.to_string());
    }
    let bytes = s
        .chars()
        .map(|c| u8::try_from(u32::from(c)))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| CorpusError::encoding_repair(s))?;
    String::from_utf8(bytes).map_err(|_| CorpusError::encoding_repair(s))
}

/// Parses a millisecond timestamp to DateTime.
pub fn parse_ms_timestamp(timestamp_ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(timestamp_ms).single()
}
