//! Skype `messages.json` structures and message-body markup.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CorpusError;
use crate::markup::{MAX_DEPTH, MarkupNode, Tag};

static ARRIVAL_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)-(\d+)-(\d+)T(\d+):(\d+):(\d+)").expect("static pattern")
});
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("static selector"));

/// Shape of `originalarrivaltime`, used in error messages.
pub const ARRIVAL_TIME_SHAPE: &str = "YYYY-MM-DDTHH:MM:SS";

/// Top level of a Skype export file.
#[derive(Debug, Deserialize)]
pub struct SkypeExport {
    pub conversations: Vec<SkypeConversation>,
}

/// One conversation of the export.
#[derive(Debug, Deserialize)]
pub struct SkypeConversation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "threadProperties", default)]
    pub thread_properties: Option<ThreadProperties>,
    /// Messages stay raw so that one malformed entry is skipped alone.
    #[serde(rename = "MessageList", default)]
    pub message_list: Vec<Value>,
}

impl SkypeConversation {
    /// Group conversations are threads with more than one member.
    pub fn is_group(&self) -> bool {
        self.thread_properties
            .as_ref()
            .and_then(|t| t.membercount)
            .is_some_and(|n| n > 1)
    }

    /// Identifier for logs.
    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or("<unnamed>")
    }
}

#[derive(Debug, Deserialize)]
pub struct ThreadProperties {
    #[serde(default)]
    pub membercount: Option<i64>,
}

/// Raw Skype message.
#[derive(Debug, Deserialize)]
pub struct SkypeRawMessage {
    pub originalarrivaltime: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub properties: Option<Value>,
}

impl SkypeRawMessage {
    /// Edits re-sent by the server carry `isserversidegenerated`.
    pub fn is_server_generated(&self) -> bool {
        let flag = self
            .properties
            .as_ref()
            .and_then(|p| p.get("isserversidegenerated"));
        match flag {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Parses an arrival time, ignoring seconds, and shifts it by `offset_hours`.
pub fn parse_arrival_time(input: &str, offset_hours: i64) -> Result<DateTime<Utc>, CorpusError> {
    let malformed = || CorpusError::malformed_timestamp(input, ARRIVAL_TIME_SHAPE);
    let caps = ARRIVAL_TIME.captures(input).ok_or_else(malformed)?;
    let field = |i: usize| caps[i].parse::<u32>().map_err(|_| malformed());

    let year = i32::try_from(field(1)?).map_err(|_| malformed())?;
    let naive = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)
        .and_then(|d| d.and_hms_opt(field(4).ok()?, field(5).ok()?, 0))
        .ok_or_else(malformed)?;
    naive
        .and_utc()
        .checked_add_signed(Duration::hours(offset_hours))
        .ok_or_else(malformed)
}

/// Parses a message body into the nodes under `<body>`.
///
/// Leading text is read as a paragraph holding the whole body, the same
/// shape an HTML parser implies around bare text.
pub fn parse_markup(content: &str) -> Result<Vec<MarkupNode>, CorpusError> {
    let document = Html::parse_document(content);
    let body = document
        .select(&BODY)
        .next()
        .ok_or_else(|| CorpusError::markup("document has no body"))?;

    let mut nodes = child_nodes(body, 0)?;
    let leading_blanks = nodes
        .iter()
        .take_while(|n| matches!(n, MarkupNode::Text(t) if t.trim().is_empty()))
        .count();
    nodes = nodes.split_off(leading_blanks);

    if matches!(nodes.first(), Some(MarkupNode::Text(_))) {
        nodes = vec![MarkupNode::element(Tag::Paragraph, nodes)];
    }
    Ok(nodes)
}

fn child_nodes(parent: ElementRef<'_>, depth: usize) -> Result<Vec<MarkupNode>, CorpusError> {
    if depth > MAX_DEPTH {
        return Err(CorpusError::markup("markup nested too deeply"));
    }
    let mut nodes = Vec::new();
    for child in parent.children() {
        if let Some(element) = ElementRef::wrap(child) {
            let tag = Tag::from_name(element.value().name());
            nodes.push(MarkupNode::element(tag, child_nodes(element, depth + 1)?));
        } else if let Node::Text(text) = child.value() {
            nodes.push(MarkupNode::text(&*text.text));
        }
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_arrival_time_shifted() {
        assert_eq!(
            parse_arrival_time("2019-03-01T22:30:59.123Z", 2).unwrap(),
            Utc.with_ymd_and_hms(2019, 3, 2, 0, 30, 0).unwrap()
        );
        assert_eq!(
            parse_arrival_time("2019-03-01T22:30:59.123Z", 0).unwrap(),
            Utc.with_ymd_and_hms(2019, 3, 1, 22, 30, 0).unwrap()
        );
        assert!(parse_arrival_time("March 1st", 2).unwrap_err().is_malformed_timestamp());
    }

    #[test]
    fn test_server_generated_flag() {
        let msg = |props: Value| SkypeRawMessage {
            originalarrivaltime: String::new(),
            display_name: None,
            content: None,
            properties: Some(props),
        };
        assert!(msg(serde_json::json!({"isserversidegenerated": "True"})).is_server_generated());
        assert!(msg(serde_json::json!({"isserversidegenerated": true})).is_server_generated());
        assert!(!msg(serde_json::json!({"isserversidegenerated": "False"})).is_server_generated());
        assert!(!msg(serde_json::json!({})).is_server_generated());
    }

    #[test]
    fn test_conversation_group_flag() {
        let conv: SkypeConversation = serde_json::from_str(
            r#"{"id":"19:x@thread.skype","displayName":"Trip","threadProperties":{"membercount":5},"MessageList":[]}"#,
        )
        .unwrap();
        assert!(conv.is_group());
        assert_eq!(conv.label(), "19:x@thread.skype");

        let direct: SkypeConversation =
            serde_json::from_str(r#"{"id":"8:bob","displayName":"Bob","threadProperties":null}"#).unwrap();
        assert!(!direct.is_group());
    }

    #[test]
    fn test_parse_markup_plain_text_is_paragraph() {
        let nodes = parse_markup("hello <b>there</b>").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].tag(), Some(&Tag::Paragraph));
        assert_eq!(nodes[0].text_content(), "hello there");
    }

    #[test]
    fn test_parse_markup_custom_tags() {
        let nodes = parse_markup(r#"<at id="8:bob">Bob</at> look <ss type="smile">:)</ss>"#).unwrap();
        assert_eq!(nodes[0].tag(), Some(&Tag::Mention));
        assert_eq!(nodes[1], MarkupNode::text(" look "));
        assert_eq!(nodes[2].tag(), Some(&Tag::Emoticon));
        assert_eq!(nodes[2].text_content(), ":)");
    }

    #[test]
    fn test_parse_markup_unrecognized_root() {
        let nodes = parse_markup(r#"<partlist type="started"><part>x</part></partlist>"#).unwrap();
        assert!(!nodes[0].tag().unwrap().is_recognized());
    }

    #[test]
    fn test_parse_markup_depth_bound() {
        let deep = format!("{}x{}", "<span>".repeat(MAX_DEPTH + 10), "</span>".repeat(MAX_DEPTH + 10));
        assert!(parse_markup(&deep).unwrap_err().is_markup());
    }
}
