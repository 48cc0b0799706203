//! Telegram HTML export structure.
//!
//! A conversation export is a directory of pages (`messages.html`,
//! `messages2.html`, ...). Each page holds a `div.history` whose direct
//! `clearfix` children are messages:
//!
//! ```html
//! <div class="message default clearfix" id="message42">
//!   <div class="body">
//!     <div class="pull_right date details" title="15.01.2024 10:30:45">10:30</div>
//!     <div class="from_name">Alice</div>
//!     <div class="text">Hello</div>
//!   </div>
//! </div>
//! ```
//!
//! Consecutive messages from the same sender omit `from_name`.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::CorpusError;

static DATE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+).(\d+).(\d+)\s(\d+):(\d+):(\d+)").expect("static pattern")
});
static PAGE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^messages(\d*)\.html$").expect("static pattern"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static HISTORY: LazyLock<Selector> = LazyLock::new(|| selector("div.history"));
static SERVICE: LazyLock<Selector> = LazyLock::new(|| selector("div.message.service"));
static DIV: LazyLock<Selector> = LazyLock::new(|| selector("div"));
static PEER: LazyLock<Selector> = LazyLock::new(|| selector("div.page_header div.text.bold"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("div.body"));
static DATE: LazyLock<Selector> = LazyLock::new(|| selector("div.date"));
static FROM_NAME: LazyLock<Selector> = LazyLock::new(|| selector("div.from_name"));
static TEXT: LazyLock<Selector> = LazyLock::new(|| selector("div.text"));
static MEDIA_WRAP: LazyLock<Selector> = LazyLock::new(|| selector("div.media_wrap"));
static MEDIA_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("div.body div.title"));

/// Shape of a `div.date` title, used in error messages.
pub const DATE_TITLE_SHAPE: &str = "DD.MM.YYYY HH:MM:SS";

/// Conversation identity read from the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub is_group: bool,
    /// Peer name for direct conversations.
    pub peer: Option<String>,
}

/// Content of one message block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    /// Trimmed text of `div.text`.
    Text(String),
    /// Media title or kind.
    Media(String),
}

/// One `clearfix` message block, before sender carry-forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub timestamp: DateTime<Utc>,
    /// Trimmed `div.from_name`, absent on joined messages.
    pub from_name: Option<String>,
    pub content: RawContent,
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn history(document: &Html) -> Result<ElementRef<'_>, CorpusError> {
    document
        .select(&HISTORY)
        .next()
        .ok_or_else(|| CorpusError::missing_field("div.history", "Telegram page"))
}

/// Reads the group flag and peer name from a first page.
///
/// The second service block announces group creation; a page with fewer
/// than two service blocks is a direct conversation.
pub fn parse_page_header(document: &Html) -> Result<PageHeader, CorpusError> {
    let history = history(document)?;
    let is_group = history
        .select(&SERVICE)
        .nth(1)
        .and_then(|service| service.select(&DIV).next())
        .is_some_and(|div| div.text().collect::<String>().contains("group"));

    if is_group {
        return Ok(PageHeader { is_group, peer: None });
    }

    let peer = document
        .select(&PEER)
        .next()
        .map(trimmed_text)
        .ok_or_else(|| CorpusError::missing_field("div.page_header div.text.bold", "Telegram page"))?;
    Ok(PageHeader {
        is_group,
        peer: Some(peer),
    })
}

/// Direct `clearfix` children of the page history.
pub fn message_blocks(document: &Html) -> Result<Vec<ElementRef<'_>>, CorpusError> {
    let history = history(document)?;
    Ok(history
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "div" && el.value().classes().any(|c| c == "clearfix"))
        .collect())
}

/// Parses a `div.date` title as day, month, year, hour, minute.
pub fn parse_date_title(title: &str) -> Result<DateTime<Utc>, CorpusError> {
    let malformed = || CorpusError::malformed_timestamp(title, DATE_TITLE_SHAPE);
    let caps = DATE_TITLE.captures(title).ok_or_else(malformed)?;
    let field = |i: usize| caps[i].parse::<u32>().map_err(|_| malformed());

    let year = i32::try_from(field(3)?).map_err(|_| malformed())?;
    NaiveDate::from_ymd_opt(year, field(2)?, field(1)?)
        .and_then(|d| d.and_hms_opt(field(4).ok()?, field(5).ok()?, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(malformed)
}

/// Explicit sender of a message block, if it names one.
///
/// Readable even when the rest of the block is not.
pub fn sender_of(block: ElementRef<'_>) -> Option<String> {
    block
        .select(&BODY)
        .next()?
        .select(&FROM_NAME)
        .next()
        .map(trimmed_text)
}

/// Extracts date, sender and content from one message block.
pub fn parse_message(block: ElementRef<'_>) -> Result<RawMessage, CorpusError> {
    let body = block
        .select(&BODY)
        .next()
        .ok_or_else(|| CorpusError::missing_field("div.body", "Telegram message"))?;
    let title = body
        .select(&DATE)
        .next()
        .and_then(|date| date.value().attr("title"))
        .ok_or_else(|| CorpusError::missing_field("div.date[title]", "Telegram message"))?;
    let timestamp = parse_date_title(title)?;
    let from_name = sender_of(block);

    let content = match body.select(&TEXT).next() {
        Some(text) => RawContent::Text(trimmed_text(text)),
        None => RawContent::Media(media_descriptor(body)?),
    };

    Ok(RawMessage {
        timestamp,
        from_name,
        content,
    })
}

fn media_descriptor(body: ElementRef<'_>) -> Result<String, CorpusError> {
    let media = body
        .select(&MEDIA_WRAP)
        .next()
        .ok_or_else(|| CorpusError::missing_field("div.text or div.media_wrap", "Telegram message"))?;

    if let Some(title) = media.select(&MEDIA_TITLE).next() {
        return Ok(trimmed_text(title));
    }

    media
        .children()
        .filter_map(ElementRef::wrap)
        .next()
        .and_then(|el| el.value().classes().last().map(str::to_string))
        .ok_or_else(|| CorpusError::missing_field("media class", "Telegram message"))
}

/// Page number of an export page: `messages.html` is 1, `messagesN.html` is N.
pub fn page_number(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    let digits = PAGE_NUMBER.captures(name)?.get(1)?.as_str();
    if digits.is_empty() { Some(1) } else { digits.parse().ok() }
}

/// Orders pages numerically, unrecognized names last and by name.
pub fn compare_pages(a: &Path, b: &Path) -> Ordering {
    match (page_number(a), page_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
