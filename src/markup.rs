//! Flattening of the small inline-markup vocabulary used in Skype messages.
//!
//! Message bodies are a sequence of [`MarkupNode`]s. The first node is the
//! root; its tag decides how the whole body reads as plain text:
//!
//! | Tag | Element | Flattens to |
//! |-----|---------|-------------|
//! | [`Tag::Paragraph`] | `p` | its text |
//! | [`Tag::Quote`], [`Tag::Mention`] | `quote`, `at` | every following sibling, flattened |
//! | [`Tag::MediaObject`], [`Tag::MediaAlbum`] | `uriobject`, `mediaalbum` | [`MEDIA_OMITTED`] |
//! | [`Tag::Link`] | `a` | [`LINK`] |
//! | [`Tag::Emoticon`] | `ss` | glyph from the [`EmoticonTable`] |
//! | [`Tag::Bold`] | `b` | its flattened content |
//! | anything else | | empty string |
//!
//! # Example
//!
//! ```
//! use chatcorpus::markup::{EmoticonTable, MarkupNode, Tag, flatten};
//!
//! let body = vec![
//!     MarkupNode::element(Tag::Quote, vec![MarkupNode::text("quoted")]),
//!     MarkupNode::text("a"),
//!     MarkupNode::text("b"),
//! ];
//! assert_eq!(flatten(&body, &EmoticonTable::default()).unwrap(), "ab");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::classify::{LINK, MEDIA_OMITTED, UNKNOWN_EMOTICON};
use crate::error::CorpusError;

/// Maximum nesting depth accepted when building or flattening a tree.
pub const MAX_DEPTH: usize = 64;

/// Maximum number of node visits for one flattening.
///
/// Quote and mention nodes re-read their following siblings, so a long run of
/// them grows the work exponentially.
pub const MAX_VISITS: usize = 4096;

/// Recognized markup tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Paragraph,
    Quote,
    Mention,
    MediaObject,
    MediaAlbum,
    Link,
    Emoticon,
    Bold,
    /// Any element outside the vocabulary, by lowercase name.
    Other(String),
}

impl Tag {
    /// Maps an element name to its tag.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "p" => Tag::Paragraph,
            "quote" => Tag::Quote,
            "at" => Tag::Mention,
            "uriobject" => Tag::MediaObject,
            "mediaalbum" => Tag::MediaAlbum,
            "a" => Tag::Link,
            "ss" => Tag::Emoticon,
            "b" => Tag::Bold,
            other => Tag::Other(other.to_string()),
        }
    }

    /// Returns `true` for every tag except [`Tag::Other`].
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Tag::Other(_))
    }
}

/// A node of a parsed markup fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Element { tag: Tag, children: Vec<MarkupNode> },
}

impl MarkupNode {
    pub fn text(value: impl Into<String>) -> Self {
        MarkupNode::Text(value.into())
    }

    pub fn element(tag: Tag, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Element { tag, children }
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            MarkupNode::Text(t) => out.push_str(t),
            MarkupNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Tag of an element node.
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            MarkupNode::Element { tag, .. } => Some(tag),
            MarkupNode::Text(_) => None,
        }
    }
}

/// Emoticon code to glyph table, loaded once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmoticonTable {
    glyphs: HashMap<String, String>,
}

impl EmoticonTable {
    /// Parses `code glyph` lines. Later codes overwrite earlier ones.
    pub fn parse(content: &str) -> Self {
        let mut glyphs = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(char::is_whitespace);
            let code = fields.next().unwrap_or_default();
            let glyph = fields.next_back().unwrap_or(code);
            glyphs.insert(code.to_string(), glyph.to_string());
        }
        Self { glyphs }
    }

    /// Reads and parses an emoticon map file.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.glyphs.get(code).map(String::as_str)
    }

    /// Glyph for `code`, or [`UNKNOWN_EMOTICON`].
    pub fn glyph(&self, code: &str) -> &str {
        self.get(code).unwrap_or(UNKNOWN_EMOTICON)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Flattens a message body whose first node must be a recognized element.
///
/// # Errors
///
/// [`CorpusError::MarkupStructure`] if the body is empty, starts with text or
/// an unrecognized element, or exceeds [`MAX_DEPTH`] / [`MAX_VISITS`].
pub fn flatten(nodes: &[MarkupNode], emoticons: &EmoticonTable) -> Result<String, CorpusError> {
    match nodes.first() {
        None => Err(CorpusError::markup("empty body")),
        Some(MarkupNode::Text(_)) => Err(CorpusError::markup("body starts with text")),
        Some(MarkupNode::Element { tag, .. }) if !tag.is_recognized() => {
            Err(CorpusError::markup(format!("unrecognized root {:?}", tag)))
        }
        Some(_) => flatten_at(nodes, 0, emoticons),
    }
}

/// Flattens the node at `index` of `siblings`.
pub fn flatten_at(
    siblings: &[MarkupNode],
    index: usize,
    emoticons: &EmoticonTable,
) -> Result<String, CorpusError> {
    let mut flattener = Flattener {
        emoticons,
        visits: 0,
    };
    flattener.node(siblings, index, 0)
}

struct Flattener<'a> {
    emoticons: &'a EmoticonTable,
    visits: usize,
}

impl Flattener<'_> {
    fn node(&mut self, siblings: &[MarkupNode], index: usize, depth: usize) -> Result<String, CorpusError> {
        self.visits += 1;
        if self.visits > MAX_VISITS {
            return Err(CorpusError::markup("too many nodes to flatten"));
        }
        if depth > MAX_DEPTH {
            return Err(CorpusError::markup("markup nested too deeply"));
        }

        let Some(node) = siblings.get(index) else {
            return Ok(String::new());
        };
        let (tag, children) = match node {
            MarkupNode::Text(t) => return Ok(t.clone()),
            MarkupNode::Element { tag, children } => (tag, children),
        };

        match tag {
            Tag::Paragraph => Ok(node.text_content()),
            Tag::Quote | Tag::Mention => self.sequence(siblings, index + 1, depth),
            Tag::MediaObject | Tag::MediaAlbum => Ok(MEDIA_OMITTED.to_string()),
            Tag::Link => Ok(LINK.to_string()),
            Tag::Emoticon => Ok(self.emoticons.glyph(&node.text_content()).to_string()),
            Tag::Bold => self.sequence(children, 0, depth),
            Tag::Other(_) => Ok(String::new()),
        }
    }

    /// Flattens `nodes[start..]` in order.
    fn sequence(&mut self, nodes: &[MarkupNode], start: usize, depth: usize) -> Result<String, CorpusError> {
        let mut out = String::new();
        for i in start..nodes.len() {
            match &nodes[i] {
                MarkupNode::Text(t) => out.push_str(t),
                MarkupNode::Element { .. } => out.push_str(&self.node(nodes, i, depth + 1)?),
            }
        }
        Ok(out)
    }
}
