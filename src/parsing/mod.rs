//! Shared parsing utilities for all platforms.
//!
//! Format grammars live here; the [`parsers`](crate::parsers) module walks
//! the on-disk layouts and turns these pieces into reports.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CorpusError;
use crate::parser::Platform;

#[cfg(feature = "telegram")]
pub mod telegram;

#[cfg(feature = "instagram")]
pub mod instagram;

#[cfg(feature = "whatsapp")]
pub mod whatsapp;

#[cfg(feature = "skype")]
pub mod skype;

// Re-export commonly used items
#[cfg(feature = "telegram")]
pub use telegram::{PageHeader, parse_date_title, parse_page_header};

#[cfg(feature = "instagram")]
pub use instagram::{InstagramConversation, InstagramRawMessage, repair_encoding};

#[cfg(feature = "whatsapp")]
pub use whatsapp::{Line as WhatsAppLine, parse_line as parse_whatsapp_line};

#[cfg(feature = "skype")]
pub use skype::{SkypeExport, parse_arrival_time, parse_markup};

/// Entries of `dir` accepted by `keep`, sorted by path.
///
/// # Errors
///
/// [`CorpusError::SourceUnavailable`] if `dir` is not a readable directory.
pub fn sorted_entries(
    platform: Platform,
    dir: &Path,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, CorpusError> {
    if !dir.is_dir() {
        return Err(CorpusError::source_unavailable(platform, dir));
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if keep(&path) {
            entries.push(path);
        }
    }
    entries.sort();
    Ok(entries)
}

/// Returns `true` if `path` is a file with the given extension.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// File name of `path` as UTF-8, lossy.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sorted_entries_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("c.json"), "").unwrap();
        fs::create_dir(dir.path().join("d.txt")).unwrap();

        let entries = sorted_entries(Platform::WhatsApp, dir.path(), |p| has_extension(p, "txt")).unwrap();
        let names: Vec<_> = entries.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_sorted_entries_missing_dir() {
        let dir = tempdir().unwrap();
        let err = sorted_entries(Platform::Telegram, &dir.path().join("nope"), |_| true).unwrap_err();
        assert!(matches!(err, CorpusError::SourceUnavailable { .. }));
    }
}
