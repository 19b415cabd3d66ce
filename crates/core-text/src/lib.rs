//! Rope-based document storage.
//!
//! Every line stored in the rope is terminated by `\n`, so a rope with
//! `len_lines() == n + 1` holds exactly `n` document lines and the empty rope
//! is a document with zero lines. Columns are char indices within a line.

use ropey::Rope;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod document;

pub use document::Document;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to open \"{path}\": {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to save \"{path}\": {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no file name")]
    NoFileName,
}

/// A text buffer backed by a `ropey::Rope`.
#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// A document holding a single empty line.
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Construct a buffer from in-memory text. Line endings are normalized and
    /// empty text yields one empty line.
    pub fn from_text(content: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_endings(content)),
            path: None,
            dirty: false,
        }
    }

    /// Whole document text, one `\n` after every line.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    fn line_start(&self, line: usize) -> usize {
        self.rope.line_to_char(line)
    }

    fn char_index(&self, line: usize, col: usize) -> usize {
        self.line_start(line) + col.min(self.line_length(line))
    }

    fn in_range(&self, line: usize) -> bool {
        let ok = line < self.line_count();
        debug_assert!(ok, "line {line} out of range ({} lines)", self.line_count());
        ok
    }
}

/// Convert CRLF and lone CR to LF and make sure non-empty text ends in `\n`.
/// Empty input becomes a single empty line.
pub fn normalize_line_endings(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 1);
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

impl Document for Buffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines().saturating_sub(1)
    }

    fn line_length(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        self.rope.line(line).len_chars().saturating_sub(1)
    }

    fn line(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let mut s = self.rope.line(line).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    fn insert_text(&mut self, line: usize, col: usize, text: &str) {
        if !self.in_range(line) || text.is_empty() {
            return;
        }
        debug_assert!(!text.contains('\n'), "insert_text takes single-line text");
        let idx = self.char_index(line, col);
        self.rope.insert(idx, text);
        self.dirty = true;
    }

    fn split_line(&mut self, line: usize, col: usize) -> (String, String) {
        if !self.in_range(line) {
            return (String::new(), String::new());
        }
        let content = self.line(line);
        let at = col.min(self.line_length(line));
        let split_byte = content
            .char_indices()
            .nth(at)
            .map(|(b, _)| b)
            .unwrap_or(content.len());
        let idx = self.char_index(line, at);
        self.rope.insert_char(idx, '\n');
        self.dirty = true;
        let (kept, chopped) = content.split_at(split_byte);
        (kept.to_string(), chopped.to_string())
    }

    fn add_line(&mut self, index: usize, text: &str) {
        let index = index.min(self.line_count());
        debug_assert!(!text.contains('\n'), "add_line takes single-line text");
        let idx = self.line_start(index);
        let mut owned = String::with_capacity(text.len() + 1);
        owned.push_str(text);
        owned.push('\n');
        self.rope.insert(idx, &owned);
        self.dirty = true;
    }

    fn delete_line(&mut self, index: usize) -> String {
        if !self.in_range(index) {
            return String::new();
        }
        let removed = self.line(index);
        let start = self.line_start(index);
        let end = self.line_start(index + 1);
        self.rope.remove(start..end);
        self.dirty = true;
        removed
    }

    fn append_text(&mut self, line: usize, text: &str) {
        let len = self.line_length(line);
        self.insert_text(line, len, text);
    }

    fn erase_chars(&mut self, line: usize, col: usize, count: usize) {
        if !self.in_range(line) {
            return;
        }
        let len = self.line_length(line);
        let from = col.min(len);
        let to = from.saturating_add(count).min(len);
        if from == to {
            return;
        }
        let start = self.line_start(line);
        self.rope.remove(start + from..start + to);
        self.dirty = true;
    }

    fn open(&mut self, path: &Path) -> Result<(), DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.rope = Rope::from_str(&normalize_line_endings(&content));
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        tracing::debug!(
            target: "text.io",
            file = %path.display(),
            size_bytes = content.len(),
            line_count = self.line_count(),
            "file_read_ok"
        );
        Ok(())
    }

    fn persist(&mut self, path: &Path) -> Result<(), DocumentError> {
        let to_err = |source| DocumentError::Persist {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(to_err)?;
        let mut writer = BufWriter::new(file);
        self.rope.write_to(&mut writer).map_err(to_err)?;
        writer.flush().map_err(to_err)?;
        if self.path.is_none() {
            self.path = Some(path.to_path_buf());
        }
        self.dirty = false;
        tracing::debug!(
            target: "text.io",
            file = %path.display(),
            line_count = self.line_count(),
            "file_write_ok"
        );
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn set_path(&mut self, path: &Path) {
        self.path = Some(path.to_path_buf());
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(doc: &Buffer) -> Vec<String> {
        (0..doc.line_count()).map(|i| doc.line(i)).collect()
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let b = Buffer::new();
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line_length(0), 0);
        assert_eq!(b.line(0), "");
    }

    #[test]
    fn trailing_newline_does_not_add_a_line() {
        let b = Buffer::from_text("one\ntwo\n");
        assert_eq!(b.line_count(), 2);
        let c = Buffer::from_text("one\ntwo");
        assert_eq!(c.line_count(), 2);
        assert_eq!(c.text(), "one\ntwo\n");
    }

    #[test]
    fn crlf_is_normalized() {
        let b = Buffer::from_text("a\r\nb\rc\n");
        assert_eq!(lines(&b), vec!["a", "b", "c"]);
    }

    #[test]
    fn only_newline_separates_lines() {
        let mut b = Buffer::from_text("a\x0Cb\nc\u{2028}d\x0Be\u{85}\n");
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0), "a\x0Cb");
        assert_eq!(b.line_length(1), 6);
        b.erase_chars(0, 1, 1);
        assert_eq!(lines(&b), vec!["ab", "c\u{2028}d\x0Be\u{85}"]);
        assert_eq!(b.text(), "ab\nc\u{2028}d\x0Be\u{85}\n");
    }

    #[test]
    fn insert_and_erase_use_char_columns() {
        let mut b = Buffer::from_text("héllo");
        b.insert_text(0, 2, "XY");
        assert_eq!(b.line(0), "héXYllo");
        b.erase_chars(0, 1, 3);
        assert_eq!(b.line(0), "hllo");
        assert!(b.is_dirty());
    }

    #[test]
    fn insert_past_end_clamps_to_line_length() {
        let mut b = Buffer::from_text("ab");
        b.insert_text(0, 10, "c");
        assert_eq!(b.line(0), "abc");
    }

    #[test]
    fn split_line_returns_both_halves() {
        let mut b = Buffer::from_text("hello world");
        let (kept, chopped) = b.split_line(0, 5);
        assert_eq!(kept, "hello");
        assert_eq!(chopped, " world");
        assert_eq!(lines(&b), vec!["hello", " world"]);
    }

    #[test]
    fn split_at_end_adds_empty_line() {
        let mut b = Buffer::from_text("abc\nz");
        b.split_line(0, 3);
        assert_eq!(lines(&b), vec!["abc", "", "z"]);
    }

    #[test]
    fn add_and_delete_lines() {
        let mut b = Buffer::from_text("a\nb\nc");
        b.add_line(1, "x");
        assert_eq!(lines(&b), vec!["a", "x", "b", "c"]);
        b.add_line(4, "end");
        assert_eq!(lines(&b), vec!["a", "x", "b", "c", "end"]);
        assert_eq!(b.delete_line(0), "a");
        assert_eq!(lines(&b), vec!["x", "b", "c", "end"]);
    }

    #[test]
    fn deleting_every_line_leaves_zero_lines() {
        let mut b = Buffer::from_text("only");
        b.delete_line(0);
        assert_eq!(b.line_count(), 0);
        b.add_line(0, "");
        assert_eq!(b.line_count(), 1);
    }

    #[test]
    fn append_text_joins_at_end() {
        let mut b = Buffer::from_text("foo\nbar");
        let removed = b.delete_line(1);
        b.append_text(0, &removed);
        assert_eq!(lines(&b), vec!["foobar"]);
    }

    #[test]
    fn open_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = Buffer::new();
        let err = b.open(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, DocumentError::Open { .. }));
        assert!(err.to_string().starts_with("failed to open"));
        assert_eq!(b.line_count(), 1, "failed open leaves contents unchanged");
    }

    #[test]
    fn open_then_persist_round_trips_with_trailing_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.txt");
        std::fs::write(&src, "alpha\r\nbeta").unwrap();
        let mut b = Buffer::new();
        b.open(&src).unwrap();
        assert_eq!(b.path(), Some(src.as_path()));
        assert_eq!(lines(&b), vec!["alpha", "beta"]);

        let out = dir.path().join("out.txt");
        b.insert_text(1, 0, ">");
        b.persist(&out).unwrap();
        assert!(!b.is_dirty());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "alpha\n>beta\n");
    }

    #[test]
    fn persist_adopts_path_when_unnamed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("new.txt");
        let mut b = Buffer::from_text("x");
        b.persist(&out).unwrap();
        assert_eq!(b.path(), Some(out.as_path()));
    }

    #[test]
    fn persist_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nope").join("new.txt");
        let mut b = Buffer::from_text("x");
        let err = b.persist(&out).unwrap_err();
        assert!(matches!(err, DocumentError::Persist { .. }));
    }
}
