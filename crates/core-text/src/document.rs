use crate::DocumentError;
use std::path::Path;

/// Line-oriented text storage consumed by the editing engine.
///
/// Line indices are zero based; columns are char offsets within a line and
/// never include the line terminator. Callers keep `line < line_count()` for
/// every method that takes an existing line; implementations may assert it.
pub trait Document {
    fn line_count(&self) -> usize;
    fn line_length(&self, line: usize) -> usize;
    fn line(&self, line: usize) -> String;
    /// Insert single-line `text` at `col` (clamped to the line length).
    fn insert_text(&mut self, line: usize, col: usize, text: &str);
    /// Break `line` at `col`. Returns `(kept, chopped)`; `chopped` becomes line `line + 1`.
    fn split_line(&mut self, line: usize, col: usize) -> (String, String);
    /// Insert a new line so that it ends up at `index` (`index == line_count()` appends).
    fn add_line(&mut self, index: usize, text: &str);
    /// Remove line `index`, returning its text.
    fn delete_line(&mut self, index: usize) -> String;
    fn append_text(&mut self, line: usize, text: &str);
    fn erase_chars(&mut self, line: usize, col: usize, count: usize);
    /// Replace the contents with the file at `path`. On error the contents are unchanged.
    fn open(&mut self, path: &Path) -> Result<(), DocumentError>;
    fn persist(&mut self, path: &Path) -> Result<(), DocumentError>;
    /// File the document was opened from or last saved to.
    fn path(&self) -> Option<&Path>;
    /// Remember `path` as the document's file without reading it.
    fn set_path(&mut self, path: &Path);
    fn is_dirty(&self) -> bool;
}
