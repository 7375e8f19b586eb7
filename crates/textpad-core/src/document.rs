//! Document buffer.
//!
//! [`Document`] is the text buffer every other component works against: a rope of characters,
//! one optional selection shared by all editing surfaces, a version counter, and change
//! subscribers. Offsets are character offsets in `0..=len_chars()`.

use crate::search::SearchMatch;
use ropey::Rope;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from offset-based document edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Offset past the end of the document.
    #[error("invalid offset {offset} (document length {len})")]
    InvalidOffset {
        /// Offending character offset.
        offset: usize,
        /// Document length in characters.
        len: usize,
    },
    /// Range with `start > end` or past the end of the document.
    #[error("invalid range {start}..{end} (document length {len})")]
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Document length in characters.
        len: usize,
    },
}

/// Errors from loading or saving a file.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read.
    #[error("cannot open {}: {source}", path.display())]
    Load {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The file could not be written.
    #[error("cannot save {}: {source}", path.display())]
    Save {
        /// Path that was written.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Path the failed operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Load { path, .. } | Self::Save { path, .. } => path,
        }
    }

    /// The OS reason, e.g. "No such file or directory (os error 2)".
    pub fn reason(&self) -> String {
        match self {
            Self::Load { source, .. } | Self::Save { source, .. } => source.to_string(),
        }
    }
}

/// A single text change, reported to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    /// Character offset where the change happened.
    pub offset: usize,
    /// Characters inserted.
    pub inserted: usize,
    /// Characters deleted.
    pub deleted: usize,
}

/// Change callback type.
pub type ChangeCallback = Box<dyn FnMut(&TextChange) + Send>;

/// The text buffer.
pub struct Document {
    rope: Rope,
    selection: Option<SearchMatch>,
    version: u64,
    callbacks: Vec<ChangeCallback>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len_chars", &self.rope.len_chars())
            .field("selection", &self.selection)
            .field("version", &self.version)
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Create a document holding `text`.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: None,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length in characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the document holds no characters.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Version counter, bumped by every change that inserts or deletes characters.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Text of `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<String, DocumentError> {
        self.check_range(start, end)?;
        Ok(self.rope.slice(start..end).to_string())
    }

    /// Number of lines (a trailing newline starts an empty last line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of `line` without its line break, or `None` past the last line.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let text = self.rope.line(line).to_string();
        Some(strip_line_break(&text).to_string())
    }

    /// Length of `line` in characters, line break excluded.
    pub fn line_len_chars(&self, line: usize) -> usize {
        self.line_text(line).map_or(0, |text| text.chars().count())
    }

    /// Character offset of the first character of `line` (clamped to the last line).
    pub fn line_to_char(&self, line: usize) -> usize {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(line)
    }

    /// Line containing `offset` (clamped to the document length).
    pub fn char_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// Replace the whole content. Clears the selection.
    pub fn set_text(&mut self, text: &str) {
        let deleted = self.rope.len_chars();
        self.rope = Rope::from_str(text);
        self.selection = None;
        self.changed(TextChange {
            offset: 0,
            inserted: self.rope.len_chars(),
            deleted,
        });
    }

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<TextChange, DocumentError> {
        let len = self.rope.len_chars();
        if offset > len {
            return Err(DocumentError::InvalidOffset { offset, len });
        }
        self.rope.insert(offset, text);
        let change = TextChange {
            offset,
            inserted: text.chars().count(),
            deleted: 0,
        };
        self.changed(change);
        Ok(change)
    }

    /// Remove `start..end`.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<TextChange, DocumentError> {
        self.check_range(start, end)?;
        self.rope.remove(start..end);
        let change = TextChange {
            offset: start,
            inserted: 0,
            deleted: end - start,
        };
        self.changed(change);
        Ok(change)
    }

    /// Current selection, if any (never empty).
    pub fn selection(&self) -> Option<SearchMatch> {
        self.selection
    }

    /// Select `start..end`. An empty range clears the selection.
    pub fn set_selection(&mut self, start: usize, end: usize) -> Result<(), DocumentError> {
        self.check_range(start, end)?;
        self.selection = (start < end).then_some(SearchMatch::new(start, end));
        Ok(())
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Text of the current selection.
    pub fn selected_text(&self) -> Option<String> {
        self.selection
            .map(|sel| self.rope.slice(sel.start..sel.end).to_string())
    }

    /// Register a change callback (`on_modified`). Called after every effective change.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&TextChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Replace the content with the file at `path`. On failure the document is unchanged.
    pub fn load_file(&mut self, path: &Path) -> Result<(), FileError> {
        let rope = File::open(path)
            .and_then(|file| Rope::from_reader(BufReader::new(file)))
            .map_err(|source| FileError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        let deleted = self.rope.len_chars();
        self.rope = rope;
        self.selection = None;
        self.changed(TextChange {
            offset: 0,
            inserted: self.rope.len_chars(),
            deleted,
        });
        Ok(())
    }

    /// Write the content to `path`.
    pub fn save_file(&self, path: &Path) -> Result<(), FileError> {
        let write = || -> io::Result<()> {
            let mut writer = BufWriter::new(File::create(path)?);
            self.rope.write_to(&mut writer)?;
            writer.flush()
        };
        write().map_err(|source| FileError::Save {
            path: path.to_path_buf(),
            source,
        })
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), DocumentError> {
        let len = self.rope.len_chars();
        if start > end || end > len {
            return Err(DocumentError::InvalidRange { start, end, len });
        }
        Ok(())
    }

    fn changed(&mut self, change: TextChange) {
        if change.inserted == 0 && change.deleted == 0 {
            return;
        }
        self.version += 1;
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

/// `line` without its trailing line break (LF, CRLF, or any other break ropey splits on).
pub(crate) fn strip_line_break(line: &str) -> &str {
    if let Some(rest) = line.strip_suffix("\r\n") {
        return rest;
    }
    match line.chars().next_back() {
        Some('\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}') => {
            let mut chars = line.chars();
            chars.next_back();
            chars.as_str()
        }
        _ => line,
    }
}
