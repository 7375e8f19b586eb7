//! Editor state
//!
//! [`Editor`] owns the [`Document`] and everything hanging off it for one open-file session:
//! a caret per editing surface (the primary view and an optional split view), which surface
//! has focus, the match [`HighlightMask`], the undo history, the file path and dirty state,
//! view toggles, the clipboard, and the queue of user-facing [`Notice`]s.
//!
//! Document mutations are global; caret and selection updates made by searches and edits go
//! to the focused surface only. Carets of the other surface are shifted so they stay valid.
//!
//! # Example
//!
//! ```rust
//! use textpad_core::{Editor, SearchDirection, SearchMatch};
//!
//! let mut editor = Editor::new("the cat sat on the mat");
//!
//! let found = editor.find("at", SearchDirection::Forward);
//! assert_eq!(found, Some(SearchMatch::new(5, 7)));
//! assert_eq!(editor.focused_caret(), 7);
//!
//! let all = editor.find_all("at");
//! assert_eq!(all.count(), 3);
//! ```

use crate::config::EditorConfig;
use crate::document::{Document, DocumentError, FileError, TextChange};
use crate::highlight::HighlightMask;
use crate::search::{self, MatchList, SearchDirection, SearchMatch};
use crate::undo::{CaretState, TextEdit, UndoHistory};
use std::fmt;
use std::path::{Path, PathBuf};
use unicode_segmentation::UnicodeSegmentation;

/// Title used while the document has no file name.
pub const UNTITLED: &str = "Untitled";

/// An editing surface showing the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    /// The main view, always present.
    Primary,
    /// The optional split view.
    Split,
}

impl SurfaceId {
    fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Split => 1,
        }
    }
}

/// Caret movement on the focused surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMotion {
    /// One grapheme cluster left (previous line end at a line start).
    Left,
    /// One grapheme cluster right (next line start at a line end).
    Right,
    /// Same column on the previous line, clamped to its length.
    Up,
    /// Same column on the next line, clamped to its length.
    Down,
    /// Start of the current line.
    LineStart,
    /// End of the current line, before the line break.
    LineEnd,
    /// Offset 0.
    DocumentStart,
    /// End of the document.
    DocumentEnd,
}

/// A message for the user, replacing a modal alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A find, find-all or replace chain found nothing.
    PatternNotFound {
        /// The searched pattern.
        pattern: String,
    },
    /// Find-all found `count` matches.
    MatchCount {
        /// The searched pattern.
        pattern: String,
        /// Number of matches.
        count: usize,
        /// The painted mask, for display while the notice is shown.
        highlights: HighlightMask,
    },
    /// Opening or saving a file failed.
    FileError {
        /// The file involved.
        path: PathBuf,
        /// OS error text.
        reason: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternNotFound { pattern } => write!(f, "\"{pattern}\" not found"),
            Self::MatchCount { pattern, count, .. } => {
                let noun = if *count == 1 { "occurrence" } else { "occurrences" };
                write!(f, "found {count} {noun} of \"{pattern}\"")
            }
            Self::FileError { path, reason } => write!(f, "{}: {reason}", path.display()),
        }
    }
}

/// Outcome of [`Editor::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Written to the current file name.
    Saved,
    /// No file name yet; the caller must ask for one and use [`Editor::save_as`].
    NeedsFileName,
}

/// Editor state for one open document.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    highlights: HighlightMask,
    carets: [usize; 2],
    split_open: bool,
    focus: SurfaceId,
    file_path: Option<PathBuf>,
    history: UndoHistory,
    line_numbers: bool,
    word_wrap: bool,
    clipboard: String,
    notices: Vec<Notice>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new("")
    }
}

impl Editor {
    /// Create an editor holding `text`, with the default configuration.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &EditorConfig::default())
    }

    /// Create an editor holding `text`.
    pub fn with_config(text: &str, config: &EditorConfig) -> Self {
        let document = Document::new(text);
        let len = document.len_chars();
        Self {
            document,
            highlights: HighlightMask::new(len),
            carets: [0, 0],
            split_open: false,
            focus: SurfaceId::Primary,
            file_path: None,
            history: UndoHistory::new(config.undo_limit),
            line_numbers: config.line_numbers,
            word_wrap: config.word_wrap,
            clipboard: String::new(),
            notices: Vec::new(),
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.document.text()
    }

    /// Document length in characters.
    pub fn len_chars(&self) -> usize {
        self.document.len_chars()
    }

    /// The live highlight mask (all plain outside a find-all).
    pub fn highlights(&self) -> &HighlightMask {
        &self.highlights
    }

    /// Register a document change callback.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&TextChange) + Send + 'static,
    {
        self.document.subscribe(callback);
    }

    // ------------------------------------------------------------------
    // Surfaces, caret, selection
    // ------------------------------------------------------------------

    /// Returns `true` while the split view is open.
    pub fn is_split_open(&self) -> bool {
        self.split_open
    }

    /// Open the split view with its caret at the primary caret.
    pub fn open_split(&mut self) {
        if !self.split_open {
            self.split_open = true;
            self.carets[SurfaceId::Split.index()] = self.carets[SurfaceId::Primary.index()];
        }
    }

    /// Close the split view; focus returns to the primary surface.
    pub fn close_split(&mut self) {
        self.split_open = false;
        self.focus = SurfaceId::Primary;
    }

    /// Focus `surface`. Returns `false` (and keeps focus) if the split view is closed.
    pub fn focus(&mut self, surface: SurfaceId) -> bool {
        if surface == SurfaceId::Split && !self.split_open {
            return false;
        }
        self.focus = surface;
        true
    }

    /// The focused surface.
    pub fn focused(&self) -> SurfaceId {
        self.focus
    }

    /// Caret of `surface`.
    pub fn caret(&self, surface: SurfaceId) -> usize {
        self.carets[surface.index()]
    }

    /// Caret of the focused surface.
    pub fn focused_caret(&self) -> usize {
        self.caret(self.focus)
    }

    /// Move the focused caret to `offset` (clamped to the document length).
    pub fn set_caret(&mut self, offset: usize) {
        self.carets[self.focus.index()] = offset.min(self.document.len_chars());
    }

    /// Current selection.
    pub fn selection(&self) -> Option<SearchMatch> {
        self.document.selection()
    }

    /// Select `start..end` and put the focused caret at `end`.
    pub fn set_selection(&mut self, start: usize, end: usize) -> Result<(), DocumentError> {
        self.document.set_selection(start, end)?;
        self.set_caret(end);
        Ok(())
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.document.clear_selection();
    }

    /// Move the focused caret. Clears the selection.
    pub fn move_caret(&mut self, motion: CaretMotion) {
        let target = self.caret_target(self.focused_caret(), motion);
        self.document.clear_selection();
        self.set_caret(target);
    }

    fn caret_target(&self, caret: usize, motion: CaretMotion) -> usize {
        let doc = &self.document;
        let line = doc.char_to_line(caret);
        let line_start = doc.line_to_char(line);
        let line_len = doc.line_len_chars(line);
        let column = caret.saturating_sub(line_start).min(line_len);

        match motion {
            CaretMotion::Left => {
                if column == 0 {
                    if line == 0 {
                        return caret;
                    }
                    return doc.line_to_char(line - 1) + doc.line_len_chars(line - 1);
                }
                let text = doc.line_text(line).unwrap_or_default();
                line_start + previous_grapheme_boundary(&text, column)
            }
            CaretMotion::Right => {
                if column >= line_len {
                    if line + 1 < doc.line_count() {
                        return doc.line_to_char(line + 1);
                    }
                    return caret;
                }
                let text = doc.line_text(line).unwrap_or_default();
                line_start + next_grapheme_boundary(&text, column)
            }
            CaretMotion::Up => {
                if line == 0 {
                    return line_start;
                }
                doc.line_to_char(line - 1) + column.min(doc.line_len_chars(line - 1))
            }
            CaretMotion::Down => {
                if line + 1 >= doc.line_count() {
                    return line_start + line_len;
                }
                doc.line_to_char(line + 1) + column.min(doc.line_len_chars(line + 1))
            }
            CaretMotion::LineStart => line_start,
            CaretMotion::LineEnd => line_start + line_len,
            CaretMotion::DocumentStart => 0,
            CaretMotion::DocumentEnd => doc.len_chars(),
        }
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Insert `text` at the focused caret, replacing the selection if there is one.
    ///
    /// Single typed characters at the caret are undone together.
    pub fn insert_text(&mut self, text: &str) -> Result<(), DocumentError> {
        let typing = is_typed_char(text) && self.document.selection().is_none();
        self.edit_group(typing, |editor| {
            editor.delete_selection()?;
            let at = editor.focused_caret();
            editor.insert_at(at, text)?;
            Ok(())
        })
    }

    /// Delete the selection, or the grapheme cluster (or line break) before the caret.
    pub fn backspace(&mut self) -> Result<(), DocumentError> {
        self.edit_group(false, |editor| {
            if editor.delete_selection()? {
                return Ok(());
            }
            let caret = editor.focused_caret();
            let start = editor.caret_target(caret, CaretMotion::Left);
            editor.remove_range(start, caret)
        })
    }

    /// Delete the selection, or the grapheme cluster (or line break) after the caret.
    pub fn delete_forward(&mut self) -> Result<(), DocumentError> {
        self.edit_group(false, |editor| {
            if editor.delete_selection()? {
                return Ok(());
            }
            let caret = editor.focused_caret();
            let end = editor.caret_target(caret, CaretMotion::Right);
            editor.remove_range(caret, end)
        })
    }

    /// Delete the selected text. Returns `false` if nothing was selected.
    pub fn delete_selection(&mut self) -> Result<bool, DocumentError> {
        let Some(sel) = self.document.selection() else {
            return Ok(false);
        };
        self.edit_group(false, |editor| editor.remove_range(sel.start, sel.end))?;
        Ok(true)
    }

    /// Copy the selection to the clipboard. Returns the copied text.
    pub fn copy(&mut self) -> Option<String> {
        let text = self.document.selected_text()?;
        self.clipboard.clone_from(&text);
        Some(text)
    }

    /// Copy the selection to the clipboard, then delete it.
    pub fn cut(&mut self) -> Result<Option<String>, DocumentError> {
        let Some(text) = self.copy() else {
            return Ok(None);
        };
        self.edit_group(false, Self::delete_selection)?;
        Ok(Some(text))
    }

    /// Insert the clipboard at the caret (replacing the selection).
    pub fn paste(&mut self) -> Result<(), DocumentError> {
        if self.clipboard.is_empty() {
            return Ok(());
        }
        let text = self.clipboard.clone();
        self.edit_group(false, |editor| editor.insert_text(&text))
    }

    /// Clipboard content.
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Run one user-level edit as a single undo group. Nested calls join the outer group.
    fn edit_group<T>(
        &mut self,
        typing: bool,
        action: impl FnOnce(&mut Self) -> Result<T, DocumentError>,
    ) -> Result<T, DocumentError> {
        if self.history.in_group() {
            return action(self);
        }
        self.history.begin_group(typing, self.focused_caret());
        let result = action(self);
        let after = self.caret_state();
        self.history.finish_group(after);
        result
    }

    fn caret_state(&self) -> CaretState {
        CaretState {
            selection: self.document.selection(),
            caret: self.focused_caret(),
        }
    }

    /// Insert at `offset`; the focused caret ends after the inserted text.
    fn insert_at(&mut self, offset: usize, text: &str) -> Result<usize, DocumentError> {
        let before = self.caret_state();
        let change = self.document.insert(offset, text)?;
        self.document.clear_selection();
        self.after_change(change);
        self.set_caret(offset + change.inserted);
        if change.inserted > 0 {
            let edit = TextEdit {
                offset,
                deleted: String::new(),
                inserted: text.to_string(),
            };
            self.history.record(edit, before, self.caret_state());
        }
        Ok(change.inserted)
    }

    /// Remove `start..end`; the focused caret ends at `start`.
    fn remove_range(&mut self, start: usize, end: usize) -> Result<(), DocumentError> {
        if start == end {
            return Ok(());
        }
        let deleted = self.document.slice(start, end)?;
        let before = self.caret_state();
        let change = self.document.remove(start, end)?;
        self.document.clear_selection();
        self.after_change(change);
        self.set_caret(start);
        let edit = TextEdit {
            offset: start,
            deleted,
            inserted: String::new(),
        };
        self.history.record(edit, before, self.caret_state());
        Ok(())
    }

    fn after_change(&mut self, change: TextChange) {
        for caret in &mut self.carets {
            *caret = shift_offset(*caret, change);
        }
        self.highlights.sync_len(self.document.len_chars());
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Returns `true` if there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns `true` if there is an undone edit to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the last edit group, restoring the selection and caret it started from.
    ///
    /// Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, DocumentError> {
        let Some(steps) = self.history.pop_undo_group() else {
            return Ok(false);
        };
        for step in &steps {
            let edit = &step.edit;
            self.apply_edit(edit.offset, edit.inserted_len(), &edit.deleted)?;
            self.restore_caret_state(step.before)?;
        }
        tracing::debug!(steps = steps.len(), "undo");
        Ok(true)
    }

    /// Re-apply the last undone edit group.
    ///
    /// Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, DocumentError> {
        let Some(steps) = self.history.pop_redo_group() else {
            return Ok(false);
        };
        for step in &steps {
            let edit = &step.edit;
            self.apply_edit(edit.offset, edit.deleted_len(), &edit.inserted)?;
            self.restore_caret_state(step.after)?;
        }
        tracing::debug!(steps = steps.len(), "redo");
        Ok(true)
    }

    /// Replace `remove_len` chars at `offset` with `insert`, outside the undo history.
    fn apply_edit(
        &mut self,
        offset: usize,
        remove_len: usize,
        insert: &str,
    ) -> Result<(), DocumentError> {
        if remove_len > 0 {
            let change = self.document.remove(offset, offset + remove_len)?;
            self.after_change(change);
        }
        if !insert.is_empty() {
            let change = self.document.insert(offset, insert)?;
            self.after_change(change);
        }
        Ok(())
    }

    fn restore_caret_state(&mut self, state: CaretState) -> Result<(), DocumentError> {
        self.document.clear_selection();
        if let Some(sel) = state.selection {
            self.document.set_selection(sel.start, sel.end)?;
        }
        self.set_caret(state.caret);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Forward search from `from` without touching any state.
    pub fn search_forward(&self, pattern: &str, from: usize) -> Option<SearchMatch> {
        search::forward_search(&self.document.text(), from, pattern)
    }

    /// Backward search from `from` without touching any state.
    pub fn search_backward(&self, pattern: &str, from: usize) -> Option<SearchMatch> {
        search::backward_search(&self.document.text(), from, pattern)
    }

    /// Search from the focused caret; select the match and move the caret to its end.
    ///
    /// A miss queues [`Notice::PatternNotFound`] and leaves selection and caret alone. An
    /// empty pattern is a no-op.
    pub fn find(&mut self, pattern: &str, direction: SearchDirection) -> Option<SearchMatch> {
        if pattern.is_empty() {
            return None;
        }

        let from = self.focused_caret();
        let found = search::search(&self.document.text(), from, pattern, direction);
        match found {
            Some(m) => {
                tracing::debug!(pattern, ?direction, from, start = m.start, end = m.end, "match");
                self.select_match(m);
            }
            None => {
                tracing::debug!(pattern, ?direction, from, "no match");
                self.notices.push(Notice::PatternNotFound {
                    pattern: pattern.to_string(),
                });
            }
        }
        found
    }

    /// Find every occurrence of `pattern` and flash it.
    ///
    /// The mask is rebuilt for the current document, painted, handed to the
    /// [`Notice::MatchCount`] notice, and cleared again. No match queues
    /// [`Notice::PatternNotFound`]. An empty pattern returns an empty list and touches nothing.
    pub fn find_all(&mut self, pattern: &str) -> MatchList {
        if pattern.is_empty() {
            return MatchList::default();
        }

        let matches = search::find_all(&self.document.text(), pattern);
        self.highlights.reset(self.document.len_chars());
        self.highlights.mark_matches(&matches);
        tracing::debug!(pattern, count = matches.count(), "find all");

        if matches.is_empty() {
            self.notices.push(Notice::PatternNotFound {
                pattern: pattern.to_string(),
            });
        } else {
            self.notices.push(Notice::MatchCount {
                pattern: pattern.to_string(),
                count: matches.count(),
                highlights: self.highlights.clone(),
            });
        }
        self.highlights.clear();
        matches
    }

    /// Replace the selected text with `replacement` and select the inserted text.
    ///
    /// Returns `None` (document untouched) if nothing is selected.
    pub fn replace_selection(
        &mut self,
        replacement: &str,
    ) -> Result<Option<SearchMatch>, DocumentError> {
        let Some(sel) = self.document.selection() else {
            return Ok(None);
        };

        self.edit_group(false, |editor| {
            editor.remove_range(sel.start, sel.end)?;
            let inserted = editor.insert_at(sel.start, replacement)?;
            let range = SearchMatch::new(sel.start, sel.start + inserted);
            editor.select_match(range);
            Ok(Some(range))
        })
    }

    fn select_match(&mut self, m: SearchMatch) {
        // Ranges come from a search over the current text, so they are in bounds.
        if self.document.set_selection(m.start, m.end).is_ok() {
            self.set_caret(m.end);
        }
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Queued notices.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    // ------------------------------------------------------------------
    // File session
    // ------------------------------------------------------------------

    /// Current file name.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns `true` if the text differs from the last load/save/new.
    ///
    /// Undoing back to the saved text makes the document unmodified again.
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    /// Window title: file name (or [`UNTITLED`]), with " *" while modified.
    pub fn title(&self) -> String {
        let name = self
            .file_path
            .as_ref()
            .map_or_else(|| UNTITLED.to_string(), |p| p.display().to_string());
        if self.is_modified() {
            format!("{name} *")
        } else {
            name
        }
    }

    /// Start a new, empty, unnamed document.
    pub fn new_file(&mut self) {
        self.document.set_text("");
        self.file_path = None;
        self.reset_session_state();
    }

    /// Load `path`. On failure the editor is unchanged.
    pub fn open(&mut self, path: &Path) -> Result<(), FileError> {
        if let Err(err) = self.document.load_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "open failed");
            self.push_file_error(&err);
            return Err(err);
        }
        tracing::info!(path = %path.display(), chars = self.document.len_chars(), "opened");
        self.file_path = Some(path.to_path_buf());
        self.reset_session_state();
        Ok(())
    }

    /// Save to the current file name.
    pub fn save(&mut self) -> Result<SaveStatus, FileError> {
        let Some(path) = self.file_path.clone() else {
            return Ok(SaveStatus::NeedsFileName);
        };
        self.write_to(&path)?;
        Ok(SaveStatus::Saved)
    }

    /// Save to `path`, which becomes the current file name.
    pub fn save_as(&mut self, path: &Path) -> Result<(), FileError> {
        self.write_to(path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<(), FileError> {
        if let Err(err) = self.document.save_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "save failed");
            self.push_file_error(&err);
            return Err(err);
        }
        tracing::info!(path = %path.display(), chars = self.document.len_chars(), "saved");
        self.history.mark_clean();
        Ok(())
    }

    fn push_file_error(&mut self, err: &FileError) {
        self.notices.push(Notice::FileError {
            path: err.path().to_path_buf(),
            reason: err.reason(),
        });
    }

    fn reset_session_state(&mut self) {
        self.history.clear();
        self.carets = [0, 0];
        self.highlights.reset(self.document.len_chars());
    }

    // ------------------------------------------------------------------
    // View toggles
    // ------------------------------------------------------------------

    /// Whether the line-number gutter is shown.
    pub fn line_numbers(&self) -> bool {
        self.line_numbers
    }

    /// Flip the line-number gutter. Returns the new value.
    pub fn toggle_line_numbers(&mut self) -> bool {
        self.line_numbers = !self.line_numbers;
        self.line_numbers
    }

    /// Whether long lines wrap.
    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    /// Flip word wrap. Returns the new value.
    pub fn toggle_word_wrap(&mut self) -> bool {
        self.word_wrap = !self.word_wrap;
        self.word_wrap
    }
}

fn shift_offset(offset: usize, change: TextChange) -> usize {
    let mut offset = offset;
    if change.deleted > 0 {
        let end = change.offset + change.deleted;
        if offset >= end {
            offset -= change.deleted;
        } else if offset > change.offset {
            offset = change.offset;
        }
    }
    if change.inserted > 0 && offset > change.offset {
        offset += change.inserted;
    }
    offset
}

fn is_typed_char(text: &str) -> bool {
    let mut chars = text.chars();
    matches!((chars.next(), chars.next()), (Some(ch), None) if ch != '\n')
}

/// Char column of the grapheme boundary before `column` in `line`.
fn previous_grapheme_boundary(line: &str, column: usize) -> usize {
    let mut previous = 0;
    for (byte, _) in line.grapheme_indices(true) {
        let col = line[..byte].chars().count();
        if col >= column {
            break;
        }
        previous = col;
    }
    previous
}

/// Char column of the grapheme boundary after `column` in `line`.
fn next_grapheme_boundary(line: &str, column: usize) -> usize {
    let mut col = 0;
    for grapheme in line.graphemes(true) {
        col += grapheme.chars().count();
        if col > column {
            return col;
        }
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_selects_and_moves_caret() {
        let mut editor = Editor::new("the cat sat on the mat");
        let m = editor.find("at", SearchDirection::Forward);
        assert_eq!(m, Some(SearchMatch::new(5, 7)));
        assert_eq!(editor.selection(), Some(SearchMatch::new(5, 7)));
        assert_eq!(editor.focused_caret(), 7);

        let m = editor.find("at", SearchDirection::Forward);
        assert_eq!(m, Some(SearchMatch::new(9, 11)));
    }

    #[test]
    fn test_find_miss_queues_notice_and_keeps_state() {
        let mut editor = Editor::new("abc");
        editor.set_selection(0, 1).unwrap();
        assert_eq!(editor.find("zzz", SearchDirection::Forward), None);
        assert_eq!(editor.selection(), Some(SearchMatch::new(0, 1)));
        assert_eq!(editor.focused_caret(), 1);
        assert_eq!(
            editor.take_notices(),
            vec![Notice::PatternNotFound {
                pattern: "zzz".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_pattern_is_silent() {
        let mut editor = Editor::new("abc");
        assert_eq!(editor.find("", SearchDirection::Forward), None);
        assert!(editor.find_all("").is_empty());
        assert!(editor.notices().is_empty());
    }

    #[test]
    fn test_find_all_flashes_then_clears_mask() {
        let mut editor = Editor::new("the cat sat on the mat");
        let matches = editor.find_all("at");
        assert_eq!(matches.count(), 3);
        assert!(editor.highlights().is_plain());
        assert_eq!(editor.highlights().len(), editor.len_chars());

        let notices = editor.take_notices();
        let [Notice::MatchCount { count, highlights, .. }] = notices.as_slice() else {
            panic!("expected one MatchCount notice, got {notices:?}");
        };
        assert_eq!(*count, 3);
        assert_eq!(highlights.len(), 22);
        assert_eq!(highlights.matched_ranges(), &[5..7, 9..11, 20..22]);
    }

    #[test]
    fn test_find_all_miss() {
        let mut editor = Editor::new("abc");
        assert!(editor.find_all("x").is_empty());
        assert!(matches!(
            editor.take_notices().as_slice(),
            [Notice::PatternNotFound { .. }]
        ));
    }

    #[test]
    fn test_split_surface_gets_its_own_caret() {
        let mut editor = Editor::new("foo bar foo");
        editor.open_split();
        assert!(editor.focus(SurfaceId::Split));
        editor.find("bar", SearchDirection::Forward);

        assert_eq!(editor.caret(SurfaceId::Split), 7);
        assert_eq!(editor.caret(SurfaceId::Primary), 0);

        editor.close_split();
        assert_eq!(editor.focused(), SurfaceId::Primary);
        assert!(!editor.focus(SurfaceId::Split));
    }

    #[test]
    fn test_other_caret_shifts_with_edits() {
        let mut editor = Editor::new("hello world");
        editor.set_caret(6);
        editor.open_split();
        editor.focus(SurfaceId::Split);
        editor.set_caret(0);
        editor.insert_text(">> ").unwrap();

        assert_eq!(editor.caret(SurfaceId::Split), 3);
        assert_eq!(editor.caret(SurfaceId::Primary), 9);
    }

    #[test]
    fn test_replace_selection() {
        let mut editor = Editor::new("foo foo");
        assert_eq!(editor.replace_selection("bar").unwrap(), None);
        assert_eq!(editor.text(), "foo foo");

        editor.find("foo", SearchDirection::Forward);
        let range = editor.replace_selection("quux").unwrap();
        assert_eq!(range, Some(SearchMatch::new(0, 4)));
        assert_eq!(editor.text(), "quux foo");
        assert_eq!(editor.selection(), Some(SearchMatch::new(0, 4)));
        assert_eq!(editor.focused_caret(), 4);
    }

    #[test]
    fn test_editing_and_dirty_title() {
        let mut editor = Editor::new("");
        assert_eq!(editor.title(), "Untitled");
        editor.insert_text("ab").unwrap();
        assert_eq!(editor.title(), "Untitled *");
        editor.backspace().unwrap();
        assert_eq!(editor.text(), "a");
        editor.move_caret(CaretMotion::DocumentStart);
        editor.delete_forward().unwrap();
        assert_eq!(editor.text(), "");
        assert!(editor.is_modified());

        editor.new_file();
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_backspace_removes_crlf_as_one() {
        let mut editor = Editor::new("a\r\nb");
        editor.set_caret(3);
        editor.backspace().unwrap();
        assert_eq!(editor.text(), "ab");
        assert_eq!(editor.focused_caret(), 1);
    }

    #[test]
    fn test_caret_moves_by_grapheme_and_line() {
        // "e" + combining acute accent is one grapheme of two chars.
        let mut editor = Editor::new("xe\u{301}y\nab");
        editor.set_caret(1);
        editor.move_caret(CaretMotion::Right);
        assert_eq!(editor.focused_caret(), 3);
        editor.move_caret(CaretMotion::Left);
        assert_eq!(editor.focused_caret(), 1);

        editor.move_caret(CaretMotion::LineEnd);
        assert_eq!(editor.focused_caret(), 4);
        editor.move_caret(CaretMotion::Right);
        assert_eq!(editor.focused_caret(), 5);
        editor.move_caret(CaretMotion::Up);
        assert_eq!(editor.focused_caret(), 0);
        editor.move_caret(CaretMotion::DocumentEnd);
        assert_eq!(editor.focused_caret(), 7);
        editor.move_caret(CaretMotion::Up);
        assert_eq!(editor.focused_caret(), 2);
    }

    #[test]
    fn test_clipboard() {
        let mut editor = Editor::new("hello world");
        editor.set_selection(0, 5).unwrap();
        assert_eq!(editor.cut().unwrap().as_deref(), Some("hello"));
        assert_eq!(editor.text(), " world");
        editor.move_caret(CaretMotion::DocumentEnd);
        editor.paste().unwrap();
        assert_eq!(editor.text(), " worldhello");
        assert_eq!(editor.clipboard(), "hello");
    }

    #[test]
    fn test_open_failure_keeps_editor_and_queues_notice() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let mut editor = Editor::new("keep me");

        assert!(editor.open(&missing).is_err());
        assert_eq!(editor.text(), "keep me");
        assert_eq!(editor.file_path(), None);
        let notices = editor.take_notices();
        let [Notice::FileError { path, reason }] = notices.as_slice() else {
            panic!("expected one FileError notice, got {notices:?}");
        };
        assert_eq!(path, &missing);
        assert!(!reason.is_empty());
    }

    #[test]
    fn test_save_as_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut editor = Editor::new("");
        editor.insert_text("data").unwrap();
        assert_eq!(editor.save().unwrap(), SaveStatus::NeedsFileName);

        editor.save_as(&path).unwrap();
        assert!(!editor.is_modified());
        assert_eq!(editor.title(), path.display().to_string());

        editor.insert_text("!").unwrap();
        assert_eq!(editor.title(), format!("{} *", path.display()));
        assert_eq!(editor.save().unwrap(), SaveStatus::Saved);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data!");
    }

    #[test]
    fn test_undo_typing_as_one_step() {
        let mut editor = Editor::new("");
        for ch in ["h", "i", "\n", "x"] {
            editor.insert_text(ch).unwrap();
        }
        assert_eq!(editor.text(), "hi\nx");

        assert!(editor.undo().unwrap());
        assert_eq!(editor.text(), "hi\n");
        assert!(editor.undo().unwrap());
        assert_eq!(editor.text(), "hi");
        assert!(editor.undo().unwrap());
        assert_eq!(editor.text(), "");
        assert_eq!(editor.focused_caret(), 0);
        assert!(!editor.undo().unwrap());

        assert!(editor.redo().unwrap());
        assert_eq!(editor.text(), "hi");
        assert_eq!(editor.focused_caret(), 2);
    }

    #[test]
    fn test_undo_replace_restores_selection() {
        let mut editor = Editor::new("foo bar");
        editor.set_selection(0, 3).unwrap();
        editor.replace_selection("quux").unwrap();
        assert_eq!(editor.text(), "quux bar");

        editor.undo().unwrap();
        assert_eq!(editor.text(), "foo bar");
        assert_eq!(editor.selection(), Some(SearchMatch::new(0, 3)));
        assert_eq!(editor.focused_caret(), 3);

        editor.redo().unwrap();
        assert_eq!(editor.text(), "quux bar");
        assert_eq!(editor.selection(), Some(SearchMatch::new(0, 4)));
        assert_eq!(editor.focused_caret(), 4);
    }

    #[test]
    fn test_cut_and_paste_undo_separately() {
        let mut editor = Editor::new("hello world");
        editor.set_selection(0, 6).unwrap();
        editor.cut().unwrap();
        editor.move_caret(CaretMotion::DocumentEnd);
        editor.paste().unwrap();
        assert_eq!(editor.text(), "worldhello ");

        editor.undo().unwrap();
        assert_eq!(editor.text(), "world");
        editor.undo().unwrap();
        assert_eq!(editor.text(), "hello world");
        assert_eq!(editor.selection(), Some(SearchMatch::new(0, 6)));
    }

    #[test]
    fn test_undo_back_to_saved_text_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut editor = Editor::new("");
        editor.insert_text("a").unwrap();
        editor.save_as(&path).unwrap();

        editor.insert_text("b").unwrap();
        assert!(editor.is_modified());
        editor.undo().unwrap();
        assert_eq!(editor.text(), "a");
        assert!(!editor.is_modified());

        editor.undo().unwrap();
        assert!(editor.is_modified());
    }

    #[test]
    fn test_open_clears_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "loaded").unwrap();
        let mut editor = Editor::new("");
        editor.insert_text("typed").unwrap();

        editor.open(&path).unwrap();
        assert!(!editor.can_undo());
        assert!(!editor.undo().unwrap());
        assert_eq!(editor.text(), "loaded");
    }

    #[test]
    fn test_shift_offset() {
        let insert = TextChange { offset: 2, inserted: 3, deleted: 0 };
        assert_eq!(shift_offset(1, insert), 1);
        assert_eq!(shift_offset(2, insert), 2);
        assert_eq!(shift_offset(4, insert), 7);

        let remove = TextChange { offset: 2, inserted: 0, deleted: 3 };
        assert_eq!(shift_offset(1, remove), 1);
        assert_eq!(shift_offset(3, remove), 2);
        assert_eq!(shift_offset(5, remove), 2);
        assert_eq!(shift_offset(9, remove), 6);
    }
}
