//! Command Interface Layer
//!
//! Every user action of the editor is a [`Command`] handled by [`CommandExecutor::execute`].
//! The executor owns the [`Editor`], the [`SearchSession`] (last pattern and replacement) and,
//! while the replace dialog is open, its [`ReplaceCoordinator`].
//!
//! # Overview
//!
//! - **File**: new, open, save, save as
//! - **Edit**: typing, deletion, clipboard, undo/redo
//! - **Cursor**: caret motion and selection
//! - **Find**: find, find all, find next/previous, the replace dialog
//! - **View**: line numbers, word wrap, split view and focus
//!
//! # Example
//!
//! ```rust
//! use textpad_core::{Command, CommandExecutor, CommandResult, FindCommand};
//!
//! let mut executor = CommandExecutor::new("the cat sat on the mat");
//!
//! let result = executor
//!     .execute(Command::Find(FindCommand::Find { pattern: "at".to_string() }))
//!     .unwrap();
//! assert!(matches!(result, CommandResult::SearchMatch { start: 5, end: 7 }));
//!
//! // "find next" reuses the stored pattern.
//! let result = executor.execute(Command::Find(FindCommand::FindNext)).unwrap();
//! assert!(matches!(result, CommandResult::SearchMatch { start: 9, end: 11 }));
//! ```

use crate::config::EditorConfig;
use crate::document::{DocumentError, FileError};
use crate::editor::{CaretMotion, Editor, SaveStatus, SurfaceId};
use crate::replace::{ReplaceCoordinator, ReplaceOutcome, ReplaceState};
use crate::search::{MatchList, SearchDirection, SearchMatch};
use crate::session::SearchSession;
use std::path::PathBuf;
use thiserror::Error;

/// File commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCommand {
    /// Replace the document with an empty, unnamed one.
    New,
    /// Load a file.
    Open {
        /// File to load.
        path: PathBuf,
    },
    /// Save to the current file name.
    ///
    /// Returns [`CommandResult::NeedsFileName`] if the document has none yet.
    Save,
    /// Save under a new file name.
    SaveAs {
        /// Target file.
        path: PathBuf,
    },
}

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Type or paste text at the caret, replacing the selection.
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Delete the selection, or one grapheme before the caret.
    Backspace,
    /// Delete the selection, or one grapheme after the caret.
    DeleteForward,
    /// Delete the selection.
    DeleteSelection,
    /// Cut the selection to the clipboard.
    Cut,
    /// Copy the selection to the clipboard.
    Copy,
    /// Paste the clipboard.
    Paste,
    /// Revert the last edit (typed characters are reverted together).
    Undo,
    /// Re-apply the last undone edit.
    Redo,
}

/// Cursor & selection commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move the focused caret.
    Move(CaretMotion),
    /// Put the focused caret at a character offset.
    MoveTo {
        /// Character offset.
        offset: usize,
    },
    /// Select a range; the focused caret goes to its end.
    SetSelection {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// Drop the selection.
    ClearSelection,
}

/// Search and replace commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindCommand {
    /// Store `pattern` and search forward from the caret.
    Find {
        /// Literal pattern.
        pattern: String,
    },
    /// Store `pattern` and flash every occurrence.
    FindAll {
        /// Literal pattern.
        pattern: String,
    },
    /// Search forward for the stored pattern.
    FindNext,
    /// Search backward for the stored pattern.
    FindPrev,
    /// Replace dialog "find" button.
    ReplaceFindNext {
        /// Literal pattern.
        pattern: String,
    },
    /// Replace dialog "replace" button: replace the selection, then find next.
    ReplaceAndFind {
        /// Replacement text.
        replacement: String,
    },
    /// Close the replace dialog.
    CloseReplace,
}

/// View commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// Show or hide the line-number gutter.
    ToggleLineNumbers,
    /// Turn soft wrapping on or off.
    ToggleWordWrap,
    /// Open the split view.
    OpenSplit,
    /// Close the split view.
    CloseSplit,
    /// Move focus to a surface.
    Focus {
        /// Surface to focus.
        surface: SurfaceId,
    },
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// File commands
    File(FileCommand),
    /// Text editing commands
    Edit(EditCommand),
    /// Cursor commands
    Cursor(CursorCommand),
    /// Search commands
    Find(FindCommand),
    /// View commands
    View(ViewCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// Success, returns text (cut / copy)
    Text(String),
    /// A match was selected (half-open char offsets).
    SearchMatch {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// No match; a notice was queued unless the pattern was empty.
    SearchNotFound,
    /// Find-all result.
    Matches(MatchList),
    /// Replace dialog step result.
    Replace(ReplaceOutcome),
    /// Find next/previous before any pattern was entered; the frontend should prompt.
    NeedsPattern,
    /// Save before any file name was chosen; the frontend should ask for one.
    NeedsFileName,
}

impl From<Option<SearchMatch>> for CommandResult {
    fn from(found: Option<SearchMatch>) -> Self {
        match found {
            Some(m) => CommandResult::SearchMatch {
                start: m.start,
                end: m.end,
            },
            None => CommandResult::SearchNotFound,
        }
    }
}

/// Command error type
#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad offset or range.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// File load/save failure.
    #[error(transparent)]
    File(#[from] FileError),
    /// Focus requested on the split view while it is closed.
    #[error("split view is not open")]
    SplitClosed,
    /// Undo with an empty undo history.
    #[error("nothing to undo")]
    NothingToUndo,
    /// Redo with nothing undone.
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Command executor
///
/// # Example
///
/// ```rust
/// use textpad_core::{Command, CommandExecutor, EditCommand};
///
/// let mut executor = CommandExecutor::empty();
/// executor
///     .execute(Command::Edit(EditCommand::InsertText { text: "abc".to_string() }))
///     .unwrap();
///
/// assert_eq!(executor.editor().text(), "abc");
/// assert_eq!(executor.editor().title(), "Untitled *");
/// ```
#[derive(Debug)]
pub struct CommandExecutor {
    editor: Editor,
    session: SearchSession,
    /// Present while the replace dialog is open.
    replace: Option<ReplaceCoordinator>,
}

impl CommandExecutor {
    /// Create an executor over `text` with the default configuration.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &EditorConfig::default())
    }

    /// Create an executor over `text`.
    pub fn with_config(text: &str, config: &EditorConfig) -> Self {
        Self {
            editor: Editor::with_config(text, config),
            session: SearchSession::new(config.max_pattern_len),
            replace: None,
        }
    }

    /// Create an empty executor
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Execute command
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        tracing::debug!(?command, "execute");

        match command {
            Command::File(file_cmd) => self.execute_file(file_cmd),
            Command::Edit(edit_cmd) => self.execute_edit(edit_cmd),
            Command::Cursor(cursor_cmd) => self.execute_cursor(cursor_cmd),
            Command::Find(find_cmd) => Ok(self.execute_find(find_cmd)?),
            Command::View(view_cmd) => self.execute_view(view_cmd),
        }
    }

    /// Batch execute commands, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<Vec<CommandResult>, CommandError> {
        let mut results = Vec::new();

        for command in commands {
            let result = self.execute(command)?;
            results.push(result);
        }

        Ok(results)
    }

    /// The editor.
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// The editor, mutably.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Last pattern and replacement.
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// State of the replace dialog, `None` while it is closed.
    pub fn replace_state(&self) -> Option<ReplaceState> {
        self.replace.as_ref().map(ReplaceCoordinator::state)
    }

    fn execute_file(&mut self, command: FileCommand) -> Result<CommandResult, CommandError> {
        match command {
            FileCommand::New => {
                self.editor.new_file();
                Ok(CommandResult::Success)
            }
            FileCommand::Open { path } => {
                self.editor.open(&path)?;
                Ok(CommandResult::Success)
            }
            FileCommand::Save => match self.editor.save()? {
                SaveStatus::Saved => Ok(CommandResult::Success),
                SaveStatus::NeedsFileName => Ok(CommandResult::NeedsFileName),
            },
            FileCommand::SaveAs { path } => {
                self.editor.save_as(&path)?;
                Ok(CommandResult::Success)
            }
        }
    }

    fn execute_edit(&mut self, command: EditCommand) -> Result<CommandResult, CommandError> {
        match command {
            EditCommand::InsertText { text } => self.editor.insert_text(&text)?,
            EditCommand::Backspace => self.editor.backspace()?,
            EditCommand::DeleteForward => self.editor.delete_forward()?,
            EditCommand::DeleteSelection => {
                self.editor.delete_selection()?;
            }
            EditCommand::Cut => {
                return Ok(self
                    .editor
                    .cut()?
                    .map_or(CommandResult::Success, CommandResult::Text));
            }
            EditCommand::Copy => {
                return Ok(self
                    .editor
                    .copy()
                    .map_or(CommandResult::Success, CommandResult::Text));
            }
            EditCommand::Paste => self.editor.paste()?,
            EditCommand::Undo => {
                if !self.editor.undo()? {
                    return Err(CommandError::NothingToUndo);
                }
                self.reset_replace();
            }
            EditCommand::Redo => {
                if !self.editor.redo()? {
                    return Err(CommandError::NothingToRedo);
                }
                self.reset_replace();
            }
        }
        Ok(CommandResult::Success)
    }

    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        match command {
            CursorCommand::Move(motion) => self.editor.move_caret(motion),
            CursorCommand::MoveTo { offset } => {
                let len = self.editor.len_chars();
                if offset > len {
                    return Err(DocumentError::InvalidOffset { offset, len }.into());
                }
                self.editor.clear_selection();
                self.editor.set_caret(offset);
            }
            CursorCommand::SetSelection { start, end } => {
                self.editor.set_selection(start, end)?;
            }
            CursorCommand::ClearSelection => self.editor.clear_selection(),
        }
        Ok(CommandResult::Success)
    }

    fn execute_find(&mut self, command: FindCommand) -> Result<CommandResult, DocumentError> {
        let result = match command {
            FindCommand::Find { pattern } => {
                let pattern = self.session.set_pattern(&pattern);
                self.editor.find(pattern, SearchDirection::Forward).into()
            }
            FindCommand::FindAll { pattern } => {
                let pattern = self.session.set_pattern(&pattern);
                CommandResult::Matches(self.editor.find_all(pattern))
            }
            FindCommand::FindNext => self.find_again(SearchDirection::Forward),
            FindCommand::FindPrev => self.find_again(SearchDirection::Backward),
            FindCommand::ReplaceFindNext { pattern } => self
                .replace
                .get_or_insert_with(ReplaceCoordinator::new)
                .find_next(&mut self.editor, &mut self.session, &pattern)
                .into(),
            FindCommand::ReplaceAndFind { replacement } => {
                let outcome = self
                    .replace
                    .get_or_insert_with(ReplaceCoordinator::new)
                    .replace_and_advance(&mut self.editor, &mut self.session, &replacement)?;
                CommandResult::Replace(outcome)
            }
            FindCommand::CloseReplace => {
                self.replace = None;
                CommandResult::Success
            }
        };
        Ok(result)
    }

    /// The replace dialog's match no longer describes the text.
    fn reset_replace(&mut self) {
        if let Some(replace) = &mut self.replace {
            *replace = ReplaceCoordinator::new();
        }
    }

    fn find_again(&mut self, direction: SearchDirection) -> CommandResult {
        match self.session.last_pattern() {
            Some(pattern) => self.editor.find(pattern, direction).into(),
            None => CommandResult::NeedsPattern,
        }
    }

    fn execute_view(&mut self, command: ViewCommand) -> Result<CommandResult, CommandError> {
        match command {
            ViewCommand::ToggleLineNumbers => {
                self.editor.toggle_line_numbers();
            }
            ViewCommand::ToggleWordWrap => {
                self.editor.toggle_word_wrap();
            }
            ViewCommand::OpenSplit => self.editor.open_split(),
            ViewCommand::CloseSplit => self.editor.close_split(),
            ViewCommand::Focus { surface } => {
                if !self.editor.focus(surface) {
                    return Err(CommandError::SplitClosed);
                }
            }
        }
        Ok(CommandResult::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_next_without_pattern_needs_pattern() {
        let mut executor = CommandExecutor::new("abc");
        let result = executor.execute(Command::Find(FindCommand::FindNext)).unwrap();
        assert_eq!(result, CommandResult::NeedsPattern);
        let result = executor.execute(Command::Find(FindCommand::FindPrev)).unwrap();
        assert_eq!(result, CommandResult::NeedsPattern);
    }

    #[test]
    fn test_undo_and_redo_commands() {
        let mut executor = CommandExecutor::new("abc");
        let err = executor.execute(Command::Edit(EditCommand::Undo)).unwrap_err();
        assert!(matches!(err, CommandError::NothingToUndo));

        executor
            .execute(Command::Edit(EditCommand::InsertText {
                text: "x".to_string(),
            }))
            .unwrap();
        executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
        assert_eq!(executor.editor().text(), "abc");
        assert!(!executor.editor().is_modified());

        executor.execute(Command::Edit(EditCommand::Redo)).unwrap();
        assert_eq!(executor.editor().text(), "xabc");
        let err = executor.execute(Command::Edit(EditCommand::Redo)).unwrap_err();
        assert!(matches!(err, CommandError::NothingToRedo));
    }

    #[test]
    fn test_undo_resets_replace_dialog() {
        let mut executor = CommandExecutor::new("foo foo");
        executor
            .execute(Command::Find(FindCommand::ReplaceFindNext {
                pattern: "foo".to_string(),
            }))
            .unwrap();
        executor
            .execute(Command::Find(FindCommand::ReplaceAndFind {
                replacement: "bar".to_string(),
            }))
            .unwrap();
        assert!(matches!(
            executor.replace_state(),
            Some(ReplaceState::MatchSelected(_))
        ));

        executor.execute(Command::Edit(EditCommand::Undo)).unwrap();
        assert_eq!(executor.editor().text(), "foo foo");
        assert_eq!(executor.replace_state(), Some(ReplaceState::Idle));
        assert_eq!(executor.editor().selection(), Some(SearchMatch::new(0, 3)));
    }

    #[test]
    fn test_save_without_name_needs_file_name() {
        let mut executor = CommandExecutor::new("abc");
        let result = executor.execute(Command::File(FileCommand::Save)).unwrap();
        assert_eq!(result, CommandResult::NeedsFileName);
    }

    #[test]
    fn test_move_to_out_of_range() {
        let mut executor = CommandExecutor::new("abc");
        let err = executor
            .execute(Command::Cursor(CursorCommand::MoveTo { offset: 9 }))
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Document(DocumentError::InvalidOffset { offset: 9, len: 3 })
        ));
    }

    #[test]
    fn test_focus_closed_split() {
        let mut executor = CommandExecutor::new("abc");
        let err = executor
            .execute(Command::View(ViewCommand::Focus {
                surface: SurfaceId::Split,
            }))
            .unwrap_err();
        assert!(matches!(err, CommandError::SplitClosed));
    }

    #[test]
    fn test_replace_dialog_lifecycle() {
        let mut executor = CommandExecutor::new("foo");
        assert_eq!(executor.replace_state(), None);
        executor
            .execute(Command::Find(FindCommand::ReplaceFindNext {
                pattern: "foo".to_string(),
            }))
            .unwrap();
        assert_eq!(
            executor.replace_state(),
            Some(ReplaceState::MatchSelected(SearchMatch::new(0, 3)))
        );
        executor.execute(Command::Find(FindCommand::CloseReplace)).unwrap();
        assert_eq!(executor.replace_state(), None);
    }

    #[test]
    fn test_config_bounds_pattern() {
        let config = EditorConfig {
            max_pattern_len: 2,
            ..EditorConfig::default()
        };
        let mut executor = CommandExecutor::with_config("abcab", &config);
        executor
            .execute(Command::Find(FindCommand::Find {
                pattern: "abc".to_string(),
            }))
            .unwrap();
        assert_eq!(executor.session().last_pattern(), Some("ab"));
    }
}
