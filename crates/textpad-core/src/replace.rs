//! Find-and-replace sequencing.
//!
//! [`ReplaceCoordinator`] drives the replace dialog: "find" selects the next match, "replace"
//! swaps the selected text for the replacement and immediately looks for the next match. It
//! lives only while the dialog is open.

use crate::document::DocumentError;
use crate::editor::Editor;
use crate::search::{SearchDirection, SearchMatch};
use crate::session::SearchSession;

/// Where the replace dialog stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplaceState {
    /// No match selected by the dialog.
    #[default]
    Idle,
    /// The dialog's last find selected this range.
    MatchSelected(SearchMatch),
}

/// Result of one replace-dialog step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The next match is selected.
    Found(SearchMatch),
    /// No further match (a notice was queued).
    NotFound,
    /// Nothing was selected, so nothing was replaced; `next` is the result of the find step.
    NoActiveSelection {
        /// Match selected by the find step, if any.
        next: Option<SearchMatch>,
    },
}

/// Replace-dialog state machine.
#[derive(Debug, Default)]
pub struct ReplaceCoordinator {
    state: ReplaceState,
}

impl ReplaceCoordinator {
    /// Create an idle coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> ReplaceState {
        self.state
    }

    /// Store `pattern` as the last search pattern and search forward from the focused caret.
    pub fn find_next(
        &mut self,
        editor: &mut Editor,
        session: &mut SearchSession,
        pattern: &str,
    ) -> Option<SearchMatch> {
        let pattern = session.set_pattern(pattern);
        let found = editor.find(pattern, SearchDirection::Forward);
        self.state = match found {
            Some(m) => ReplaceState::MatchSelected(m),
            None => ReplaceState::Idle,
        };
        found
    }

    /// Replace the active selection with `replacement`, then find the next occurrence of the
    /// last search pattern.
    ///
    /// Without an active selection the replace step is skipped and only the find step runs.
    pub fn replace_and_advance(
        &mut self,
        editor: &mut Editor,
        session: &mut SearchSession,
        replacement: &str,
    ) -> Result<ReplaceOutcome, DocumentError> {
        let replacement = session.set_replacement(replacement).to_string();
        let replaced = editor.replace_selection(&replacement)?;
        if let Some(range) = replaced {
            tracing::debug!(start = range.start, end = range.end, "replaced selection");
        }

        let pattern = session.last_pattern().unwrap_or_default().to_string();
        let next = self.find_next(editor, session, &pattern);

        Ok(match (replaced, next) {
            (None, next) => ReplaceOutcome::NoActiveSelection { next },
            (Some(_), Some(m)) => ReplaceOutcome::Found(m),
            (Some(_), None) => ReplaceOutcome::NotFound,
        })
    }
}
