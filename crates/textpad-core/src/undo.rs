//! Undo/redo history.
//!
//! Every document edit made through the [`Editor`](crate::Editor) is recorded as an
//! [`UndoStep`] tagged with a group id. One user action (a replace, a cut, a paste) is one
//! group; consecutive typed characters at the caret share a group. Undo and redo pop a whole
//! group at a time.
//!
//! The history also tracks the clean point (the position of the last load or save), so undoing
//! back to it makes the document unmodified again.

use crate::search::SearchMatch;

/// Steps kept before the oldest is dropped.
pub const DEFAULT_UNDO_LIMIT: usize = 1000;

/// One text replacement at `offset`: `deleted` was removed, then `inserted` was put in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextEdit {
    pub offset: usize,
    pub deleted: String,
    pub inserted: String,
}

impl TextEdit {
    pub fn deleted_len(&self) -> usize {
        self.deleted.chars().count()
    }

    pub fn inserted_len(&self) -> usize {
        self.inserted.chars().count()
    }
}

/// Selection and focused caret at one point of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CaretState {
    pub selection: Option<SearchMatch>,
    pub caret: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct UndoStep {
    group_id: usize,
    pub edit: TextEdit,
    pub before: CaretState,
    pub after: CaretState,
}

#[derive(Debug)]
pub(crate) struct UndoHistory {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    max_undo: usize,
    /// `undo_stack.len()` at the last load or save. `None` once that point is unreachable.
    clean_index: Option<usize>,
    next_group_id: usize,
    /// Group receiving steps while an editor action runs.
    active_group: Option<usize>,
    /// Typing group that the next typed character may join.
    typing_group: Option<usize>,
}

impl UndoHistory {
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
            clean_index: Some(0),
            next_group_id: 0,
            active_group: None,
            typing_group: None,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[cfg(test)]
    fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
        self.typing_group = None;
    }

    /// Forget everything; the current text becomes the clean point.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = Some(0);
        self.active_group = None;
        self.typing_group = None;
    }

    pub fn in_group(&self) -> bool {
        self.active_group.is_some()
    }

    /// Start collecting steps for one editor action.
    ///
    /// A typing action joins the open typing group if the caret sits where that group left it.
    pub fn begin_group(&mut self, typing: bool, caret: usize) {
        let joinable = self.typing_group.filter(|&id| {
            typing
                && self
                    .undo_stack
                    .last()
                    .is_some_and(|step| step.group_id == id && step.after.caret == caret)
        });

        let id = match joinable {
            Some(id) => id,
            None => {
                let id = self.next_group_id;
                self.next_group_id = self.next_group_id.wrapping_add(1);
                id
            }
        };
        self.active_group = Some(id);
        self.typing_group = typing.then_some(id);
    }

    /// Close the running action, recording where it left selection and caret.
    pub fn finish_group(&mut self, after: CaretState) {
        let Some(id) = self.active_group.take() else {
            return;
        };
        if let Some(step) = self.undo_stack.last_mut() {
            if step.group_id == id {
                step.after = after;
            }
        }
    }

    /// Record an applied edit in the running group. Outside a group the edit is not undoable.
    pub fn record(&mut self, edit: TextEdit, before: CaretState, after: CaretState) {
        let Some(group_id) = self.active_group else {
            return;
        };
        self.clear_redo();

        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(index) => Some(index - 1),
            };
        }

        self.undo_stack.push(UndoStep {
            group_id,
            edit,
            before,
            after,
        });
    }

    fn clear_redo(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        // A clean point inside the redo area can no longer be reached.
        if self.clean_index.is_some_and(|index| index > self.undo_stack.len()) {
            self.clean_index = None;
        }
        self.redo_stack.clear();
    }

    /// Newest group, newest step first.
    pub fn pop_undo_group(&mut self) -> Option<Vec<UndoStep>> {
        self.typing_group = None;
        let steps = pop_group(&mut self.undo_stack)?;
        // Moved in pop order so that redo pops the oldest step first.
        self.redo_stack.extend(steps.iter().cloned());
        Some(steps)
    }

    /// Most recently undone group, oldest step first.
    pub fn pop_redo_group(&mut self) -> Option<Vec<UndoStep>> {
        self.typing_group = None;
        let steps = pop_group(&mut self.redo_stack)?;
        self.undo_stack.extend(steps.iter().cloned());
        Some(steps)
    }
}

fn pop_group(stack: &mut Vec<UndoStep>) -> Option<Vec<UndoStep>> {
    let group_id = stack.last()?.group_id;
    let mut steps = Vec::new();
    while let Some(step) = stack.pop_if(|step| step.group_id == group_id) {
        steps.push(step);
    }
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(offset: usize, text: &str) -> TextEdit {
        TextEdit {
            offset,
            deleted: String::new(),
            inserted: text.to_string(),
        }
    }

    fn at(caret: usize) -> CaretState {
        CaretState {
            selection: None,
            caret,
        }
    }

    fn typed(history: &mut UndoHistory, offset: usize, ch: &str) {
        history.begin_group(true, offset);
        history.record(insert(offset, ch), at(offset), at(offset + 1));
        history.finish_group(at(offset + 1));
    }

    #[test]
    fn test_typing_coalesces_into_one_group() {
        let mut history = UndoHistory::new(100);
        typed(&mut history, 0, "a");
        typed(&mut history, 1, "b");
        typed(&mut history, 2, "c");
        assert_eq!(history.undo_depth(), 3);

        let steps = history.pop_undo_group().unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].edit, insert(2, "c"));
        assert!(!history.can_undo());
        assert_eq!(history.redo_depth(), 3);
    }

    #[test]
    fn test_typing_elsewhere_starts_a_new_group() {
        let mut history = UndoHistory::new(100);
        typed(&mut history, 0, "a");
        typed(&mut history, 5, "b");
        assert_eq!(history.pop_undo_group().unwrap().len(), 1);
        assert_eq!(history.pop_undo_group().unwrap().len(), 1);
    }

    #[test]
    fn test_redo_returns_oldest_step_first() {
        let mut history = UndoHistory::new(100);
        history.begin_group(false, 0);
        history.record(insert(0, "x"), at(0), at(1));
        history.record(insert(1, "y"), at(1), at(2));
        history.finish_group(at(2));

        history.pop_undo_group().unwrap();
        let steps = history.pop_redo_group().unwrap();
        assert_eq!(steps[0].edit, insert(0, "x"));
        assert_eq!(steps[1].edit, insert(1, "y"));
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = UndoHistory::new(100);
        typed(&mut history, 0, "a");
        history.pop_undo_group().unwrap();
        assert!(history.can_redo());

        typed(&mut history, 0, "b");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_clean_point_follows_undo() {
        let mut history = UndoHistory::new(100);
        assert!(history.is_clean());
        typed(&mut history, 0, "a");
        assert!(!history.is_clean());
        history.mark_clean();
        assert!(history.is_clean());

        // Saving closes the typing group.
        typed(&mut history, 1, "b");
        history.pop_undo_group().unwrap();
        assert!(history.is_clean());
    }

    #[test]
    fn test_limit_drops_oldest_steps() {
        let mut history = UndoHistory::new(2);
        for i in 0..3 {
            history.begin_group(false, i);
            history.record(insert(i, "x"), at(i), at(i + 1));
            history.finish_group(at(i + 1));
        }
        assert_eq!(history.undo_depth(), 2);
        // The initial clean point fell off the stack.
        while history.pop_undo_group().is_some() {}
        assert!(!history.is_clean());
    }

    #[test]
    fn test_record_outside_group_is_ignored() {
        let mut history = UndoHistory::new(100);
        history.record(insert(0, "a"), at(0), at(1));
        assert!(!history.can_undo());
    }
}
