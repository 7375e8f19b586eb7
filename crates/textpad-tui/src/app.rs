//! Application state and key handling.

use crate::help;
use crate::view::{self, PaneState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::path::{Path, PathBuf};
use textpad_core::{
    CaretMotion, Command, CommandError, CommandExecutor, CommandResult, CursorCommand,
    EditCommand, EditorConfig, FileCommand, FindCommand, HighlightMask, Notice, ReplaceOutcome,
    SurfaceId, ViewCommand,
};

/// Single-line prompts shown in the message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Find,
    FindAll,
    Open,
    SaveAs,
}

impl PromptKind {
    fn label(self) -> &'static str {
        match self {
            PromptKind::Find => "Find: ",
            PromptKind::FindAll => "Find all: ",
            PromptKind::Open => "Open file: ",
            PromptKind::SaveAs => "Save as: ",
        }
    }
}

/// Action waiting for the user to deal with unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Quit,
    New,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceField {
    Find,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Prompt {
        kind: PromptKind,
        input: String,
    },
    /// The find-and-replace dialog.
    Replace {
        find: String,
        replace: String,
        field: ReplaceField,
    },
    ConfirmDiscard(PendingAction),
    Help,
}

pub struct App {
    executor: CommandExecutor,
    mode: InputMode,
    should_quit: bool,
    /// Message line text; cleared by the next key press.
    status: String,
    /// Find-all highlight, shown until the next key press.
    flash: Option<HighlightMask>,
    panes: [PaneState; 2],
    /// Resumed after a "Save as" started from the unsaved-changes prompt.
    after_save: Option<PendingAction>,
    /// Text rows of the focused pane, for PageUp/PageDown.
    page_rows: usize,
}

fn pane_index(surface: SurfaceId) -> usize {
    match surface {
        SurfaceId::Primary => 0,
        SurfaceId::Split => 1,
    }
}

impl App {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            executor: CommandExecutor::with_config("", config),
            mode: InputMode::Normal,
            should_quit: false,
            status: String::new(),
            flash: None,
            panes: [PaneState::default(); 2],
            after_save: None,
            page_rows: 1,
        }
    }

    pub fn open_file(&mut self, path: &Path) {
        self.run(Command::File(FileCommand::Open {
            path: path.to_path_buf(),
        }));
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Run a command, reporting errors and notices in the message line.
    fn run(&mut self, command: Command) -> Option<CommandResult> {
        let result = match self.executor.execute(command) {
            Ok(result) => Some(result),
            // Reported through the notice queue.
            Err(CommandError::File(_)) => None,
            Err(CommandError::NothingToUndo) => {
                self.status = "Nothing to undo".to_string();
                None
            }
            Err(CommandError::NothingToRedo) => {
                self.status = "Nothing to redo".to_string();
                None
            }
            Err(err) => {
                self.status = format!("Error: {err}");
                None
            }
        };
        self.drain_notices();
        result
    }

    fn drain_notices(&mut self) {
        for notice in self.executor.editor_mut().take_notices() {
            self.status = notice.to_string();
            if let Notice::MatchCount { highlights, .. } = notice {
                self.flash = Some(highlights);
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.status.clear();
        self.flash = None;

        match self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Prompt { .. } => self.handle_prompt_key(key),
            InputMode::Replace { .. } => self.handle_replace_key(key),
            InputMode::ConfirmDiscard(action) => self.handle_confirm_key(action, key),
            InputMode::Help => self.mode = InputMode::Normal,
        }
    }

    pub fn handle_paste(&mut self, text: String) {
        match &mut self.mode {
            InputMode::Normal => {
                self.run(Command::Edit(EditCommand::InsertText { text }));
            }
            InputMode::Prompt { input, .. } => input.push_str(&text),
            InputMode::Replace {
                find,
                replace,
                field,
            } => match field {
                ReplaceField::Find => find.push_str(&text),
                ReplaceField::Replace => replace.push_str(&text),
            },
            InputMode::ConfirmDiscard(_) | InputMode::Help => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char(c) if ctrl => {
                let shift = shift || c.is_ascii_uppercase();
                match (c.to_ascii_lowercase(), shift) {
                    ('f', _) => self.open_prompt(PromptKind::Find),
                    ('g', _) => self.open_prompt(PromptKind::FindAll),
                    ('n', true) => self.request(PendingAction::New),
                    ('n', false) => self.find_again(FindCommand::FindNext),
                    ('p', _) => self.find_again(FindCommand::FindPrev),
                    ('r', _) => self.open_replace(),
                    ('x', _) => self.edit(EditCommand::Cut),
                    ('c', _) => self.edit(EditCommand::Copy),
                    ('v', _) => self.edit(EditCommand::Paste),
                    ('z', false) => self.edit(EditCommand::Undo),
                    ('z', true) => self.edit(EditCommand::Redo),
                    ('l', _) => self.view(ViewCommand::ToggleLineNumbers),
                    ('w', _) => self.view(ViewCommand::ToggleWordWrap),
                    ('o', _) => self.request(PendingAction::Open),
                    ('s', true) => self.open_prompt(PromptKind::SaveAs),
                    ('s', false) => self.save(),
                    ('q', _) => self.request(PendingAction::Quit),
                    _ => {}
                }
            }
            KeyCode::Esc => self.request(PendingAction::Quit),
            KeyCode::F(1) => self.mode = InputMode::Help,
            KeyCode::F(2) => self.toggle_split(),
            KeyCode::F(6) => self.switch_focus(),
            KeyCode::Left => self.motion(CaretMotion::Left),
            KeyCode::Right => self.motion(CaretMotion::Right),
            KeyCode::Up => self.motion(CaretMotion::Up),
            KeyCode::Down => self.motion(CaretMotion::Down),
            KeyCode::Home if ctrl => self.motion(CaretMotion::DocumentStart),
            KeyCode::End if ctrl => self.motion(CaretMotion::DocumentEnd),
            KeyCode::Home => self.motion(CaretMotion::LineStart),
            KeyCode::End => self.motion(CaretMotion::LineEnd),
            KeyCode::PageUp => {
                for _ in 0..self.page_rows {
                    self.motion(CaretMotion::Up);
                }
            }
            KeyCode::PageDown => {
                for _ in 0..self.page_rows {
                    self.motion(CaretMotion::Down);
                }
            }
            KeyCode::Backspace => self.edit(EditCommand::Backspace),
            KeyCode::Delete => self.edit(EditCommand::DeleteForward),
            KeyCode::Enter => self.insert("\n"),
            KeyCode::Tab => self.insert("\t"),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf));
            }
            _ => {}
        }
    }

    fn insert(&mut self, text: &str) {
        self.edit(EditCommand::InsertText {
            text: text.to_string(),
        });
    }

    fn edit(&mut self, command: EditCommand) {
        self.run(Command::Edit(command));
    }

    fn view(&mut self, command: ViewCommand) {
        self.run(Command::View(command));
    }

    fn motion(&mut self, motion: CaretMotion) {
        self.run(Command::Cursor(CursorCommand::Move(motion)));
    }

    fn toggle_split(&mut self) {
        if self.executor.editor().is_split_open() {
            self.view(ViewCommand::CloseSplit);
        } else {
            self.panes[pane_index(SurfaceId::Split)] = self.panes[pane_index(SurfaceId::Primary)];
            self.view(ViewCommand::OpenSplit);
        }
    }

    fn switch_focus(&mut self) {
        let editor = self.executor.editor();
        if !editor.is_split_open() {
            return;
        }
        let surface = match editor.focused() {
            SurfaceId::Primary => SurfaceId::Split,
            SurfaceId::Split => SurfaceId::Primary,
        };
        self.view(ViewCommand::Focus { surface });
    }

    fn find_again(&mut self, command: FindCommand) {
        if self.run(Command::Find(command)) == Some(CommandResult::NeedsPattern) {
            self.open_prompt(PromptKind::Find);
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        let input = match kind {
            PromptKind::Find | PromptKind::FindAll => self
                .executor
                .session()
                .last_pattern()
                .unwrap_or_default()
                .to_string(),
            PromptKind::SaveAs => self
                .executor
                .editor()
                .file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            PromptKind::Open => String::new(),
        };
        self.mode = InputMode::Prompt { kind, input };
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let InputMode::Prompt { input, .. } = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.after_save = None;
            }
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.push(c),
            _ => {}
        }
    }

    fn submit_prompt(&mut self) {
        let InputMode::Prompt { kind, input } = std::mem::replace(&mut self.mode, InputMode::Normal)
        else {
            return;
        };
        match kind {
            PromptKind::Find => {
                self.run(Command::Find(FindCommand::Find { pattern: input }));
            }
            PromptKind::FindAll => {
                self.run(Command::Find(FindCommand::FindAll { pattern: input }));
            }
            PromptKind::Open => {
                if !input.is_empty() {
                    self.open_file(Path::new(&input));
                }
            }
            PromptKind::SaveAs => {
                if input.is_empty() {
                    self.after_save = None;
                    return;
                }
                let path = PathBuf::from(input);
                let saved = self.run(Command::File(FileCommand::SaveAs { path: path.clone() }));
                if saved.is_some() {
                    self.status = format!("Saved {}", path.display());
                    if let Some(action) = self.after_save.take() {
                        self.proceed(action);
                    }
                } else {
                    self.after_save = None;
                }
            }
        }
    }

    /// Ctrl+S: save, or ask for a file name first.
    fn save(&mut self) {
        match self.run(Command::File(FileCommand::Save)) {
            Some(CommandResult::NeedsFileName) => self.open_prompt(PromptKind::SaveAs),
            Some(_) => {
                if let Some(path) = self.executor.editor().file_path() {
                    self.status = format!("Saved {}", path.display());
                }
            }
            None => {}
        }
    }

    fn request(&mut self, action: PendingAction) {
        if self.executor.editor().is_modified() {
            self.mode = InputMode::ConfirmDiscard(action);
        } else {
            self.proceed(action);
        }
    }

    fn proceed(&mut self, action: PendingAction) {
        self.mode = InputMode::Normal;
        match action {
            PendingAction::Quit => self.should_quit = true,
            PendingAction::New => {
                self.run(Command::File(FileCommand::New));
                self.panes = [PaneState::default(); 2];
            }
            PendingAction::Open => self.open_prompt(PromptKind::Open),
        }
    }

    fn handle_confirm_key(&mut self, action: PendingAction, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                self.mode = InputMode::Normal;
                match self.run(Command::File(FileCommand::Save)) {
                    Some(CommandResult::NeedsFileName) => {
                        self.after_save = Some(action);
                        self.open_prompt(PromptKind::SaveAs);
                    }
                    Some(_) => self.proceed(action),
                    None => {}
                }
            }
            KeyCode::Char('n' | 'N') => self.proceed(action),
            KeyCode::Esc => self.mode = InputMode::Normal,
            _ => {}
        }
    }

    fn open_replace(&mut self) {
        self.mode = InputMode::Replace {
            find: String::new(),
            replace: String::new(),
            field: ReplaceField::Find,
        };
    }

    fn handle_replace_key(&mut self, key: KeyEvent) {
        let InputMode::Replace {
            find,
            replace,
            field,
        } = &mut self.mode
        else {
            return;
        };
        let active = match field {
            ReplaceField::Find => &mut *find,
            ReplaceField::Replace => &mut *replace,
        };

        let command = match key.code {
            KeyCode::Esc => FindCommand::CloseReplace,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                *field = match *field {
                    ReplaceField::Find => ReplaceField::Replace,
                    ReplaceField::Replace => ReplaceField::Find,
                };
                return;
            }
            KeyCode::Backspace => {
                active.pop();
                return;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                active.push(c);
                return;
            }
            KeyCode::Enter => match field {
                ReplaceField::Find => FindCommand::ReplaceFindNext {
                    pattern: find.clone(),
                },
                ReplaceField::Replace => FindCommand::ReplaceAndFind {
                    replacement: replace.clone(),
                },
            },
            _ => return,
        };

        if command == FindCommand::CloseReplace {
            self.mode = InputMode::Normal;
        }
        if let Some(CommandResult::Replace(outcome)) = self.run(Command::Find(command)) {
            match outcome {
                ReplaceOutcome::Found(_) => self.status = "Replaced".to_string(),
                ReplaceOutcome::NoActiveSelection { .. } => {
                    self.status = "Nothing selected to replace".to_string();
                }
                // The not-found notice already set the message.
                ReplaceOutcome::NotFound => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // menu bar
                Constraint::Min(1),    // panes
                Constraint::Length(1), // status line
                Constraint::Length(1), // message / prompt line
            ])
            .split(area);

        self.render_menu(frame, chunks[0]);
        let caret = self.render_panes(frame, chunks[1]);
        self.render_status_line(frame, chunks[2]);
        let prompt_cursor = self.render_message_line(frame, chunks[3]);

        let cursor = match &self.mode {
            InputMode::Normal => caret,
            InputMode::Prompt { .. } => prompt_cursor,
            InputMode::Replace { .. } => self.render_replace_dialog(frame, area),
            InputMode::Help => {
                render_help(frame, area);
                None
            }
            InputMode::ConfirmDiscard(_) => None,
        };
        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect) {
        let editor = self.executor.editor();
        let flags = format!(
            " [{}lines] [{}wrap]",
            if editor.line_numbers() { "x" } else { " " },
            if editor.word_wrap() { "x" } else { " " },
        );
        let menu = Paragraph::new(Line::from(vec![
            Span::raw(help::MENU_HINT),
            Span::raw(flags),
        ]))
        .style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(menu, area);
    }

    fn render_panes(&mut self, frame: &mut Frame, area: Rect) -> Option<(u16, u16)> {
        let editor = self.executor.editor();
        let surfaces: &[SurfaceId] = if editor.is_split_open() {
            &[SurfaceId::Primary, SurfaceId::Split]
        } else {
            &[SurfaceId::Primary]
        };
        let areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, surfaces.len() as u32); surfaces.len()])
            .split(area);

        let mut caret = None;
        for (&surface, &pane_area) in surfaces.iter().zip(areas.iter()) {
            let focused = editor.focused() == surface;
            let position = view::render_pane(
                frame,
                pane_area,
                editor,
                surface,
                &mut self.panes[pane_index(surface)],
                self.flash.as_ref(),
                focused,
            );
            if focused {
                caret = position;
                self.page_rows = pane_area.height.saturating_sub(2).max(1) as usize;
            }
        }
        caret
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let editor = self.executor.editor();
        let doc = editor.document();
        let caret = editor.focused_caret();
        let line = doc.char_to_line(caret);
        let column = caret - doc.line_to_char(line);
        let view = match editor.focused() {
            SurfaceId::Primary => "",
            SurfaceId::Split => " | split",
        };
        let text = format!(
            "{} | Ln {}, Col {} | {} lines{}",
            editor.title(),
            line + 1,
            column + 1,
            doc.line_count(),
            view
        );
        let status = Paragraph::new(text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status, area);
    }

    fn render_message_line(&self, frame: &mut Frame, area: Rect) -> Option<(u16, u16)> {
        let (text, cursor) = match &self.mode {
            InputMode::Prompt { kind, input } => {
                let text = format!("{}{}", kind.label(), input);
                let x = view_width(&text);
                (text, Some((area.x + x.min(area.width.saturating_sub(1)), area.y)))
            }
            InputMode::ConfirmDiscard(_) => (
                "Unsaved changes. Save them first? (y)es / (n)o / Esc cancel".to_string(),
                None,
            ),
            _ => (self.status.clone(), None),
        };
        frame.render_widget(Paragraph::new(text), area);
        cursor
    }

    fn render_replace_dialog(&self, frame: &mut Frame, area: Rect) -> Option<(u16, u16)> {
        let InputMode::Replace {
            find,
            replace,
            field,
        } = &self.mode
        else {
            return None;
        };
        let dialog = centered_rect(60, 5, area);
        let active = Style::default().add_modifier(Modifier::BOLD);
        let (find_style, replace_style) = match field {
            ReplaceField::Find => (active, Style::default()),
            ReplaceField::Replace => (Style::default(), active),
        };
        let lines = vec![
            Line::from(vec![Span::styled("Find:    ", find_style), Span::raw(find.as_str())]),
            Line::from(vec![
                Span::styled("Replace: ", replace_style),
                Span::raw(replace.as_str()),
            ]),
            Line::from(Span::styled(
                "Enter: find next / replace  Tab: switch  Esc: close",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Clear, dialog);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Replace ")),
            dialog,
        );

        let (row, text) = match field {
            ReplaceField::Find => (0, find),
            ReplaceField::Replace => (1, replace),
        };
        let x = dialog.x + 1 + 9 + view_width(text);
        Some((x.min(dialog.right().saturating_sub(2)), dialog.y + 1 + row))
    }
}

fn view_width(text: &str) -> u16 {
    text.chars().map(view::char_cells).sum::<usize>() as u16
}

fn render_help(frame: &mut Frame, area: Rect) {
    let rows = help::help_rows();
    let popup = centered_rect(50, rows.len() as u16 + 2, area);
    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Shortcuts (any key closes) "),
        ),
        popup,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
