use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use textpad_core::{
    CaretMotion, Command, CommandError, CommandExecutor, CommandResult, CursorCommand,
    EditCommand, EditorConfig, FileCommand, FindCommand, Notice, SurfaceId, TextChange,
    ViewCommand,
};

fn insert(text: &str) -> Command {
    Command::Edit(EditCommand::InsertText {
        text: text.to_string(),
    })
}

#[test]
fn test_open_edit_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "first line\nsecond line\n").unwrap();

    let mut executor = CommandExecutor::empty();
    executor
        .execute(Command::File(FileCommand::Open { path: path.clone() }))
        .unwrap();
    assert_eq!(executor.editor().title(), path.display().to_string());
    assert!(!executor.editor().is_modified());

    executor
        .execute(Command::Cursor(CursorCommand::Move(CaretMotion::DocumentEnd)))
        .unwrap();
    executor.execute(insert("third line\n")).unwrap();
    assert_eq!(executor.editor().title(), format!("{} *", path.display()));

    let result = executor.execute(Command::File(FileCommand::Save)).unwrap();
    assert_eq!(result, CommandResult::Success);
    assert!(!executor.editor().is_modified());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "first line\nsecond line\nthird line\n"
    );
}

#[test]
fn test_open_missing_file_reports_error_and_keeps_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.txt");
    let mut executor = CommandExecutor::new("unsaved work");

    let err = executor
        .execute(Command::File(FileCommand::Open { path: path.clone() }))
        .unwrap_err();
    assert!(matches!(err, CommandError::File(_)));
    assert_eq!(executor.editor().text(), "unsaved work");

    let notices = executor.editor_mut().take_notices();
    assert!(matches!(
        notices.as_slice(),
        [Notice::FileError { path: p, .. }] if *p == path
    ));
}

#[test]
fn test_save_as_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.txt");
    let mut executor = CommandExecutor::new("text");

    let err = executor
        .execute(Command::File(FileCommand::SaveAs { path }))
        .unwrap_err();
    assert!(matches!(err, CommandError::File(_)));
    assert_eq!(executor.editor().file_path(), None);
    assert_eq!(executor.editor().text(), "text");
}

#[test]
fn test_new_file_resets_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    let mut executor = CommandExecutor::new("");
    executor.execute(insert("abc")).unwrap();
    executor
        .execute(Command::File(FileCommand::SaveAs { path }))
        .unwrap();

    executor.execute(Command::File(FileCommand::New)).unwrap();
    assert_eq!(executor.editor().text(), "");
    assert_eq!(executor.editor().file_path(), None);
    assert_eq!(executor.editor().title(), "Untitled");
    assert_eq!(
        executor.execute(Command::File(FileCommand::Save)).unwrap(),
        CommandResult::NeedsFileName
    );
}

#[test]
fn test_search_moves_only_focused_caret() {
    let mut executor = CommandExecutor::new("alpha beta gamma beta");
    executor
        .execute_batch(vec![
            Command::View(ViewCommand::OpenSplit),
            Command::View(ViewCommand::Focus {
                surface: SurfaceId::Split,
            }),
        ])
        .unwrap();

    executor
        .execute(Command::Find(FindCommand::Find {
            pattern: "beta".to_string(),
        }))
        .unwrap();
    assert_eq!(executor.editor().caret(SurfaceId::Split), 10);
    assert_eq!(executor.editor().caret(SurfaceId::Primary), 0);

    executor
        .execute(Command::View(ViewCommand::Focus {
            surface: SurfaceId::Primary,
        }))
        .unwrap();
    let result = executor.execute(Command::Find(FindCommand::FindNext)).unwrap();
    // Primary caret is still at 0, so its search starts over.
    assert_eq!(result, CommandResult::SearchMatch { start: 6, end: 10 });
}

#[test]
fn test_edit_through_split_shifts_primary_caret() {
    let mut executor = CommandExecutor::new("hello world");
    executor
        .execute(Command::Cursor(CursorCommand::MoveTo { offset: 11 }))
        .unwrap();
    executor
        .execute_batch(vec![
            Command::View(ViewCommand::OpenSplit),
            Command::View(ViewCommand::Focus {
                surface: SurfaceId::Split,
            }),
            Command::Cursor(CursorCommand::MoveTo { offset: 0 }),
            Command::Cursor(CursorCommand::SetSelection { start: 0, end: 6 }),
            Command::Edit(EditCommand::DeleteSelection),
        ])
        .unwrap();

    assert_eq!(executor.editor().text(), "world");
    assert_eq!(executor.editor().caret(SurfaceId::Primary), 5);
    assert_eq!(executor.editor().caret(SurfaceId::Split), 0);
}

#[test]
fn test_change_subscribers_see_edits() {
    let changes: Arc<Mutex<Vec<TextChange>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);

    let mut executor = CommandExecutor::new("abc");
    executor.editor_mut().subscribe(move |change| {
        sink.lock().unwrap().push(*change);
    });

    executor.execute(insert("xy")).unwrap();
    executor.execute(Command::Edit(EditCommand::Backspace)).unwrap();
    // Nothing left of the caret at offset 0 after moving there: no change.
    executor
        .execute(Command::Cursor(CursorCommand::MoveTo { offset: 0 }))
        .unwrap();
    executor.execute(Command::Edit(EditCommand::Backspace)).unwrap();

    assert_eq!(
        *changes.lock().unwrap(),
        vec![
            TextChange {
                offset: 0,
                inserted: 2,
                deleted: 0
            },
            TextChange {
                offset: 1,
                inserted: 0,
                deleted: 1
            },
        ]
    );
}

#[test]
fn test_clipboard_commands() {
    let mut executor = CommandExecutor::new("copy me");
    assert_eq!(
        executor.execute(Command::Edit(EditCommand::Copy)).unwrap(),
        CommandResult::Success
    );

    executor
        .execute(Command::Cursor(CursorCommand::SetSelection { start: 0, end: 4 }))
        .unwrap();
    assert_eq!(
        executor.execute(Command::Edit(EditCommand::Cut)).unwrap(),
        CommandResult::Text("copy".to_string())
    );
    executor
        .execute(Command::Cursor(CursorCommand::Move(CaretMotion::DocumentEnd)))
        .unwrap();
    executor.execute(Command::Edit(EditCommand::Paste)).unwrap();
    assert_eq!(executor.editor().text(), " mecopy");
}

#[test]
fn test_view_toggles_start_from_config() {
    let config = EditorConfig {
        line_numbers: false,
        ..EditorConfig::default()
    };
    let mut executor = CommandExecutor::with_config("", &config);
    assert!(!executor.editor().line_numbers());
    assert!(executor.editor().word_wrap());

    executor
        .execute_batch(vec![
            Command::View(ViewCommand::ToggleLineNumbers),
            Command::View(ViewCommand::ToggleWordWrap),
        ])
        .unwrap();
    assert!(executor.editor().line_numbers());
    assert!(!executor.editor().word_wrap());
}
