//! Keyboard shortcuts.

/// One row of the F1 help table.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    pub keys: &'static str,
    pub action: &'static str,
}

pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut { keys: "Ctrl+F", action: "Find" },
    Shortcut { keys: "Ctrl+G", action: "Find all (flash every match)" },
    Shortcut { keys: "Ctrl+N", action: "Find next" },
    Shortcut { keys: "Ctrl+P", action: "Find previous" },
    Shortcut { keys: "Ctrl+R", action: "Find and replace" },
    Shortcut { keys: "Ctrl+X", action: "Cut" },
    Shortcut { keys: "Ctrl+C", action: "Copy" },
    Shortcut { keys: "Ctrl+V", action: "Paste" },
    Shortcut { keys: "Ctrl+Z", action: "Undo" },
    Shortcut { keys: "Ctrl+Shift+Z", action: "Redo" },
    Shortcut { keys: "Delete", action: "Delete" },
    Shortcut { keys: "Ctrl+L", action: "Toggle line numbers" },
    Shortcut { keys: "Ctrl+W", action: "Toggle word wrap" },
    Shortcut { keys: "Ctrl+O", action: "Open file" },
    Shortcut { keys: "Ctrl+S", action: "Save" },
    Shortcut { keys: "Ctrl+Shift+S", action: "Save as" },
    Shortcut { keys: "Ctrl+Shift+N", action: "New file" },
    Shortcut { keys: "F2", action: "Open / close split view" },
    Shortcut { keys: "F6", action: "Switch focus between views" },
    Shortcut { keys: "F1", action: "This help" },
    Shortcut { keys: "Ctrl+Q / Esc", action: "Quit" },
];

/// Help table rows, keys padded to a common width.
pub fn help_rows() -> Vec<String> {
    let width = SHORTCUTS.iter().map(|s| s.keys.len()).max().unwrap_or(0);
    SHORTCUTS
        .iter()
        .map(|s| format!("{:<width$}  {}", s.keys, s.action))
        .collect()
}

/// Short hint shown in the menu bar.
pub const MENU_HINT: &str =
    " File ^O ^S ^⇧S ^⇧N │ Edit ^Z ^⇧Z ^X ^C ^V │ Search ^F ^G ^N ^P ^R │ View ^L ^W F2 F6 │ Help F1 ";
