#![warn(missing_docs)]
//! Textpad Core - headless kernel of a small plain-text editor
//!
//! # Overview
//!
//! `textpad-core` holds everything of the editor that is not drawing: the text buffer, the
//! caret of each editing surface, literal find / find-all / find-and-replace, the transient
//! match highlighting of find-all, undo/redo, the file session (open, save, dirty state) and
//! the command dispatcher a frontend drives.
//!
//! Offsets are character (Unicode scalar value) offsets throughout. Search is literal and
//! case-sensitive.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Interface (CommandExecutor)        │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  ReplaceCoordinator + SearchSession         │  ← Dialog state
//! ├─────────────────────────────────────────────┤
//! │  Editor (surfaces, undo, file session)      │  ← Editing state
//! ├─────────────────────────────────────────────┤
//! │  Search engine + HighlightMask              │  ← Matching
//! ├─────────────────────────────────────────────┤
//! │  Document (rope-based)                      │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use textpad_core::{Command, CommandExecutor, CommandResult, FindCommand, ReplaceOutcome};
//!
//! let mut executor = CommandExecutor::new("foo foo foo");
//!
//! executor
//!     .execute(Command::Find(FindCommand::ReplaceFindNext { pattern: "foo".to_string() }))
//!     .unwrap();
//! let result = executor
//!     .execute(Command::Find(FindCommand::ReplaceAndFind { replacement: "bar".to_string() }))
//!     .unwrap();
//!
//! assert_eq!(executor.editor().text(), "bar foo foo");
//! assert!(matches!(result, CommandResult::Replace(ReplaceOutcome::Found(_))));
//! ```
//!
//! # Module Description
//!
//! - [`search`] - literal forward / backward / find-all search
//! - [`highlight`] - per-character match markers
//! - [`document`] - text buffer, selection, file I/O
//! - [`editor`] - surfaces, carets, notices, file session
//! - [`replace`] - find-and-replace dialog sequencing
//! - [`session`] - last search pattern and replacement
//! - [`commands`] - unified command interface
//! - [`config`] - startup configuration

pub mod commands;
pub mod config;
pub mod document;
pub mod editor;
pub mod highlight;
pub mod replace;
pub mod search;
pub mod session;
mod undo;

pub use commands::{
    Command, CommandError, CommandExecutor, CommandResult, CursorCommand, EditCommand,
    FileCommand, FindCommand, ViewCommand,
};
pub use config::{ConfigError, EditorConfig};
pub use document::{ChangeCallback, Document, DocumentError, FileError, TextChange};
pub use editor::{CaretMotion, Editor, Notice, SaveStatus, SurfaceId, UNTITLED};
pub use highlight::{HighlightMask, MatchStyle};
pub use replace::{ReplaceCoordinator, ReplaceOutcome, ReplaceState};
pub use search::{MatchList, SearchDirection, SearchMatch};
pub use session::{DEFAULT_MAX_PATTERN_LEN, SearchSession};
pub use undo::DEFAULT_UNDO_LIMIT;
