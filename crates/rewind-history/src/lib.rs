#![forbid(unsafe_code)]

//! Bounded undo/redo command history.
//!
//! Callers record reversible commands; an undo/redo gesture walks backward
//! and forward through them, invoking each command's callbacks (and the
//! history-wide fallbacks) with the command's value and context.
//!
//! # Key Components
//!
//! - [`CommandHistory`] - Undo/redo sequences, capacity eviction, dispatch
//! - [`Command`] - Builder for a recorded command and its callbacks
//! - [`HistoryConfig`] - Capacity and record/shrink policy
//! - [`KeyListener`] - Routes Ctrl+Z / Ctrl+Y key presses to a history
//! - [`HistoryError`] - Integrity, limit and callback failures
//!
//! # Quick Start
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use rewind_history::{Command, CommandHistory, HistoryConfig};
//!
//! let doc = Arc::new(Mutex::new(String::from("hello")));
//! let mut history: CommandHistory<String, Mutex<String>> =
//!     CommandHistory::new(HistoryConfig::new(50), doc.clone()).unwrap();
//!
//! // The edit has already been applied; record how to reverse it.
//! doc.lock().unwrap().push_str(" world");
//! history.record(
//!     Command::new(" world".to_string())
//!         .with_undo(|doc: &Mutex<String>, text: &String| {
//!             let mut doc = doc.lock().unwrap();
//!             let keep = doc.len() - text.len();
//!             doc.truncate(keep);
//!             Ok(())
//!         })
//!         .with_redo(|doc: &Mutex<String>, text: &String| {
//!             doc.lock().unwrap().push_str(text);
//!             Ok(())
//!         }),
//! );
//!
//! history.undo().unwrap();
//! assert_eq!(*doc.lock().unwrap(), "hello");
//! history.redo().unwrap();
//! assert_eq!(*doc.lock().unwrap(), "hello world");
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod trigger;

pub use command::{
    Action, Command, CommandError, CommandId, CommandResult, Direction, HistoryEntry, IdGenerator,
    SequentialIds,
};
pub use config::{ConfigError, DEFAULT_LIMIT, HistoryConfig};
pub use error::HistoryError;
pub use history::{CommandHistory, Dispatch};
pub use trigger::KeyListener;
