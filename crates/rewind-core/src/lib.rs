#![forbid(unsafe_code)]

//! Core: input events and undo/redo key bindings.
//!
//! # Role in rewind
//! `rewind-core` is the input layer. It owns the normalized key event types
//! and the mapping from keyboard gestures to undo/redo actions. The history
//! engine (`rewind-history`) consumes these types but never listens to a
//! platform input source itself, so it can run headless.
//!
//! # Primary responsibilities
//! - **Event**: canonical key events and the [`PreventDefault`] capability
//!   of a triggering event.
//! - **Keybinding**: Ctrl+Z / Ctrl+Y / Ctrl+Shift+Z resolution.
//! - **Tracing** (feature `tracing`): resolved gestures are traced under the
//!   `rewind.keymap` target.
//! - **Logging** (feature `tracing-json`): optional JSON subscriber setup.

pub mod event;
pub mod keybinding;
#[cfg(feature = "tracing-json")]
pub mod logging;

pub use event::{KeyCode, KeyEvent, KeyEventKind, KeyPress, Modifiers, PreventDefault};
pub use keybinding::{HistoryAction, HistoryKeymap, KeymapConfig, RedoChord};
