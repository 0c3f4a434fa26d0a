#![forbid(unsafe_code)]

//! Keyboard wiring for a [`CommandHistory`].
//!
//! [`KeyListener`] is what a host event loop calls for every key press. It
//! resolves the key through a [`HistoryKeymap`] and forwards hits to
//! [`CommandHistory::trigger_undo`] / [`CommandHistory::trigger_redo`].
//! Keys that are not an undo/redo gesture pass through untouched.
//!
//! ```
//! use std::sync::Arc;
//! use rewind_core::event::{KeyEvent, KeyPress, PreventDefault};
//! use rewind_history::{Command, CommandHistory, HistoryConfig, KeyListener};
//!
//! let mut history: CommandHistory<u32, ()> =
//!     CommandHistory::new(HistoryConfig::default(), Arc::new(())).unwrap();
//! history.record(Command::new(1).suppress_default(true));
//!
//! let listener = KeyListener::with_defaults();
//! let mut press = KeyPress::new(KeyEvent::ctrl_char('z'));
//! let dispatch = listener.handle(&mut history, &mut press).unwrap();
//!
//! assert!(dispatch.is_some());
//! assert!(press.is_default_prevented());
//! assert!(history.has_redo());
//! ```

use rewind_core::event::KeyPress;
use rewind_core::keybinding::{HistoryAction, HistoryKeymap};

use crate::error::HistoryError;
use crate::history::{CommandHistory, Dispatch};

/// Routes key presses to a command history.
#[derive(Debug, Clone, Default)]
pub struct KeyListener {
    keymap: HistoryKeymap,
}

impl KeyListener {
    /// Create a listener with the given keymap.
    #[must_use]
    pub fn new(keymap: HistoryKeymap) -> Self {
        Self { keymap }
    }

    /// Create a listener with the default bindings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(HistoryKeymap::with_defaults())
    }

    /// Create a listener whose keymap is loaded from environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(HistoryKeymap::from_env())
    }

    /// Handle one key press.
    ///
    /// Returns `Ok(None)` both for keys that are not undo/redo gestures and
    /// for gestures on an empty history.
    pub fn handle<V, C>(
        &self,
        history: &mut CommandHistory<V, C>,
        press: &mut KeyPress,
    ) -> Result<Option<Dispatch>, HistoryError> {
        match self.keymap.map(&press.event) {
            Some(HistoryAction::Undo) => history.trigger_undo(press),
            Some(HistoryAction::Redo) => history.trigger_redo(press),
            None => Ok(None),
        }
    }

    /// The keymap in use.
    #[must_use]
    pub fn keymap(&self) -> &HistoryKeymap {
        &self.keymap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, Direction};
    use crate::config::HistoryConfig;
    use rewind_core::event::{KeyCode, KeyEvent, Modifiers, PreventDefault};
    use rewind_core::keybinding::{KeymapConfig, RedoChord};
    use std::sync::Arc;

    fn history() -> CommandHistory<u32, ()> {
        CommandHistory::new(HistoryConfig::new(8), Arc::new(())).unwrap()
    }

    #[test]
    fn ctrl_z_then_ctrl_y() {
        let listener = KeyListener::with_defaults();
        let mut h = history();
        let id = h.record(Command::new(1));

        let mut press = KeyPress::new(KeyEvent::ctrl_char('z'));
        let undo = listener.handle(&mut h, &mut press).unwrap().unwrap();
        assert_eq!(undo.id, id);
        assert_eq!(undo.direction, Direction::Undo);

        let mut press = KeyPress::new(KeyEvent::ctrl_char('y'));
        let redo = listener.handle(&mut h, &mut press).unwrap().unwrap();
        assert_eq!(redo.direction, Direction::Redo);
        assert!(h.has_undo());
        assert!(!h.has_redo());
    }

    #[test]
    fn ctrl_shift_z_redoes() {
        let listener = KeyListener::with_defaults();
        let mut h = history();
        h.record(Command::new(1));
        h.undo().unwrap();

        let key =
            KeyEvent::new(KeyCode::Char('Z')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        let dispatch = listener
            .handle(&mut h, &mut KeyPress::new(key))
            .unwrap()
            .unwrap();
        assert_eq!(dispatch.direction, Direction::Redo);
    }

    #[test]
    fn unmapped_key_passes_through() {
        let listener = KeyListener::with_defaults();
        let mut h = history();
        h.record(Command::new(1).suppress_default(true));

        let mut press = KeyPress::new(KeyEvent::new(KeyCode::Char('z')));
        assert_eq!(listener.handle(&mut h, &mut press), Ok(None));
        assert!(!press.is_default_prevented());
        assert_eq!(h.undo_depth(), 1);
    }

    #[test]
    fn custom_keymap_is_honored() {
        let keymap =
            HistoryKeymap::new(KeymapConfig::default().with_redo_chord(RedoChord::CtrlShiftZ));
        let listener = KeyListener::new(keymap);
        let mut h = history();
        h.record(Command::new(1));
        h.undo().unwrap();

        let mut press = KeyPress::new(KeyEvent::ctrl_char('y'));
        assert_eq!(listener.handle(&mut h, &mut press), Ok(None));
        assert!(h.has_redo());
        assert_eq!(listener.keymap().config().redo_chord, RedoChord::CtrlShiftZ);
    }
}
