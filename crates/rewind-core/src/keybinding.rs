#![forbid(unsafe_code)]

//! Undo/redo keybinding resolution.
//!
//! Maps raw [`KeyEvent`]s to a [`HistoryAction`]. The mapper is pure: it
//! holds no history and no timing state, so a keyboard loop can call it on
//! every key and forward only the hits.
//!
//! # Default Bindings
//!
//! | Key | Action |
//! |-----|--------|
//! | Ctrl+Z | Undo |
//! | Ctrl+Y | Redo |
//! | Ctrl+Shift+Z | Redo |
//!
//! Letter case is ignored. When Ctrl+Shift+Z is not configured as a redo
//! chord it falls back to undo, the same as a bare Ctrl+Z.
//!
//! # Example
//!
//! ```
//! use rewind_core::event::KeyEvent;
//! use rewind_core::keybinding::{HistoryAction, HistoryKeymap};
//!
//! let keymap = HistoryKeymap::with_defaults();
//! assert_eq!(keymap.map(&KeyEvent::ctrl_char('z')), Some(HistoryAction::Undo));
//! assert_eq!(keymap.map(&KeyEvent::ctrl_char('y')), Some(HistoryAction::Redo));
//! ```

use crate::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

/// Direction a resolved gesture asks the history to move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryAction {
    /// Step backward (apply the inverse of the latest command).
    Undo,
    /// Step forward (re-apply the latest undone command).
    Redo,
}

/// Which chord(s) trigger redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RedoChord {
    /// Ctrl+Y only.
    CtrlY,
    /// Ctrl+Shift+Z only.
    CtrlShiftZ,
    /// Both Ctrl+Y and Ctrl+Shift+Z.
    #[default]
    Both,
}

impl RedoChord {
    /// Parse from string (environment variable value).
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ctrl-y" | "ctrl+y" | "y" => Some(Self::CtrlY),
            "ctrl-shift-z" | "ctrl+shift+z" | "shift-z" => Some(Self::CtrlShiftZ),
            "both" | "all" => Some(Self::Both),
            _ => None,
        }
    }

    const fn accepts_ctrl_y(self) -> bool {
        matches!(self, Self::CtrlY | Self::Both)
    }

    const fn accepts_ctrl_shift_z(self) -> bool {
        matches!(self, Self::CtrlShiftZ | Self::Both)
    }
}

/// Configuration for undo/redo key resolution.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `REWIND_REDO_CHORD` | string | "both" | `ctrl-y`, `ctrl-shift-z` or `both` |
/// | `REWIND_KEY_REPEAT` | bool | false | Let held keys repeat undo/redo |
#[derive(Debug, Clone, Default)]
pub struct KeymapConfig {
    /// Chord(s) that trigger redo.
    pub redo_chord: RedoChord,

    /// Whether auto-repeat events (key held down) trigger further steps.
    /// Default: false.
    pub allow_repeat: bool,
}

impl KeymapConfig {
    /// Set the redo chord.
    #[must_use]
    pub fn with_redo_chord(mut self, chord: RedoChord) -> Self {
        self.redo_chord = chord;
        self
    }

    /// Allow or ignore auto-repeat events.
    #[must_use]
    pub fn with_repeat(mut self, allow: bool) -> Self {
        self.allow_repeat = allow;
        self
    }

    /// Load config from environment variables.
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = var("REWIND_REDO_CHORD")
            && let Some(chord) = RedoChord::from_str_opt(&val)
        {
            config.redo_chord = chord;
        }

        if let Some(val) = var("REWIND_KEY_REPEAT") {
            config.allow_repeat = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config
    }
}

/// Resolves key events to undo/redo actions.
#[derive(Debug, Clone, Default)]
pub struct HistoryKeymap {
    config: KeymapConfig,
}

impl HistoryKeymap {
    /// Create a keymap with the given configuration.
    #[must_use]
    pub fn new(config: KeymapConfig) -> Self {
        Self { config }
    }

    /// Create a keymap with the default bindings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(KeymapConfig::default())
    }

    /// Create a keymap loading config from environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(KeymapConfig::from_env())
    }

    /// Map a key event to a history action.
    ///
    /// Returns `None` for keys that are not an undo/redo gesture. Releases
    /// never map; repeats map only when enabled. Alt or Super held alongside
    /// Ctrl disqualifies the chord.
    #[must_use]
    pub fn map(&self, event: &KeyEvent) -> Option<HistoryAction> {
        match event.kind {
            KeyEventKind::Press => {}
            KeyEventKind::Repeat if self.config.allow_repeat => {}
            _ => return None,
        }

        if !event.ctrl() || event.modifiers.intersects(Modifiers::ALT | Modifiers::SUPER) {
            return None;
        }

        let KeyCode::Char(c) = event.code else {
            return None;
        };

        let action = match c.to_ascii_lowercase() {
            'z' if event.shift() && self.config.redo_chord.accepts_ctrl_shift_z() => {
                Some(HistoryAction::Redo)
            }
            'z' => Some(HistoryAction::Undo),
            'y' if self.config.redo_chord.accepts_ctrl_y() => Some(HistoryAction::Redo),
            _ => None,
        };

        #[cfg(feature = "tracing")]
        if let Some(action) = action {
            tracing::trace!(
                target: "rewind.keymap",
                ?action,
                key = ?event.code,
                repeat = event.kind == KeyEventKind::Repeat,
                "history gesture resolved"
            );
        }

        action
    }

    /// Get a reference to the current configuration.
    #[must_use]
    pub fn config(&self) -> &KeymapConfig {
        &self.config
    }

    /// Update the configuration.
    pub fn set_config(&mut self, config: KeymapConfig) {
        self.config = config;
    }
}
