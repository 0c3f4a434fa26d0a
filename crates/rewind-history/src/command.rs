#![forbid(unsafe_code)]

//! Recorded commands and their callbacks.
//!
//! A [`Command`] is what a caller hands to
//! [`CommandHistory::record`](crate::CommandHistory::record): a payload value
//! plus optional undo/redo callbacks, an optional receiver ("context") and a
//! flag asking the triggering input event to skip its default behavior.
//!
//! Once recorded the command is split in two. The lightweight
//! [`HistoryEntry`] (id and value) travels between the undo and redo
//! sequences; the callbacks, context and flag stay in the history's lookup
//! table under the same [`CommandId`].
//!
//! # Invariants
//!
//! - Ids come from an [`IdGenerator`] owned by the history, never from the
//!   caller, and are unique for the lifetime of that history.
//! - Callbacks are shared (`Arc`), so resolving a descriptor never moves
//!   anything out of the lookup table.

use std::fmt;
use std::sync::Arc;

/// Opaque identity of a recorded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(u64);

impl CommandId {
    /// Create a command ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}", self.0)
    }
}

/// Source of fresh command ids.
///
/// Implementations should never hand out the same id twice to the history
/// that owns them. A repeated id that is still live is detected on record:
/// the older entry is dropped and an error is logged.
pub trait IdGenerator: Send {
    /// Produce the next unused id.
    fn next_id(&mut self) -> CommandId;
}

/// Monotonic id source: 1, 2, 3, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Start counting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Start counting at `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> CommandId {
        let id = CommandId(self.next);
        // u64 exhaustion is not reachable in practice; wrapping would break uniqueness.
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Undo or redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Walk backward through history.
    Undo,
    /// Walk forward through history.
    Redo,
}

impl Direction {
    /// Lowercase name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an undo/redo callback.
pub type CommandResult = Result<(), CommandError>;

/// Errors a callback can report.
///
/// The history does not interpret these; it stops the step, leaves the
/// command where it was and hands the error back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Whatever the callback operates on no longer exists.
    TargetNotFound(String),
    /// Command cannot be applied in current state.
    InvalidState(String),
    /// Generic error with message.
    Other(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound(what) => write!(f, "target not found: {}", what),
            Self::InvalidState(msg) => write!(f, "invalid state: {}", msg),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CommandError {}

/// A shared undo or redo callback.
///
/// Invoked with the command's context (receiver) and its value.
pub type Action<V, C> = Arc<dyn Fn(&C, &V) -> CommandResult + Send + Sync>;

/// A reversible action to record.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use rewind_history::Command;
///
/// let cmd: Command<String, Mutex<String>> = Command::new("hello".to_string())
///     .with_undo(|buf: &Mutex<String>, text: &String| {
///         let mut buf = buf.lock().unwrap();
///         let keep = buf.len() - text.len();
///         buf.truncate(keep);
///         Ok(())
///     })
///     .suppress_default(true);
/// assert!(cmd.suppresses_default());
/// ```
pub struct Command<V, C> {
    pub(crate) value: V,
    pub(crate) undo: Option<Action<V, C>>,
    pub(crate) redo: Option<Action<V, C>>,
    pub(crate) context: Option<Arc<C>>,
    pub(crate) suppress_default: bool,
}

impl<V, C> Command<V, C> {
    /// A command carrying `value` with no callbacks of its own.
    ///
    /// Without callbacks, undo/redo fall back to the history's global
    /// callbacks.
    #[must_use]
    pub fn new(value: V) -> Self {
        Self {
            value,
            undo: None,
            redo: None,
            context: None,
            suppress_default: false,
        }
    }

    /// Set the undo callback.
    #[must_use]
    pub fn with_undo<F>(mut self, f: F) -> Self
    where
        F: Fn(&C, &V) -> CommandResult + Send + Sync + 'static,
    {
        self.undo = Some(Arc::new(f));
        self
    }

    /// Set the redo callback.
    #[must_use]
    pub fn with_redo<F>(mut self, f: F) -> Self
    where
        F: Fn(&C, &V) -> CommandResult + Send + Sync + 'static,
    {
        self.redo = Some(Arc::new(f));
        self
    }

    /// Share an existing callback as the undo action.
    #[must_use]
    pub fn with_undo_action(mut self, action: Action<V, C>) -> Self {
        self.undo = Some(action);
        self
    }

    /// Share an existing callback as the redo action.
    #[must_use]
    pub fn with_redo_action(mut self, action: Action<V, C>) -> Self {
        self.redo = Some(action);
        self
    }

    /// Bind callbacks to `context` instead of the history's default.
    #[must_use]
    pub fn with_context(mut self, context: Arc<C>) -> Self {
        self.context = Some(context);
        self
    }

    /// Ask the triggering event to skip its default behavior when this
    /// command is undone or redone.
    #[must_use]
    pub fn suppress_default(mut self, suppress: bool) -> Self {
        self.suppress_default = suppress;
        self
    }

    /// The payload passed to callbacks.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Whether an undo callback is set.
    #[must_use]
    pub fn has_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Whether a redo callback is set.
    #[must_use]
    pub fn has_redo(&self) -> bool {
        self.redo.is_some()
    }

    /// Whether the triggering event's default behavior is suppressed.
    #[must_use]
    pub fn suppresses_default(&self) -> bool {
        self.suppress_default
    }
}

impl<V: fmt::Debug, C> fmt::Debug for Command<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("value", &self.value)
            .field("has_undo", &self.undo.is_some())
            .field("has_redo", &self.redo.is_some())
            .field("has_context", &self.context.is_some())
            .field("suppress_default", &self.suppress_default)
            .finish()
    }
}

/// The part of a command kept in the undo/redo sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry<V> {
    id: CommandId,
    value: V,
}

impl<V> HistoryEntry<V> {
    pub(crate) fn new(id: CommandId, value: V) -> Self {
        Self { id, value }
    }

    /// The command's identity.
    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// The command's payload.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// Lookup-table row: everything about a command except its value.
pub(crate) struct Descriptor<V, C> {
    pub(crate) undo: Option<Action<V, C>>,
    pub(crate) redo: Option<Action<V, C>>,
    pub(crate) context: Option<Arc<C>>,
    pub(crate) suppress_default: bool,
}

impl<V, C> Descriptor<V, C> {
    /// The per-command callback for `direction`, if any.
    pub(crate) fn action(&self, direction: Direction) -> Option<&Action<V, C>> {
        match direction {
            Direction::Undo => self.undo.as_ref(),
            Direction::Redo => self.redo.as_ref(),
        }
    }
}

impl<V, C> Command<V, C> {
    /// Split into the sequence entry and the lookup-table row.
    pub(crate) fn split(self, id: CommandId) -> (HistoryEntry<V>, Descriptor<V, C>) {
        let Self {
            value,
            undo,
            redo,
            context,
            suppress_default,
        } = self;
        (
            HistoryEntry::new(id, value),
            Descriptor {
                undo,
                redo,
                context,
                suppress_default,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_id_roundtrip() {
        let id = CommandId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "cmd-42");
    }

    #[test]
    fn sequential_ids_are_unique() {
        let mut ids = SequentialIds::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
        assert_eq!(c.raw(), 3);
    }

    #[test]
    fn sequential_ids_custom_start() {
        let mut ids = SequentialIds::starting_at(1000);
        assert_eq!(ids.next_id(), CommandId::new(1000));
        assert_eq!(ids.next_id(), CommandId::new(1001));
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Undo.to_string(), "undo");
        assert_eq!(Direction::Redo.to_string(), "redo");
    }

    #[test]
    fn command_error_display() {
        assert_eq!(
            CommandError::TargetNotFound("row 3".into()).to_string(),
            "target not found: row 3"
        );
        assert_eq!(
            CommandError::InvalidState("locked".into()).to_string(),
            "invalid state: locked"
        );
        assert_eq!(CommandError::Other("boom".into()).to_string(), "boom");
    }

    #[test]
    fn command_builder_defaults() {
        let cmd: Command<i32, ()> = Command::new(7);
        assert_eq!(*cmd.value(), 7);
        assert!(!cmd.has_undo());
        assert!(!cmd.has_redo());
        assert!(!cmd.suppresses_default());
    }

    #[test]
    fn command_builder_sets_everything() {
        let cmd: Command<i32, ()> = Command::new(1)
            .with_undo(|_, _| Ok(()))
            .with_redo(|_, _| Ok(()))
            .with_context(Arc::new(()))
            .suppress_default(true);
        assert!(cmd.has_undo());
        assert!(cmd.has_redo());
        assert!(cmd.suppresses_default());

        let debug = format!("{:?}", cmd);
        assert!(debug.contains("has_context: true"));
    }

    #[test]
    fn shared_action_is_reused() {
        let action: Action<i32, ()> = Arc::new(|_: &(), _: &i32| -> CommandResult { Ok(()) });
        let a: Command<i32, ()> = Command::new(1).with_undo_action(action.clone());
        let b: Command<i32, ()> = Command::new(2).with_redo_action(action.clone());
        assert!(a.has_undo());
        assert!(b.has_redo());
        assert_eq!(Arc::strong_count(&action), 3);
    }

    #[test]
    fn split_keeps_callbacks_by_direction() {
        let cmd: Command<&str, ()> = Command::new("v")
            .with_redo(|_, _| Err(CommandError::Other("redo".into())));
        let (entry, desc) = cmd.split(CommandId::new(9));
        assert_eq!(entry.id(), CommandId::new(9));
        assert_eq!(*entry.value(), "v");
        assert!(desc.action(Direction::Undo).is_none());
        let redo = desc.action(Direction::Redo).expect("redo callback");
        assert_eq!(redo(&(), entry.value()), Err(CommandError::Other("redo".into())));
    }
}
