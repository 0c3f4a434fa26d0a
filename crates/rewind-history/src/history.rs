#![forbid(unsafe_code)]

//! Bounded undo/redo command history.
//!
//! This module provides the [`CommandHistory`] which maintains dual
//! sequences for undo and redo plus a lookup table from command id to its
//! callbacks:
//!
//! - **Capacity limit**: Oldest undo entries evicted on record
//! - **Directional dispatch**: Per-command callback first, then the global one
//! - **Stable identity**: An entry keeps its id across any number of undo/redo
//!   transfers
//!
//! # Invariants
//!
//! 1. Every id in either sequence has exactly one lookup-table row
//! 2. The undo and redo sequences are disjoint
//! 3. `undo_stack.len() <= config.limit` after every `record()`
//! 4. Eviction only removes the front of the undo sequence, so redo entries
//!    are never evicted
//!
//! # Memory Model
//!
//! Entries are stored in `VecDeque` for O(1) eviction from the front.
//!
//! ```text
//! record(A, B, C) with limit = 2
//! ┌───────────────────────────────────────────────┐
//! │ Undo: [B, C]    Redo: []     Table: {B, C}    │
//! └───────────────────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────────────────┐
//! │ Undo: []        Redo: [C, B] Table: {B, C}    │
//! └───────────────────────────────────────────────┘
//!
//! redo()
//! ┌───────────────────────────────────────────────┐
//! │ Undo: [B]       Redo: [C]    Table: {B, C}    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Failure Modes
//!
//! - **Callback error**: the step stops at the failing callback and the entry
//!   stays in the sequence it was taken from. A per-command callback that
//!   already ran is not rolled back.
//! - **Orphaned id**: an entry without a table row is dropped and reported
//!   as [`HistoryError::Integrity`]; no callback runs.
//!
//! # Re-entrancy
//!
//! Callbacks receive the context and the value, never the history, and
//! every mutating operation takes `&mut self`. A callback therefore cannot
//! re-enter the history it is being dispatched from.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use rewind_core::event::PreventDefault;

use crate::command::{
    Action, Command, CommandId, CommandResult, Descriptor, Direction, HistoryEntry, IdGenerator,
    SequentialIds,
};
use crate::config::{HistoryConfig, validate_limit};
use crate::error::HistoryError;

/// Outcome of a successful undo or redo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// The command that moved.
    pub id: CommandId,
    /// Which way it moved.
    pub direction: Direction,
    /// Whether the command asked for the trigger's default to be suppressed.
    pub suppress_default: bool,
    /// Number of callbacks invoked (0, 1 or 2).
    pub callbacks_invoked: usize,
}

/// Undo/redo history of recorded commands.
///
/// `V` is the payload handed to callbacks, `C` the receiver ("context")
/// they are bound to. Commands without their own context are bound to the
/// default context supplied at construction.
pub struct CommandHistory<V, C> {
    /// Entries available for undo (newest at back).
    undo_stack: VecDeque<HistoryEntry<V>>,
    /// Entries available for redo (newest at back).
    redo_stack: VecDeque<HistoryEntry<V>>,
    /// Callbacks, context and flags for every live id.
    table: AHashMap<CommandId, Descriptor<V, C>>,
    config: HistoryConfig,
    ids: Box<dyn IdGenerator>,
    global_undo: Option<Action<V, C>>,
    global_redo: Option<Action<V, C>>,
    default_context: Arc<C>,
}

impl<V, C> fmt::Debug for CommandHistory<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("tracked", &self.table.len())
            .field("has_global_undo", &self.global_undo.is_some())
            .field("has_global_redo", &self.global_redo.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl<V, C> CommandHistory<V, C> {
    /// Create an empty history.
    ///
    /// Fails with [`HistoryError::InvalidLimit`] if `config.limit` is 0.
    pub fn new(config: HistoryConfig, default_context: Arc<C>) -> Result<Self, HistoryError> {
        config.validate()?;
        Ok(Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            table: AHashMap::new(),
            config,
            ids: Box::new(SequentialIds::new()),
            global_undo: None,
            global_redo: None,
            default_context,
        })
    }

    /// Set the global undo callback.
    ///
    /// Runs on every undo step, after the command's own undo callback.
    #[must_use]
    pub fn with_global_undo<F>(mut self, f: F) -> Self
    where
        F: Fn(&C, &V) -> CommandResult + Send + Sync + 'static,
    {
        self.global_undo = Some(Arc::new(f));
        self
    }

    /// Set the global redo callback.
    ///
    /// Runs on every redo step, after the command's own redo callback.
    #[must_use]
    pub fn with_global_redo<F>(mut self, f: F) -> Self
    where
        F: Fn(&C, &V) -> CommandResult + Send + Sync + 'static,
    {
        self.global_redo = Some(Arc::new(f));
        self
    }

    /// Replace the id source.
    ///
    /// Only call this on an empty history; ids already handed out by the
    /// previous generator are not known to the new one.
    #[must_use]
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Record a command onto the undo sequence.
    ///
    /// Assigns a fresh id, stores the callbacks in the lookup table and
    /// evicts the oldest undo entries while the sequence exceeds the limit.
    /// If the id generator hands out an id that is still live, the older
    /// entry is dropped from both sequences before the new one is stored.
    /// No callback fires; the command's effect is assumed to be applied
    /// already.
    pub fn record(&mut self, command: Command<V, C>) -> CommandId {
        let id = self.ids.next_id();

        if self.config.clear_redo_on_record {
            self.clear_redo();
        }

        if self.table.contains_key(&id) {
            self.undo_stack.retain(|entry| entry.id() != id);
            self.redo_stack.retain(|entry| entry.id() != id);
            tracing::error!(
                target: "rewind.history",
                id = %id,
                "id generator repeated a live id; older entry dropped"
            );
        }

        let (entry, descriptor) = command.split(id);
        self.table.insert(id, descriptor);
        self.undo_stack.push_back(entry);

        tracing::debug!(
            target: "rewind.history",
            id = %id,
            undo_depth = self.undo_stack.len(),
            "command recorded"
        );

        self.enforce_limit();
        id
    }

    /// Undo the most recent command.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(dispatch))` if the command moved to the redo sequence
    /// - `Ok(None)` if there is nothing to undo
    /// - `Err(error)` if a callback failed (command stays on the undo
    ///   sequence) or the entry had no descriptor
    pub fn undo(&mut self) -> Result<Option<Dispatch>, HistoryError> {
        self.step(Direction::Undo, None)
    }

    /// Redo the most recently undone command.
    ///
    /// Reads only the redo sequence; an empty redo sequence is a no-op even
    /// when undo entries exist.
    pub fn redo(&mut self) -> Result<Option<Dispatch>, HistoryError> {
        self.step(Direction::Redo, None)
    }

    /// Undo in response to an input event.
    ///
    /// Same as [`undo`](Self::undo), and calls
    /// [`PreventDefault::prevent_default`] on `event` when the command was
    /// recorded with `suppress_default`.
    pub fn trigger_undo<E: PreventDefault>(
        &mut self,
        event: &mut E,
    ) -> Result<Option<Dispatch>, HistoryError> {
        self.step(Direction::Undo, Some(event))
    }

    /// Redo in response to an input event.
    pub fn trigger_redo<E: PreventDefault>(
        &mut self,
        event: &mut E,
    ) -> Result<Option<Dispatch>, HistoryError> {
        self.step(Direction::Redo, Some(event))
    }

    /// Check if undo is available.
    #[must_use]
    pub fn has_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn has_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Get the undo sequence length.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the redo sequence length.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Current undo capacity.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.config.limit
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// The receiver used for commands recorded without a context.
    #[must_use]
    pub fn default_context(&self) -> &Arc<C> {
        &self.default_context
    }

    /// The entry the next undo would dispatch.
    #[must_use]
    pub fn peek_undo(&self) -> Option<&HistoryEntry<V>> {
        self.undo_stack.back()
    }

    /// The entry the next redo would dispatch.
    #[must_use]
    pub fn peek_redo(&self) -> Option<&HistoryEntry<V>> {
        self.redo_stack.back()
    }

    /// Undo entries, most recent first.
    pub fn undo_entries(
        &self,
    ) -> impl DoubleEndedIterator<Item = &HistoryEntry<V>> + ExactSizeIterator {
        self.undo_stack.iter().rev()
    }

    /// Redo entries, most recent first.
    pub fn redo_entries(
        &self,
    ) -> impl DoubleEndedIterator<Item = &HistoryEntry<V>> + ExactSizeIterator {
        self.redo_stack.iter().rev()
    }

    /// Whether `id` still has a lookup-table row.
    #[must_use]
    pub fn is_tracked(&self, id: CommandId) -> bool {
        self.table.contains_key(&id)
    }

    /// Number of lookup-table rows.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.table.len()
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Clear all history (undo, redo and the lookup table).
    ///
    /// No callbacks fire.
    pub fn clear(&mut self) {
        tracing::debug!(
            target: "rewind.history",
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history cleared"
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.table.clear();
    }

    /// Change the undo capacity.
    ///
    /// Rejects 0 and leaves the history untouched. A lower limit is enforced
    /// on the next [`record`](Self::record) unless `trim_on_shrink` is set,
    /// in which case surplus entries are evicted now.
    pub fn set_limit(&mut self, limit: usize) -> Result<(), HistoryError> {
        validate_limit(limit)?;
        let previous = self.config.limit;
        self.config.limit = limit;

        tracing::debug!(
            target: "rewind.history",
            previous,
            limit,
            "history limit changed"
        );

        if self.config.trim_on_shrink {
            self.enforce_limit();
        }
        Ok(())
    }

    /// Clear only the redo sequence and its table rows.
    fn clear_redo(&mut self) {
        for entry in self.redo_stack.drain(..) {
            self.table.remove(&entry.id());
        }
    }

    /// Evict oldest undo entries until the limit holds.
    fn enforce_limit(&mut self) {
        while self.undo_stack.len() > self.config.limit {
            if let Some(entry) = self.undo_stack.pop_front() {
                self.table.remove(&entry.id());
                tracing::debug!(
                    target: "rewind.history",
                    id = %entry.id(),
                    limit = self.config.limit,
                    "command evicted"
                );
            }
        }
    }

    /// Dispatch the tail entry of the `direction` sequence and transfer it.
    fn step(
        &mut self,
        direction: Direction,
        event: Option<&mut dyn PreventDefault>,
    ) -> Result<Option<Dispatch>, HistoryError> {
        let sequence = match direction {
            Direction::Undo => &self.undo_stack,
            Direction::Redo => &self.redo_stack,
        };
        let Some(entry) = sequence.back() else {
            return Ok(None);
        };
        let id = entry.id();

        let _span = tracing::debug_span!(
            target: "rewind.history",
            "history.step",
            direction = %direction,
            id = %id,
        )
        .entered();

        let Some(descriptor) = self.table.get(&id) else {
            match direction {
                Direction::Undo => self.undo_stack.pop_back(),
                Direction::Redo => self.redo_stack.pop_back(),
            };
            tracing::error!(
                target: "rewind.history",
                id = %id,
                direction = %direction,
                "history entry has no descriptor"
            );
            return Err(HistoryError::Integrity { id, direction });
        };

        let suppress_default = descriptor.suppress_default;
        if suppress_default && let Some(event) = event {
            event.prevent_default();
        }

        let context = descriptor.context.as_ref().unwrap_or(&self.default_context);
        let global = match direction {
            Direction::Undo => self.global_undo.as_ref(),
            Direction::Redo => self.global_redo.as_ref(),
        };

        let mut callbacks_invoked = 0;
        for action in [descriptor.action(direction), global].into_iter().flatten() {
            if let Err(source) = action(&**context, entry.value()) {
                tracing::warn!(
                    target: "rewind.history",
                    id = %id,
                    direction = %direction,
                    error = %source,
                    "callback failed; command not moved"
                );
                return Err(HistoryError::Callback {
                    id,
                    direction,
                    source,
                });
            }
            callbacks_invoked += 1;
        }

        self.transfer(direction);

        tracing::debug!(
            target: "rewind.history",
            id = %id,
            direction = %direction,
            callbacks_invoked,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "command transferred"
        );

        Ok(Some(Dispatch {
            id,
            direction,
            suppress_default,
            callbacks_invoked,
        }))
    }

    /// Move the tail entry to the opposite sequence; the table row stays.
    fn transfer(&mut self, direction: Direction) {
        let (from, to) = match direction {
            Direction::Undo => (&mut self.undo_stack, &mut self.redo_stack),
            Direction::Redo => (&mut self.redo_stack, &mut self.undo_stack),
        };
        if let Some(entry) = from.pop_back() {
            to.push_back(entry);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
