#![forbid(unsafe_code)]

//! Error taxonomy for the command history.
//!
//! Empty-history undo/redo is not an error; those calls return `Ok(None)`.

use std::fmt;

use crate::command::{CommandError, CommandId, Direction};

/// Errors returned by [`CommandHistory`](crate::CommandHistory) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// An id in the undo or redo sequence has no lookup-table row.
    ///
    /// Indicates a bug in the history or a collaborator that bypassed its
    /// public interface. The orphaned entry has been dropped.
    Integrity {
        /// The orphaned id.
        id: CommandId,
        /// The step that found it.
        direction: Direction,
    },
    /// Capacity must be at least 1.
    InvalidLimit {
        /// The rejected value.
        requested: usize,
    },
    /// A per-command or global callback failed; the command was not moved.
    Callback {
        /// The command being dispatched.
        id: CommandId,
        /// The step being dispatched.
        direction: Direction,
        /// What the callback reported.
        source: CommandError,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integrity { id, direction } => {
                write!(f, "{} of {} failed: no descriptor for id", direction, id)
            }
            Self::InvalidLimit { requested } => {
                write!(f, "history limit must be a positive integer, got {}", requested)
            }
            Self::Callback {
                id,
                direction,
                source,
            } => write!(f, "{} callback for {} failed: {}", direction, id, source),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Callback { source, .. } => Some(source),
            Self::Integrity { .. } | Self::InvalidLimit { .. } => None,
        }
    }
}
