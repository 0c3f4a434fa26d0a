#![forbid(unsafe_code)]

//! Property tests for [`CommandHistory`] invariants.
//!
//! Validates:
//! - Recording n commands with limit k < n keeps exactly the last k, in order.
//! - Every id in either sequence has a table row, and nothing else does.
//! - The undo and redo sequences never share an id.
//! - Undo depth never exceeds the limit right after a record.
//! - undo() then redo() restores both sequences exactly.
//! - Undo/redo on empty sequences never fires a callback.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use rewind_history::{Command, CommandHistory, CommandId, HistoryConfig, HistoryEntry};

type Calls = Mutex<Vec<(char, u32)>>;
type History = CommandHistory<u32, Calls>;

// ============================================================================
// Strategy helpers
// ============================================================================

/// Operations that can be performed on a CommandHistory.
#[derive(Debug, Clone)]
enum Op {
    Record(u32),
    Undo,
    Redo,
    SetLimit(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Record),
        3 => Just(Op::Undo),
        3 => Just(Op::Redo),
        1 => (1usize..12).prop_map(Op::SetLimit),
        1 => Just(Op::Clear),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..=max_len)
}

fn new_history(limit: usize) -> History {
    CommandHistory::new(HistoryConfig::new(limit), Arc::new(Mutex::new(Vec::new())))
        .expect("positive limit")
}

fn tracked(value: u32) -> Command<u32, Calls> {
    Command::new(value)
        .with_undo(|calls: &Calls, v: &u32| {
            calls.lock().unwrap().push(('u', *v));
            Ok(())
        })
        .with_redo(|calls: &Calls, v: &u32| {
            calls.lock().unwrap().push(('r', *v));
            Ok(())
        })
}

fn undo_ids(h: &History) -> Vec<CommandId> {
    h.undo_entries().rev().map(HistoryEntry::id).collect()
}

fn redo_ids(h: &History) -> Vec<CommandId> {
    h.redo_entries().rev().map(HistoryEntry::id).collect()
}

fn call_count(h: &History) -> usize {
    h.default_context().lock().unwrap().len()
}

fn assert_table_consistent(h: &History) -> Result<(), TestCaseError> {
    let undo: HashSet<CommandId> = undo_ids(h).into_iter().collect();
    let redo: HashSet<CommandId> = redo_ids(h).into_iter().collect();

    prop_assert!(undo.is_disjoint(&redo), "undo and redo share an id");
    prop_assert_eq!(h.tracked_count(), undo.len() + redo.len());
    for id in undo.iter().chain(redo.iter()) {
        prop_assert!(h.is_tracked(*id), "{} has no descriptor", id);
    }
    Ok(())
}

// ============================================================================
// Invariant 1: Capacity keeps the last k commands in order
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn capacity_keeps_last_k_in_order(
        values in prop::collection::vec(any::<u32>(), 1..60),
        limit in 1usize..20,
    ) {
        let mut h = new_history(limit);
        let mut ids = Vec::new();
        for v in &values {
            ids.push(h.record(tracked(*v)));
        }

        let keep = values.len().min(limit);
        let expected_ids = ids[ids.len() - keep..].to_vec();
        let expected_values = values[values.len() - keep..].to_vec();

        prop_assert_eq!(undo_ids(&h), expected_ids.clone());
        let kept_values: Vec<u32> = h.undo_entries().rev().map(|e| *e.value()).collect();
        prop_assert_eq!(kept_values, expected_values);
        prop_assert_eq!(h.tracked_count(), keep);
        for evicted in &ids[..ids.len() - keep] {
            prop_assert!(!h.is_tracked(*evicted));
        }
        prop_assert_eq!(call_count(&h), 0, "record must not fire callbacks");
    }
}

// ============================================================================
// Invariant 2: Table and sequences stay consistent under any op sequence
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn table_consistent_after_any_sequence(
        limit in 1usize..12,
        ops in ops_strategy(120),
    ) {
        let mut h = new_history(limit);

        for op in &ops {
            match op {
                Op::Record(v) => {
                    h.record(tracked(*v));
                    prop_assert!(
                        h.undo_depth() <= h.limit(),
                        "undo_depth {} exceeds limit {} after record",
                        h.undo_depth(), h.limit()
                    );
                }
                Op::Undo => {
                    let before = (h.undo_depth(), h.redo_depth());
                    let dispatched = h.undo().expect("callbacks never fail here");
                    if before.0 == 0 {
                        prop_assert!(dispatched.is_none());
                        prop_assert_eq!((h.undo_depth(), h.redo_depth()), before);
                    } else {
                        prop_assert_eq!(h.undo_depth(), before.0 - 1);
                        prop_assert_eq!(h.redo_depth(), before.1 + 1);
                    }
                }
                Op::Redo => {
                    let before = (h.undo_depth(), h.redo_depth());
                    let dispatched = h.redo().expect("callbacks never fail here");
                    if before.1 == 0 {
                        prop_assert!(dispatched.is_none());
                        prop_assert_eq!((h.undo_depth(), h.redo_depth()), before);
                    } else {
                        prop_assert_eq!(h.redo_depth(), before.1 - 1);
                        prop_assert_eq!(h.undo_depth(), before.0 + 1);
                    }
                }
                Op::SetLimit(n) => {
                    let depth = h.undo_depth();
                    h.set_limit(*n).expect("positive limit");
                    prop_assert_eq!(h.undo_depth(), depth, "limit changes are lazy");
                }
                Op::Clear => {
                    h.clear();
                    prop_assert!(!h.has_undo());
                    prop_assert!(!h.has_redo());
                }
            }
            assert_table_consistent(&h)?;
        }
    }
}

// ============================================================================
// Invariant 3: undo() then redo() is a round trip
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_then_redo_restores_sequences(
        values in prop::collection::vec(any::<u32>(), 1..30),
        pre_undos in 0usize..10,
    ) {
        let mut h = new_history(64);
        for v in &values {
            h.record(tracked(*v));
        }
        for _ in 0..pre_undos.min(values.len() - 1) {
            h.undo().unwrap();
        }

        let undo_before = undo_ids(&h);
        let redo_before = redo_ids(&h);
        let calls_before = call_count(&h);

        let top = *h.peek_undo().expect("at least one undo entry").value();
        h.undo().unwrap();
        h.redo().unwrap();

        prop_assert_eq!(undo_ids(&h), undo_before);
        prop_assert_eq!(redo_ids(&h), redo_before);

        let calls = h.default_context().lock().unwrap().clone();
        prop_assert_eq!(&calls[calls_before..], &[('u', top), ('r', top)][..]);
    }
}

// ============================================================================
// Invariant 4: Empty undo/redo is a silent no-op
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn empty_steps_fire_nothing(repeats in 1usize..20, records in 0usize..5) {
        let mut h = new_history(8);
        for v in 0..records {
            h.record(tracked(v as u32));
        }
        // Drain undo, then hammer the empty side.
        for _ in 0..records {
            h.undo().unwrap();
        }
        let calls_before = call_count(&h);
        let redo_before = redo_ids(&h);

        for _ in 0..repeats {
            prop_assert!(h.undo().unwrap().is_none());
        }
        prop_assert_eq!(call_count(&h), calls_before);
        prop_assert_eq!(redo_ids(&h), redo_before);
        prop_assert_eq!(h.tracked_count(), records);
    }
}

// ============================================================================
// Invariant 5: Eviction always removes the first-recorded command
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn eviction_removes_first_recorded(limit in 1usize..16) {
        let mut h = new_history(limit);
        let ids: Vec<CommandId> = (0..=limit as u32).map(|v| h.record(tracked(v))).collect();

        prop_assert!(!h.is_tracked(ids[0]));
        for id in &ids[1..] {
            prop_assert!(h.is_tracked(*id));
        }
    }
}
