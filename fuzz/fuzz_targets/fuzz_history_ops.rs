#![no_main]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rewind_core::event::{KeyCode, KeyEvent, KeyPress, Modifiers, PreventDefault};
use rewind_history::{
    Command, CommandError, CommandHistory, CommandId, HistoryConfig, HistoryEntry, HistoryError,
    KeyListener,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Record { value: u8, fail_undo: bool, suppress: bool },
    Undo,
    Redo,
    Key { c: u8, ctrl: bool, shift: bool },
    SetLimit(u8),
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    limit: u8,
    clear_redo_on_record: bool,
    trim_on_shrink: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let limit = usize::from(input.limit % 32).max(1);
    let config = HistoryConfig::new(limit)
        .with_clear_redo_on_record(input.clear_redo_on_record)
        .with_trim_on_shrink(input.trim_on_shrink);
    let calls = Arc::new(AtomicU32::new(0));
    let mut history: CommandHistory<u8, AtomicU32> =
        CommandHistory::new(config, calls.clone()).expect("limit >= 1");
    let listener = KeyListener::with_defaults();

    for op in input.ops.iter().take(512) {
        match op {
            Op::Record {
                value,
                fail_undo,
                suppress,
            } => {
                let fail = *fail_undo;
                let cmd = Command::new(*value)
                    .with_undo(move |n: &AtomicU32, _: &u8| {
                        if fail {
                            return Err(CommandError::Other("fuzz".into()));
                        }
                        n.fetch_add(1, Ordering::Relaxed);
                        Ok(())
                    })
                    .suppress_default(*suppress);
                history.record(cmd);
                assert!(history.undo_depth() <= history.limit());
            }
            Op::Undo => check_step(&mut history, true),
            Op::Redo => check_step(&mut history, false),
            Op::Key { c, ctrl, shift } => {
                let mut mods = Modifiers::NONE;
                if *ctrl {
                    mods |= Modifiers::CTRL;
                }
                if *shift {
                    mods |= Modifiers::SHIFT;
                }
                let key = KeyEvent::new(KeyCode::Char(char::from(*c)))
                    .with_modifiers(mods);
                let mut press = KeyPress::new(key);
                match listener.handle(&mut history, &mut press) {
                    Ok(Some(d)) => assert_eq!(d.suppress_default, press.is_default_prevented()),
                    Ok(None) => assert!(!press.is_default_prevented()),
                    Err(HistoryError::Callback { .. }) => {}
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
            Op::SetLimit(n) => {
                let n = usize::from(*n % 32);
                let depth = history.undo_depth();
                match history.set_limit(n) {
                    Ok(()) if history.config().trim_on_shrink => {
                        assert!(history.undo_depth() <= n)
                    }
                    Ok(()) => assert_eq!(history.undo_depth(), depth),
                    Err(HistoryError::InvalidLimit { requested }) => assert_eq!(requested, 0),
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
            Op::Clear => {
                history.clear();
                assert_eq!(history.tracked_count(), 0);
            }
        }
        check_tables(&history);
    }
});

fn check_step(history: &mut CommandHistory<u8, AtomicU32>, undo: bool) {
    let before = (history.undo_depth(), history.redo_depth());
    let result = if undo { history.undo() } else { history.redo() };
    match result {
        Ok(Some(_)) if undo => {
            assert_eq!(history.undo_depth(), before.0 - 1);
            assert_eq!(history.redo_depth(), before.1 + 1);
        }
        Ok(Some(_)) => {
            assert_eq!(history.redo_depth(), before.1 - 1);
            assert_eq!(history.undo_depth(), before.0 + 1);
        }
        Ok(None) | Err(HistoryError::Callback { .. }) => {
            assert_eq!((history.undo_depth(), history.redo_depth()), before);
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

fn check_tables(history: &CommandHistory<u8, AtomicU32>) {
    let undo: HashSet<CommandId> = history.undo_entries().map(HistoryEntry::id).collect();
    let redo: HashSet<CommandId> = history.redo_entries().map(HistoryEntry::id).collect();
    assert!(undo.is_disjoint(&redo));
    assert_eq!(history.tracked_count(), undo.len() + redo.len());
    assert!(undo.iter().chain(redo.iter()).all(|id| history.is_tracked(*id)));
}
