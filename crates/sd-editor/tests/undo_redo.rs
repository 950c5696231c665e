//! Integration tests: snapshot history driven through a `Session`.
//!
//! Every gesture checkpoints the buffer at pointer-down; these tests walk
//! the undo/redo stacks and compare whole-buffer snapshots.

use pretty_assertions::assert_eq;
use sd_core::EditorConfig;
use sd_core::config::DEFAULT_HISTORY_DEPTH;
use sd_core::model::{Color, ToolKind};
use sd_editor::Session;
use sd_render::Snapshot;

fn session() -> Session {
    Session::new(120, 120).unwrap()
}

/// One brush stroke, offset so each call paints different pixels.
fn stroke(session: &mut Session, i: usize) {
    let x = 10.0 + 15.0 * i as f32;
    session.pointer_down(x, 10.0);
    session.pointer_move(x, 40.0);
    session.pointer_move(x + 5.0, 80.0);
    session.pointer_up(x + 5.0, 80.0);
}

fn strokes(session: &mut Session, n: usize) -> Vec<Snapshot> {
    let mut states = vec![session.snapshot_for_export()];
    for i in 0..n {
        stroke(session, i);
        states.push(session.snapshot_for_export());
    }
    states
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn brush_stroke_then_undo_is_byte_exact() {
    let mut session = session();
    let before = session.snapshot_for_export();

    session.pointer_down(10.0, 10.0);
    session.pointer_move(10.0, 50.0);
    session.pointer_up(10.0, 50.0);
    assert_eq!(session.surface().pixel(10, 30), Some(Color::BLACK));

    assert!(session.undo());
    assert_eq!(session.snapshot_for_export(), before);
    assert_eq!(session.snapshot_for_export().pixels(), before.pixels());
}

#[test]
fn n_actions_then_n_undos_restore_blank() {
    let mut session = session();
    let states = strokes(&mut session, 5);

    for expected in states.iter().rev().skip(1) {
        assert!(session.undo());
        assert_eq!(&session.snapshot_for_export(), expected);
    }
    assert!(!session.can_undo());
    assert_eq!(session.snapshot_for_export(), states[0]);
}

#[test]
fn undo_then_redo_are_inverses() {
    let n = 5;
    for k in 1..=n {
        let mut session = session();
        let states = strokes(&mut session, n);

        for _ in 0..k {
            assert!(session.undo());
        }
        assert_eq!(session.snapshot_for_export(), states[n - k]);

        for _ in 0..k {
            assert!(session.redo());
        }
        assert_eq!(session.snapshot_for_export(), states[n], "k = {k}");
        assert!(!session.can_redo());
    }
}

#[test]
fn undo_on_empty_history_is_noop() {
    let mut session = session();
    let before = session.snapshot_for_export();
    assert!(!session.undo());
    assert!(!session.redo());
    assert_eq!(session.snapshot_for_export(), before);
}

// ─── Linear history ─────────────────────────────────────────────────────

#[test]
fn new_action_after_undo_clears_redo() {
    let mut session = session();
    strokes(&mut session, 3);
    session.undo();
    session.undo();
    assert!(session.can_redo());

    session.begin_action();
    assert!(!session.can_redo());
    let before = session.snapshot_for_export();
    assert!(!session.redo());
    assert_eq!(session.snapshot_for_export(), before);
}

#[test]
fn gesture_after_undo_clears_redo() {
    let mut session = session();
    strokes(&mut session, 2);
    session.undo();
    assert!(session.can_redo());

    stroke(&mut session, 4);
    assert!(!session.can_redo());
}

// ─── Bounded depth ──────────────────────────────────────────────────────

#[test]
fn history_depth_drops_oldest_checkpoint() {
    let config = EditorConfig {
        history_depth: 3,
        ..EditorConfig::default()
    };
    let mut session = Session::with_config(120, 120, config).unwrap();
    let states = strokes(&mut session, 5);
    assert_eq!(session.history().undo_depth(), 3);

    for _ in 0..3 {
        assert!(session.undo());
    }
    assert!(!session.undo());
    // The two oldest states are gone; the oldest reachable is after stroke 2.
    assert_eq!(session.snapshot_for_export(), states[2]);

    for _ in 0..3 {
        assert!(session.redo());
    }
    assert_eq!(session.snapshot_for_export(), states[5]);
    assert_eq!(
        session.history().undo_depth() + session.history().redo_depth(),
        3
    );
}

#[test]
fn zero_depth_is_unbounded() {
    let config = EditorConfig {
        history_depth: 0,
        ..EditorConfig::default()
    };
    let mut session = Session::with_config(120, 120, config).unwrap();
    strokes(&mut session, 6);
    assert_eq!(session.history().undo_depth(), 6);
}

#[test]
fn default_depth_limits_round_trip() {
    let mut session = session();
    let n = DEFAULT_HISTORY_DEPTH + 5;
    for _ in 0..n {
        session.begin_action();
    }
    assert_eq!(session.history().undo_depth(), DEFAULT_HISTORY_DEPTH);

    let mut undone = 0;
    while session.undo() {
        undone += 1;
    }
    assert_eq!(undone, DEFAULT_HISTORY_DEPTH);
}

#[test]
fn zero_depth_round_trips_past_default_depth() {
    let config = EditorConfig {
        history_depth: 0,
        ..EditorConfig::default()
    };
    let mut session = Session::with_config(120, 120, config).unwrap();
    let blank = session.snapshot_for_export();
    let n = DEFAULT_HISTORY_DEPTH + 5;
    for i in 0..n {
        stroke(&mut session, i % 7);
    }
    assert_ne!(session.snapshot_for_export(), blank);

    for _ in 0..n {
        assert!(session.undo());
    }
    assert!(!session.can_undo());
    assert_eq!(session.snapshot_for_export(), blank);
}

// ─── Reset paths ────────────────────────────────────────────────────────

#[test]
fn clear_canvas_resets_both_stacks() {
    let mut session = session();
    strokes(&mut session, 3);
    session.undo();
    session.clear_canvas().unwrap();

    assert!(!session.can_undo());
    assert!(!session.can_redo());
    assert_eq!(session.surface().pixel(10, 30), Some(Color::TRANSPARENT));
}

#[test]
fn crop_tool_gestures_do_not_checkpoint() {
    let mut session = session();
    session.set_tool(ToolKind::Crop);
    session.pointer_down(5.0, 5.0);
    session.pointer_move(50.0, 50.0);
    session.pointer_up(50.0, 50.0);
    assert!(!session.can_undo());
}
