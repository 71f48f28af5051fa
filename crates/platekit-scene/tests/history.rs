mod common;

use common::solid_cube;
use platekit_core::constants::EPSILON;
use platekit_scene::{HistoryManager, Snapshot};

#[test]
fn test_new_manager_is_at_boundary() {
    let manager = HistoryManager::new(50);
    assert!(!manager.can_undo());
    assert!(!manager.can_redo());
    assert_eq!(manager.undo_depth(), 0);
    assert_eq!(manager.redo_depth(), 0);
}

#[test]
fn test_record_single_snapshot() {
    let mut manager = HistoryManager::new(50);
    let model = solid_cube(10.0);

    let pushed = manager.record(Snapshot::capture(std::slice::from_ref(&model)), EPSILON);
    assert!(pushed);
    assert!(manager.can_undo());
    assert!(!manager.can_redo());
    assert_eq!(manager.undo_depth(), 1);
}

#[test]
fn test_identical_snapshot_is_deduplicated() {
    let mut manager = HistoryManager::new(50);
    let model = solid_cube(10.0);

    assert!(manager.record(Snapshot::capture(std::slice::from_ref(&model)), EPSILON));
    assert!(!manager.record(Snapshot::capture(std::slice::from_ref(&model)), EPSILON));
    assert_eq!(manager.undo_depth(), 1);
}

#[test]
fn test_undo_recovers_previous_snapshot() {
    let mut manager = HistoryManager::new(50);
    let model = solid_cube(10.0);
    manager.record(Snapshot::capture(std::slice::from_ref(&model)), EPSILON);

    let recovered = manager.undo().expect("one step to undo");
    assert!(recovered.is_empty());
    assert!(!manager.can_undo());
    assert!(manager.can_redo());
}

#[test]
fn test_redo_after_undo() {
    let mut manager = HistoryManager::new(50);
    let model = solid_cube(10.0);
    let snapshot = Snapshot::capture(std::slice::from_ref(&model));
    manager.record(snapshot.clone(), EPSILON);
    manager.undo();

    let redone = manager.redo().expect("one step to redo");
    assert!(redone.approx_eq(&snapshot, EPSILON));
    assert!(manager.can_undo());
    assert!(!manager.can_redo());
}

#[test]
fn test_boundary_calls_are_no_ops() {
    let mut manager = HistoryManager::new(50);
    assert!(manager.undo().is_none());
    assert!(manager.redo().is_none());
    assert_eq!(manager.undo_depth(), 0);
    assert_eq!(manager.redo_depth(), 0);
}

#[test]
fn test_record_clears_redo_stack() {
    let mut manager = HistoryManager::new(50);
    let a = solid_cube(10.0);
    let b = solid_cube(20.0);

    manager.record(Snapshot::capture(std::slice::from_ref(&a)), EPSILON);
    manager.record(Snapshot::capture(&[a.clone(), b.clone()]), EPSILON);
    manager.undo();
    assert_eq!(manager.redo_depth(), 1);

    manager.record(Snapshot::capture(std::slice::from_ref(&b)), EPSILON);
    assert_eq!(manager.redo_depth(), 0);
}

#[test]
fn test_depth_cap_evicts_oldest_steps() {
    let mut manager = HistoryManager::new(3);
    let cubes: Vec<_> = (0..6).map(|_| solid_cube(10.0)).collect();

    for i in 1..=6 {
        manager.record(Snapshot::capture(&cubes[..i]), EPSILON);
    }
    assert_eq!(manager.undo_depth(), 3);

    // The canonical empty bottom is never evicted.
    let mut last = None;
    while let Some(snapshot) = manager.undo() {
        last = Some(snapshot);
    }
    assert!(last.expect("three steps to undo").is_empty());
}

#[test]
fn test_multiple_undo_redo() {
    let mut manager = HistoryManager::new(50);
    let cubes: Vec<_> = (0..5).map(|_| solid_cube(10.0)).collect();

    for i in 1..=5 {
        manager.record(Snapshot::capture(&cubes[..i]), EPSILON);
    }
    assert_eq!(manager.undo_depth(), 5);

    for _ in 0..5 {
        manager.undo();
    }
    assert_eq!(manager.undo_depth(), 0);
    assert_eq!(manager.redo_depth(), 5);

    for _ in 0..5 {
        manager.redo();
    }
    assert_eq!(manager.undo_depth(), 5);
    assert_eq!(manager.redo_depth(), 0);
}
