mod common;

use common::{large_group, solid_cube};
use nalgebra::Vector3;
use platekit_scene::TransformPatch;
use proptest::prelude::*;

proptest! {
    /// Edits below the snapshot epsilon never grow the undo stack.
    #[test]
    fn sub_epsilon_edits_do_not_grow_history(
        x in 1.0..40.0f64,
        y in -40.0..40.0f64,
        drift in 0.0..5e-7f64,
    ) {
        let mut group = large_group();
        let id = group.add_model(solid_cube(10.0)).id;
        group.select(Some(id)).unwrap();
        group.update_selected_transform(&TransformPatch::position(Vector3::new(x, y, 0.0)));
        group.update_selected_transform(&TransformPatch::position(Vector3::new(x + drift, y, 0.0)));

        // One add plus one distinct move: exactly two undo steps.
        prop_assert!(group.undo());
        prop_assert!(group.undo());
        prop_assert!(!group.can_undo());
    }

    /// Undoing everything and redoing it restores the final transforms.
    #[test]
    fn undo_redo_round_trip(
        positions in prop::collection::vec((1.0..60.0f64, -60.0..60.0f64), 1..6),
    ) {
        let mut group = large_group();
        let id = group.add_model(solid_cube(10.0)).id;
        group.select(Some(id)).unwrap();
        for (x, y) in &positions {
            group.update_selected_transform(&TransformPatch::position(Vector3::new(*x, *y, 0.0)));
        }

        let final_transform = *group.get(id).unwrap().transform();
        let mut undone = 0;
        while group.undo() {
            undone += 1;
        }
        prop_assert!(!group.has_models());
        for _ in 0..undone {
            prop_assert!(group.redo());
        }

        let restored = *group.get(id).unwrap().transform();
        for (a, b) in final_transform.matrix().iter().zip(restored.matrix().iter()) {
            prop_assert!((a - b).abs() < 1e-6);
        }
    }
}
