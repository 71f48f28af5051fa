//! Immutable captures of every model transform at one instant.

use serde::{Deserialize, Serialize};

use platekit_core::ModelId;

use crate::model::{Model, ModelTransform};

/// One model's captured transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: ModelId,
    pub transform: ModelTransform,
}

/// Ordered capture of the whole group, used for undo/redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// The canonical empty snapshot (group with no models).
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Captures the current transform of every model, in group order.
    pub fn capture(models: &[Model]) -> Self {
        Self {
            entries: models
                .iter()
                .map(|m| SnapshotEntry {
                    id: m.id(),
                    transform: *m.transform(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate equality: same models in the same order, and every
    /// transform matrix element-wise within `epsilon`. This is the
    /// dedup rule that keeps no-op edits off the undo stack.
    pub fn approx_eq(&self, other: &Snapshot, epsilon: f64) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries.iter().zip(&other.entries).all(|(a, b)| {
            a.id == b.id
                && a.transform
                    .matrix()
                    .iter()
                    .zip(b.transform.matrix().iter())
                    .all(|(x, y)| (x - y).abs() < epsilon)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use nalgebra::Vector3;
    use platekit_core::constants::EPSILON;

    #[test]
    fn sub_epsilon_drift_compares_equal() {
        let model = Model::solid(Mesh::cuboid(10.0, 10.0, 10.0));
        let a = Snapshot::capture(std::slice::from_ref(&model));

        let mut drifted = model.clone();
        let mut t = *drifted.transform();
        t.position += Vector3::new(EPSILON / 10.0, 0.0, 0.0);
        drifted.set_transform(t);
        let b = Snapshot::capture(std::slice::from_ref(&drifted));

        assert!(a.approx_eq(&b, EPSILON));
    }

    #[test]
    fn moved_model_compares_unequal() {
        let model = Model::solid(Mesh::cuboid(10.0, 10.0, 10.0));
        let a = Snapshot::capture(std::slice::from_ref(&model));

        let mut moved = model.clone();
        let mut t = *moved.transform();
        t.position += Vector3::new(1.0, 0.0, 0.0);
        moved.set_transform(t);
        let b = Snapshot::capture(std::slice::from_ref(&moved));

        assert!(!a.approx_eq(&b, EPSILON));
    }

    #[test]
    fn different_order_compares_unequal() {
        let m1 = Model::solid(Mesh::cuboid(10.0, 10.0, 10.0));
        let m2 = Model::solid(Mesh::cuboid(10.0, 10.0, 10.0));
        let forward = Snapshot::capture(&[m1.clone(), m2.clone()]);
        let backward = Snapshot::capture(&[m2, m1]);
        assert!(!forward.approx_eq(&backward, EPSILON));
    }
}
