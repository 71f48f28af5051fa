//! Model group: the orchestrator owning placed models, selection, the
//! build volume, and the undo/redo history.
//!
//! Every mutation of a model goes through the group so the snapshot
//! history stays consistent with the models it captures. Mutating
//! operations record a snapshot, refresh the overstep flags, and
//! publish a state notification on the event bus.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use platekit_core::constants::{
    DEFAULT_BUILD_DEPTH, DEFAULT_BUILD_HEIGHT, DEFAULT_BUILD_WIDTH, EPSILON,
};
use platekit_core::{EventBus, ModelId, SceneError, SceneEvent, SceneState, SelectedState};

use crate::geometry::{self, Aabb};
use crate::history::HistoryManager;
use crate::lay_flat::{self, LayFlatOutcome};
use crate::mesh::ConvexHull;
use crate::model::{Model, SourceKind, TransformPatch};
use crate::placement::{self, PlacementConfig};
use crate::snapshot::Snapshot;

/// Result of adding a model to the group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddOutcome {
    /// Id of the newly placed model.
    pub id: ModelId,
    /// Whether the placement search fell back to the origin.
    pub placement_exhausted: bool,
}

/// Ordered collection of placed models and the operations on them.
///
/// Models are exclusively owned by the group; collaborators hold ids
/// and subscribe to state notifications. Insertion order is meaningful
/// for planar models (z-order layering) but not for solids.
pub struct ModelGroup {
    models: Vec<Model>,
    /// Pristine clones used to reconstruct models during undo/redo.
    templates: HashMap<ModelId, Model>,
    selected: Option<ModelId>,
    build_volume: Aabb,
    history: HistoryManager,
    bus: EventBus,
    placement: PlacementConfig,
    epsilon: f64,
}

impl ModelGroup {
    /// Creates an empty group with the default build volume.
    pub fn new() -> Self {
        Self::with_build_volume(Aabb::new(
            Point3::new(-DEFAULT_BUILD_WIDTH / 2.0, -DEFAULT_BUILD_DEPTH / 2.0, 0.0),
            Point3::new(
                DEFAULT_BUILD_WIDTH / 2.0,
                DEFAULT_BUILD_DEPTH / 2.0,
                DEFAULT_BUILD_HEIGHT,
            ),
        ))
    }

    /// Creates an empty group bounded by `build_volume`.
    pub fn with_build_volume(build_volume: Aabb) -> Self {
        Self {
            models: Vec::new(),
            templates: HashMap::new(),
            selected: None,
            build_volume,
            history: HistoryManager::default(),
            bus: EventBus::new(),
            placement: PlacementConfig::default(),
            epsilon: EPSILON,
        }
    }

    /// Overrides the placement search tuning.
    pub fn set_placement_config(&mut self, config: PlacementConfig) {
        self.placement = config;
    }

    /// Limits the history to `max_depth` undoable steps, evicting the
    /// oldest steps (and any templates they alone referenced).
    pub fn set_history_depth(&mut self, max_depth: usize) {
        self.history.set_max_depth(max_depth);
        self.prune_templates();
    }

    /// The event bus collaborators subscribe to for state changes.
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Adds a model to the group.
    ///
    /// Solids are stuck to the plate, moved to the origin, and placed
    /// by the collision-free search; planar models are placed at the
    /// origin and flagged for preview generation. Appends in z-order.
    pub fn add_model(&mut self, mut model: Model) -> AddOutcome {
        let id = model.id();
        let mut exhausted = false;

        match model.source_kind() {
            SourceKind::Solid3D => {
                model.stick_to_plate();
                let z = model.transform().position.z;
                model.set_position(Vector3::new(0.0, 0.0, z));

                let candidate = model.bounding_box();
                let occupied = self.solid_bounds();
                let placement = placement::find_offset(
                    &candidate,
                    &occupied,
                    &self.build_volume,
                    &self.placement,
                );
                exhausted = placement.exhausted;
                model.set_position(Vector3::new(placement.offset.x, placement.offset.y, z));
            }
            SourceKind::Planar2D => {
                let z = model.transform().position.z;
                model.set_position(Vector3::new(0.0, 0.0, z));
                model.needs_preview = true;
            }
        }

        debug!(
            "added {} at ({:.1}, {:.1})",
            id,
            model.transform().position.x,
            model.transform().position.y
        );
        self.templates.insert(id, model.clone());
        self.models.push(model);
        self.record_snapshot();
        self.check_overstep();
        self.notify();

        AddOutcome {
            id,
            placement_exhausted: exhausted,
        }
    }

    /// Removes the selected model. No-op without a selection.
    pub fn remove_selected(&mut self) -> bool {
        let Some(id) = self.selected.take() else {
            return false;
        };
        self.models.retain(|m| m.id() != id);
        debug!("removed {}", id);
        self.record_snapshot();
        self.check_overstep();
        self.notify();
        true
    }

    /// Removes every model. No-op on an empty group.
    pub fn remove_all(&mut self) -> bool {
        if self.models.is_empty() {
            return false;
        }
        self.models.clear();
        self.selected = None;
        self.record_snapshot();
        self.notify();
        true
    }

    /// Changes the selection. Pure view state: publishes a notification
    /// but records no snapshot.
    pub fn select(&mut self, id: Option<ModelId>) -> Result<(), SceneError> {
        if let Some(id) = id {
            if !self.models.iter().any(|m| m.id() == id) {
                return Err(SceneError::UnknownModel { id });
            }
        }
        self.selected = id;
        for model in &mut self.models {
            model.selected = Some(model.id()) == id;
        }
        self.notify();
        Ok(())
    }

    /// Applies the supplied fields of `patch` to the selected model,
    /// re-sticking solids to the plate. No-op without a selection.
    pub fn update_selected_transform(&mut self, patch: &TransformPatch) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(model) = self.models.iter_mut().find(|m| m.id() == id) else {
            return false;
        };
        model.apply_patch(patch);
        if model.source_kind() == SourceKind::Solid3D {
            model.stick_to_plate();
        }
        self.record_snapshot();
        self.check_overstep();
        self.notify();
        true
    }

    /// Translates a model along Z so its lowest point touches the plate.
    pub fn stick_to_plate(&mut self, id: ModelId) -> Result<(), SceneError> {
        let model = self
            .models
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(SceneError::UnknownModel { id })?;
        model.stick_to_plate();
        self.record_snapshot();
        self.check_overstep();
        self.notify();
        Ok(())
    }

    /// Attaches an externally computed convex hull to a model (and to
    /// its undo template, so reconstructed clones keep the hull).
    pub fn set_convex_hull(&mut self, id: ModelId, hull: ConvexHull) -> Result<(), SceneError> {
        let model = self
            .models
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(SceneError::UnknownModel { id })?;
        model.set_convex_hull(hull.clone());
        if let Some(template) = self.templates.get_mut(&id) {
            template.set_convex_hull(hull);
        }
        Ok(())
    }

    /// Lays the selected solid flat on its hull. Returns `None` without
    /// a selection; hull-less and already-resting models are no-ops.
    pub fn lay_flat_selected(&mut self) -> Option<LayFlatOutcome> {
        let id = self.selected?;
        let model = self.models.iter_mut().find(|m| m.id() == id)?;
        let outcome = lay_flat::lay_flat(model, self.epsilon);
        if outcome == LayFlatOutcome::Rotated {
            self.record_snapshot();
            self.check_overstep();
            self.notify();
        }
        Some(outcome)
    }

    /// Re-packs every model in insertion order: each model is lifted
    /// off the board and reinserted at a solver-chosen slot, so it
    /// cannot collide with its own previous position. Planar models
    /// follow their add rule and return to the origin.
    ///
    /// Returns `false` if any placement was exhausted.
    pub fn arrange_all(&mut self) -> bool {
        if self.models.is_empty() {
            return true;
        }

        let mut placed: Vec<Aabb> = Vec::new();
        let mut all_placed = true;

        for model in &mut self.models {
            let z = {
                if model.source_kind() == SourceKind::Solid3D {
                    model.stick_to_plate();
                }
                model.transform().position.z
            };
            model.set_position(Vector3::new(0.0, 0.0, z));

            if model.source_kind() == SourceKind::Solid3D {
                let candidate = model.bounding_box();
                let placement = placement::find_offset(
                    &candidate,
                    &placed,
                    &self.build_volume,
                    &self.placement,
                );
                if placement.exhausted {
                    all_placed = false;
                }
                model.set_position(Vector3::new(placement.offset.x, placement.offset.y, z));
                placed.push(model.bounding_box());
            }
        }

        if !all_placed {
            warn!("arrange could not place every model within the search radius");
        }
        self.record_snapshot();
        self.check_overstep();
        self.notify();
        all_placed
    }

    /// Steps the history back one snapshot and recovers that state.
    /// Returns `false` at the stack boundary (no-op).
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.recover(&snapshot);
        self.check_overstep();
        self.notify();
        true
    }

    /// Steps the history forward one snapshot and recovers that state.
    /// Returns `false` with an empty redo stack (no-op).
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.recover(&snapshot);
        self.check_overstep();
        self.notify();
        true
    }

    /// Rebuilds the group from a snapshot: clear the models, then clone
    /// each entry's template and apply the captured transform exactly.
    fn recover(&mut self, snapshot: &Snapshot) {
        self.models.clear();
        for entry in snapshot.entries() {
            let Some(template) = self.templates.get(&entry.id) else {
                // Snapshots only reference models added through the group.
                warn!("snapshot references unknown {}", entry.id);
                continue;
            };
            let mut model = template.clone();
            model.set_transform(entry.transform);
            model.selected = false;
            model.overstepped = false;
            self.models.push(model);
        }

        // Selection survives only if the model still exists.
        if let Some(id) = self.selected {
            if self.models.iter().any(|m| m.id() == id) {
                for model in &mut self.models {
                    model.selected = model.id() == id;
                }
            } else {
                self.selected = None;
            }
        }
    }

    /// Recomputes every solid's bounding box, tests containment against
    /// the build volume, and updates the per-model overstep flags.
    pub fn check_overstep(&mut self) -> bool {
        let mut any = false;
        for model in &mut self.models {
            if model.source_kind() != SourceKind::Solid3D {
                model.overstepped = false;
                continue;
            }
            let bounds = model.bounding_box();
            let over = !self.build_volume.contains(&bounds, self.epsilon);
            model.overstepped = over;
            any |= over;
        }
        any
    }

    /// Replaces the build volume and re-runs the overstep check.
    pub fn set_build_volume(&mut self, build_volume: Aabb) {
        self.build_volume = build_volume;
        self.check_overstep();
        self.notify();
    }

    pub fn build_volume(&self) -> &Aabb {
        &self.build_volume
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.iter().find(|m| m.id() == id)
    }

    pub fn selected_id(&self) -> Option<ModelId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Model> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn has_models(&self) -> bool {
        !self.models.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_any_overstepped(&self) -> bool {
        self.models.iter().any(|m| m.overstepped)
    }

    /// Bounding box of a model, recomputed from its current transform.
    pub fn bounding_box(&self, id: ModelId) -> Result<Aabb, SceneError> {
        self.get(id)
            .map(|m| m.compute_bounds())
            .ok_or(SceneError::UnknownModel { id })
    }

    /// Builds the state payload published after every operation.
    pub fn state(&self) -> SceneState {
        let selected = self.selected().map(|model| {
            let bounds = model.compute_bounds();
            let transform = model.transform();
            SelectedState {
                id: model.id(),
                position: transform.position,
                rotation_euler: geometry::quaternion_to_euler(&transform.rotation),
                scale: transform.scale,
                flip: transform.flip.as_u8(),
                bounds_min: bounds.min,
                bounds_max: bounds.max,
            }
        });
        SceneState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            has_model: self.has_models(),
            any_overstepped: self.is_any_overstepped(),
            selected,
        }
    }

    fn solid_bounds(&self) -> Vec<Aabb> {
        self.models
            .iter()
            .filter(|m| m.source_kind() == SourceKind::Solid3D)
            .map(|m| m.compute_bounds())
            .collect()
    }

    fn record_snapshot(&mut self) {
        let snapshot = Snapshot::capture(&self.models);
        self.history.record(snapshot, self.epsilon);
        self.prune_templates();
    }

    /// Drops templates no held snapshot references any more, so evicted
    /// history cannot pin removed models in memory.
    fn prune_templates(&mut self) {
        let history = &self.history;
        self.templates.retain(|id, _| {
            history
                .snapshots()
                .any(|snapshot| snapshot.entries().iter().any(|e| e.id == *id))
        });
    }

    fn notify(&self) {
        let event = SceneEvent::StateChanged(self.state());
        if self.bus.publish(&event).is_err() {
            debug!("state change with no subscribers");
        }
    }
}

impl Default for ModelGroup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    fn cube() -> Model {
        let mut model = Model::solid(Mesh::cuboid(10.0, 10.0, 10.0));
        model.set_convex_hull(ConvexHull::cuboid(10.0, 10.0, 10.0));
        model
    }

    #[test]
    fn templates_survive_while_history_references_them() {
        let mut group = ModelGroup::new();
        let id = group.add_model(cube()).id;
        group.select(Some(id)).unwrap();
        group.remove_selected();

        // The add snapshot is still undoable, so the template stays.
        assert!(group.templates.contains_key(&id));
        assert!(group.undo());
        assert_eq!(group.models()[0].id(), id);
    }

    #[test]
    fn templates_pruned_with_evicted_history() {
        let mut group = ModelGroup::new();
        group.set_history_depth(1);
        let id = group.add_model(cube()).id;
        group.select(Some(id)).unwrap();
        group.remove_selected();

        // Eviction dropped the add snapshot, the last reference to id.
        assert!(!group.templates.contains_key(&id));
        assert_eq!(group.history.undo_depth(), 1);
    }

    #[test]
    fn shrinking_history_depth_prunes_immediately() {
        let mut group = ModelGroup::new();
        let id = group.add_model(cube()).id;
        group.select(Some(id)).unwrap();
        group.remove_selected();

        group.set_history_depth(1);
        assert!(!group.templates.contains_key(&id));
    }
}
