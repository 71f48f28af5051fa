//! Event type definitions for the scene event bus.
//!
//! Events are cloneable and serializable so the surrounding application
//! can log or replay them.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::types::ModelId;

/// Root event enum for scene notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SceneEvent {
    /// The model group mutated; carries the fresh state summary.
    StateChanged(SceneState),
}

impl SceneEvent {
    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            SceneEvent::StateChanged(state) => format!(
                "state changed (models: {}, selected: {})",
                state.has_model,
                state
                    .selected
                    .as_ref()
                    .map(|s| s.id.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ),
        }
    }
}

/// Summary of the model group published after every mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    /// Whether an undo step is available.
    pub can_undo: bool,
    /// Whether a redo step is available.
    pub can_redo: bool,
    /// Whether the group holds at least one model.
    pub has_model: bool,
    /// Whether any solid model exceeds the build volume.
    pub any_overstepped: bool,
    /// Transform and bounds of the current selection, if any.
    pub selected: Option<SelectedState>,
}

/// Transform fields of the selected model, as shown in UI inspectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedState {
    /// Id of the selected model.
    pub id: ModelId,
    /// World position.
    pub position: Vector3<f64>,
    /// Rotation as intrinsic XYZ Euler angles, in radians.
    pub rotation_euler: Vector3<f64>,
    /// Per-axis scale factors.
    pub scale: Vector3<f64>,
    /// Mirror code for planar models (0..=3).
    pub flip: u8,
    /// Minimum corner of the selection bounding box.
    pub bounds_min: Point3<f64>,
    /// Maximum corner of the selection bounding box.
    pub bounds_max: Point3<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_event_round_trips_through_json() {
        let event = SceneEvent::StateChanged(SceneState {
            can_undo: true,
            can_redo: false,
            has_model: true,
            any_overstepped: false,
            selected: Some(SelectedState {
                id: ModelId::new(),
                position: Vector3::new(1.0, 2.0, 0.0),
                rotation_euler: Vector3::zeros(),
                scale: Vector3::new(1.0, 1.0, 1.0),
                flip: 0,
                bounds_min: Point3::new(-5.0, -5.0, 0.0),
                bounds_max: Point3::new(5.0, 5.0, 10.0),
            }),
        });

        let json = serde_json::to_string(&event).unwrap();
        let SceneEvent::StateChanged(state) =
            serde_json::from_str(&json).unwrap();
        assert!(state.has_model);
        let selected = state.selected.unwrap();
        assert!((selected.position.x - 1.0).abs() < 1e-12);
        assert!((selected.bounds_max.z - 10.0).abs() < 1e-12);
    }
}
