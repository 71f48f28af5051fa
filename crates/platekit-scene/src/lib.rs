//! # PlateKit Scene
//!
//! Spatial model management for a fabrication-machine GUI. This crate
//! owns the set of placed models on the build plate and the operations
//! the UI issues against it: placing, transforming, packing, undoing,
//! and laying solids flat on a stable face.
//!
//! ## Core Components
//!
//! - **Geometry**: axis-aligned boxes and rotation-between-vectors math
//! - **Mesh / ConvexHull**: owned model geometry plus the provider seam
//!   for externally computed hulls
//! - **Model**: one placed object with transform and cached bounds
//! - **Snapshot / HistoryManager**: snapshot-based undo/redo
//! - **Placement**: discrete expanding-ring collision-free placement
//! - **LayFlat**: convex-hull resting-orientation solver
//! - **ModelGroup**: orchestration, overstep checking, notifications
//!
//! ## Architecture
//!
//! ```text
//! ModelGroup (orchestrator)
//!   ├── Models (owned placed objects)
//!   ├── HistoryManager (snapshot stacks)
//!   ├── Placement solver (collision-free offsets)
//!   ├── LayFlat solver (resting orientation)
//!   └── EventBus (state notifications to rendering/UI)
//! ```
//!
//! Every operation runs synchronously to completion; collaborators
//! observe the result through [`platekit_core::SceneEvent`]
//! notifications and id-based queries.

pub mod geometry;
pub mod history;
pub mod lay_flat;
pub mod mesh;
pub mod model;
pub mod model_group;
pub mod placement;
pub mod snapshot;

pub use geometry::{rotation_between, Aabb};
pub use history::HistoryManager;
pub use lay_flat::{lay_flat, LayFlatOutcome};
pub use mesh::{ConvexHull, HullProvider, Mesh};
pub use model::{FlipCode, Model, ModelShape, ModelTransform, SourceKind, TransformPatch};
pub use model_group::{AddOutcome, ModelGroup};
pub use placement::{find_offset, Placement, PlacementConfig};
pub use snapshot::{Snapshot, SnapshotEntry};

// Re-export the shared types collaborators need alongside the group.
pub use platekit_core::{
    EventBus, ModelId, SceneError, SceneEvent, SceneState, SelectedState, SubscriptionId,
};
