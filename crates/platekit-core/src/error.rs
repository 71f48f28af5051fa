//! Error handling for PlateKit.
//!
//! Most recoverable conditions in the scene layer (undo at the stack
//! boundary, lay-flat on a hull-less model, operations without a
//! selection) are deliberately no-ops, not errors. The error types here
//! cover contract violations and degraded results that callers must be
//! able to observe.
//!
//! All error types use `thiserror`.

use thiserror::Error;

use crate::types::ModelId;

/// Scene-level error type.
///
/// Represents contract violations on the model group and geometry
/// seams; everything else in the scene layer degrades to a no-op or a
/// flagged result instead of raising an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Referenced model is not owned by this group
    #[error("Model {id} is not part of this group")]
    UnknownModel {
        /// The id that was not found.
        id: ModelId,
    },

    /// A convex hull with no faces or out-of-range indices was supplied
    #[error("Convex hull is degenerate: {reason}")]
    DegenerateHull {
        /// Why the hull was rejected.
        reason: String,
    },
}

/// Error types for event bus operations.
#[derive(Debug, Clone, Error)]
pub enum EventBusError {
    /// No subscribers are listening
    #[error("No active subscribers")]
    NoSubscribers,
}
