//! Shared tuning constants.
//!
//! These are defaults, not policy: the placement step and radius are
//! tied to one machine's plate scale and are overridable through
//! `PlacementConfig` in the scene crate, and the comparison epsilon is a
//! parameter of the snapshot-equality and hull-grouping routines.

/// Tolerance for snapshot equality and hull vertex grouping.
pub const EPSILON: f64 = 1e-6;

/// Default maximum number of undoable steps kept in the history.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Default grid step of the placement search, in mm.
pub const DEFAULT_PLACEMENT_STEP: f64 = 5.0;

/// Default maximum search radius of the placement search, in mm.
pub const DEFAULT_PLACEMENT_RADIUS: f64 = 65.0;

/// Default build volume width (X), in mm.
pub const DEFAULT_BUILD_WIDTH: f64 = 125.0;

/// Default build volume depth (Y), in mm.
pub const DEFAULT_BUILD_DEPTH: f64 = 125.0;

/// Default build volume height (Z), in mm.
pub const DEFAULT_BUILD_HEIGHT: f64 = 125.0;
