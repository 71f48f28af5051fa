//! Collision-free placement search.
//!
//! Deterministic expanding-ring search over a discrete grid of
//! horizontal offsets. Each candidate offset is accepted when the
//! translated bounding box stays inside the build volume and intersects
//! no already-placed box.

use nalgebra::{Vector2, Vector3};
use std::cmp::Ordering;
use tracing::{debug, warn};

use platekit_core::constants::{DEFAULT_PLACEMENT_RADIUS, DEFAULT_PLACEMENT_STEP, EPSILON};

use crate::geometry::Aabb;

/// Tuning of the placement search.
///
/// The defaults are tied to one machine's plate scale; callers with a
/// different build volume should derive their own step and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Grid step between candidate offsets, in mm.
    pub step: f64,
    /// Maximum search radius from the origin, in mm.
    pub max_radius: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_PLACEMENT_STEP,
            max_radius: DEFAULT_PLACEMENT_RADIUS,
        }
    }
}

/// Result of a placement search.
///
/// `exhausted` marks the degraded fallback: no free slot was found
/// within the radius and the offset degrades to the origin. Callers
/// surface this to the user instead of treating it as success.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Horizontal offset to apply, in plate-plane coordinates.
    pub offset: Vector2<f64>,
    /// Whether the search ran out of candidates.
    pub exhausted: bool,
}

/// Finds a horizontal offset that keeps `candidate` inside `volume`
/// without intersecting any box in `occupied`.
///
/// An empty board places at the origin without searching. Ring `n`
/// tests the four axis-aligned points at distance `n * step` first,
/// then the remaining square-perimeter points in order of distance
/// from the origin.
pub fn find_offset(
    candidate: &Aabb,
    occupied: &[Aabb],
    volume: &Aabb,
    config: &PlacementConfig,
) -> Placement {
    if occupied.is_empty() {
        return Placement {
            offset: Vector2::zeros(),
            exhausted: false,
        };
    }

    let rings = (config.max_radius / config.step).floor() as i64;
    for ring in 1..=rings {
        for offset in ring_candidates(ring, config.step) {
            let moved = candidate.translated(&Vector3::new(offset.x, offset.y, 0.0));
            if !volume.contains_xy(&moved, EPSILON) {
                continue;
            }
            if occupied.iter().any(|b| b.intersects(&moved)) {
                continue;
            }
            debug!(
                "placement found at ({:.1}, {:.1}) on ring {}",
                offset.x, offset.y, ring
            );
            return Placement {
                offset,
                exhausted: false,
            };
        }
    }

    warn!(
        "placement search exhausted within radius {:.1}, falling back to origin",
        config.max_radius
    );
    Placement {
        offset: Vector2::zeros(),
        exhausted: true,
    }
}

/// Candidate offsets of one ring: the four axis points first, then the
/// rest of the square perimeter stably sorted by squared distance.
fn ring_candidates(ring: i64, step: f64) -> Vec<Vector2<f64>> {
    let r = ring as f64 * step;
    let mut candidates = vec![
        Vector2::new(r, 0.0),
        Vector2::new(-r, 0.0),
        Vector2::new(0.0, r),
        Vector2::new(0.0, -r),
    ];

    let mut perimeter = Vec::new();
    for k in -ring..=ring {
        if k == 0 {
            continue;
        }
        let v = k as f64 * step;
        // Top and bottom edges, corners included.
        perimeter.push(Vector2::new(v, r));
        perimeter.push(Vector2::new(v, -r));
        // Left and right edges, corners excluded to avoid duplicates.
        if k.abs() < ring {
            perimeter.push(Vector2::new(r, v));
            perimeter.push(Vector2::new(-r, v));
        }
    }
    perimeter.sort_by(|a, b| {
        a.norm_squared()
            .partial_cmp(&b.norm_squared())
            .unwrap_or(Ordering::Equal)
    });

    candidates.extend(perimeter);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn volume() -> Aabb {
        Aabb::new(
            Point3::new(-62.5, -62.5, 0.0),
            Point3::new(62.5, 62.5, 125.0),
        )
    }

    fn cube_at(x: f64, y: f64) -> Aabb {
        Aabb::new(
            Point3::new(x - 5.0, y - 5.0, 0.0),
            Point3::new(x + 5.0, y + 5.0, 10.0),
        )
    }

    #[test]
    fn empty_board_places_at_origin() {
        let placement = find_offset(
            &cube_at(0.0, 0.0),
            &[],
            &volume(),
            &PlacementConfig::default(),
        );
        assert_eq!(placement.offset, Vector2::zeros());
        assert!(!placement.exhausted);
    }

    #[test]
    fn second_cube_avoids_first() {
        let first = cube_at(0.0, 0.0);
        let placement = find_offset(
            &cube_at(0.0, 0.0),
            &[first],
            &volume(),
            &PlacementConfig::default(),
        );
        assert!(!placement.exhausted);
        let moved = cube_at(placement.offset.x, placement.offset.y);
        assert!(!moved.intersects(&first));
        assert!(volume().contains_xy(&moved, 1e-6));
    }

    #[test]
    fn axis_points_probed_before_diagonals() {
        // First free slot for two cubes is one ring out on an axis.
        let placement = find_offset(
            &cube_at(0.0, 0.0),
            &[cube_at(0.0, 0.0)],
            &volume(),
            &PlacementConfig::default(),
        );
        let on_axis = placement.offset.x == 0.0 || placement.offset.y == 0.0;
        assert!(on_axis, "expected axis placement, got {:?}", placement);
    }

    #[test]
    fn crowded_plate_reports_exhaustion() {
        // A plate barely larger than the occupying cube leaves no slot.
        let tiny = Aabb::new(Point3::new(-6.0, -6.0, 0.0), Point3::new(6.0, 6.0, 125.0));
        let placement = find_offset(
            &cube_at(0.0, 0.0),
            &[cube_at(0.0, 0.0)],
            &tiny,
            &PlacementConfig::default(),
        );
        assert!(placement.exhausted);
        assert_eq!(placement.offset, Vector2::zeros());
    }

    #[test]
    fn ring_candidates_cover_perimeter_without_duplicates() {
        let candidates = ring_candidates(2, 5.0);
        // 4 axis points + full square perimeter minus those 4.
        assert_eq!(candidates.len(), 4 + (8 * 2 - 4));
        for (i, a) in candidates.iter().enumerate() {
            for b in candidates.iter().skip(i + 1) {
                assert!((a - b).norm() > 1e-9, "duplicate candidate {:?}", a);
            }
        }
    }
}
