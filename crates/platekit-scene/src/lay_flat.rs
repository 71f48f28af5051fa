//! Lay-flat solver: rotates a solid onto a stable resting face.
//!
//! Works on the model's convex hull in world space. Contact with the
//! plate is classified by how many hull vertices sit at the minimum
//! height: a face (three or more) is already stable, an edge (two)
//! picks the adjacent face pointing most nearly down, and a single
//! vertex is first tipped onto an edge.

use nalgebra::{Vector2, Vector3};
use tracing::{debug, warn};

use crate::geometry::rotation_between;
use crate::mesh::ConvexHull;
use crate::model::{Model, SourceKind};

/// What the solver did to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayFlatOutcome {
    /// Not a solid, or no convex hull attached; model unchanged.
    NoHull,
    /// Already resting on a face; model unchanged.
    AlreadyResting,
    /// A rotation was applied and the model re-stuck to the plate.
    Rotated,
}

/// Rotates `model` onto a stable resting face.
///
/// Only the orientation and vertical position change; the in-plane
/// position is restored afterwards. `epsilon` is the tolerance for
/// grouping hull vertices at the minimum height.
pub fn lay_flat(model: &mut Model, epsilon: f64) -> LayFlatOutcome {
    if model.source_kind() != SourceKind::Solid3D {
        return LayFlatOutcome::NoHull;
    }
    let Some(mut world) = model.world_hull() else {
        return LayFlatOutcome::NoHull;
    };

    let in_plane = Vector2::new(model.transform().position.x, model.transform().position.y);

    let mut min_set = lowest_vertices(&world, epsilon);
    if min_set.len() >= 3 {
        return LayFlatOutcome::AlreadyResting;
    }

    if min_set.len() == 1 {
        // Vertex contact: tip the most nearly horizontal hull direction
        // from the contact vertex down into the plate plane.
        let contact = world.vertices()[min_set[0]];
        let mut best: Option<Vector3<f64>> = None;
        let mut best_sine = f64::INFINITY;
        for (i, v) in world.vertices().iter().enumerate() {
            if i == min_set[0] {
                continue;
            }
            let d = v - contact;
            let len = d.norm();
            if len < epsilon {
                continue;
            }
            let sine = (d.z / len).abs();
            if sine < best_sine {
                best_sine = sine;
                best = Some(d);
            }
        }
        let Some(direction) = best else {
            warn!("lay flat: hull degenerates to a single point");
            return LayFlatOutcome::AlreadyResting;
        };

        let horizontal = Vector3::new(direction.x, direction.y, 0.0);
        let tip = rotation_between(&horizontal, &direction);
        model.set_rotation(tip * model.transform().rotation);
        model.stick_to_plate();
        debug!("lay flat: tipped vertex contact onto an edge");

        world = match model.world_hull() {
            Some(hull) => hull,
            None => {
                finish(model, in_plane);
                return LayFlatOutcome::Rotated;
            }
        };
        min_set = lowest_vertices(&world, epsilon);
        if min_set.len() >= 3 {
            finish(model, in_plane);
            return LayFlatOutcome::Rotated;
        }
        if min_set.len() < 2 {
            warn!("lay flat: edge contact not reached after tipping");
            finish(model, in_plane);
            return LayFlatOutcome::Rotated;
        }
    }

    // Edge contact: among the faces sharing both lowest vertices, pick
    // the one whose outward normal points most nearly straight down.
    let (a, b) = (min_set[0] as u32, min_set[1] as u32);
    let down = -Vector3::z();
    let mut best_normal: Option<Vector3<f64>> = None;
    let mut best_cosine = f64::NEG_INFINITY;
    for (i, face) in world.faces().iter().enumerate() {
        if face.contains(&a) && face.contains(&b) {
            let normal = world.face_normal(i);
            let cosine = normal.dot(&down);
            if cosine > best_cosine {
                best_cosine = cosine;
                best_normal = Some(normal);
            }
        }
    }

    match best_normal {
        Some(normal) => {
            let align = rotation_between(&down, &normal);
            model.set_rotation(align * model.transform().rotation);
            debug!("lay flat: aligned resting face (cosine {:.4})", best_cosine);
        }
        None => warn!("lay flat: no hull face spans the resting edge"),
    }

    finish(model, in_plane);
    LayFlatOutcome::Rotated
}

/// Indices of hull vertices within `epsilon` of the minimum height.
fn lowest_vertices(hull: &ConvexHull, epsilon: f64) -> Vec<usize> {
    let min_z = hull
        .vertices()
        .iter()
        .map(|v| v.z)
        .fold(f64::INFINITY, f64::min);
    hull.vertices()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.z - min_z < epsilon)
        .map(|(i, _)| i)
        .collect()
}

/// Re-sticks to the plate and restores the in-plane position; only the
/// vertical position and orientation may change overall.
fn finish(model: &mut Model, in_plane: Vector2<f64>) {
    model.stick_to_plate();
    let z = model.transform().position.z;
    model.set_position(Vector3::new(in_plane.x, in_plane.y, z));
}
