//! Shared fixtures for the scene integration tests.

use nalgebra::Point3;
use platekit_scene::{Aabb, ConvexHull, Mesh, Model, ModelGroup};

/// A solid cube with its convex hull already attached.
pub fn solid_cube(size: f64) -> Model {
    let mut model = Model::solid(Mesh::cuboid(size, size, size));
    model.set_convex_hull(ConvexHull::cuboid(size, size, size));
    model
}

/// A build volume centered on the origin of the plate plane.
pub fn build_volume(half_extent: f64, height: f64) -> Aabb {
    Aabb::new(
        Point3::new(-half_extent, -half_extent, 0.0),
        Point3::new(half_extent, half_extent, height),
    )
}

/// A group bounded by a 200 x 200 x 200 mm volume.
pub fn large_group() -> ModelGroup {
    ModelGroup::with_build_volume(build_volume(100.0, 200.0))
}
