//! Geometry utilities: axis-aligned boxes and rotation math.
//!
//! Pure functions and value types with no scene state. Everything here
//! works in world coordinates with Z as the vertical ("up") axis, the
//! machine convention used throughout PlateKit.

use nalgebra::{Point3, Quaternion, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Creates a box from its two corners. The corners are normalized
    /// so `min <= max` holds on every axis.
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Tight box around a set of points. Returns `None` for an empty set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self { min, max })
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// This box shifted by `offset`.
    pub fn translated(&self, offset: &Vector3<f64>) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Strict overlap test. Boxes that merely touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Whether `other` lies entirely inside this box, with `epsilon`
    /// slack on every face.
    pub fn contains(&self, other: &Aabb, epsilon: f64) -> bool {
        other.min.x >= self.min.x - epsilon
            && other.min.y >= self.min.y - epsilon
            && other.min.z >= self.min.z - epsilon
            && other.max.x <= self.max.x + epsilon
            && other.max.y <= self.max.y + epsilon
            && other.max.z <= self.max.z + epsilon
    }

    /// Plate-plane containment: ignores the vertical axis. Used by the
    /// placement search, where a horizontal offset cannot change height.
    pub fn contains_xy(&self, other: &Aabb, epsilon: f64) -> bool {
        other.min.x >= self.min.x - epsilon
            && other.min.y >= self.min.y - epsilon
            && other.max.x <= self.max.x + epsilon
            && other.max.y <= self.max.y + epsilon
    }

    /// Extents along each axis.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center point of the box.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Builds the rotation taking `source` onto `target`.
///
/// Uses the quaternion `(source x target, |target||source| + target . source)`
/// normalized. Parallel inputs yield the identity. Anti-parallel inputs
/// have no defined axis, so the convention here is a half-turn about an
/// arbitrary axis orthogonal to `target`.
pub fn rotation_between(target: &Vector3<f64>, source: &Vector3<f64>) -> UnitQuaternion<f64> {
    let axis = source.cross(target);
    let w = target.norm() * source.norm() + target.dot(source);
    let q = Quaternion::new(w, axis.x, axis.y, axis.z);
    if q.norm() < 1e-12 {
        if target.norm() < 1e-12 || source.norm() < 1e-12 {
            return UnitQuaternion::identity();
        }
        // Anti-parallel: rotate a half turn about any perpendicular axis.
        let perp = orthogonal(target);
        return UnitQuaternion::from_axis_angle(&Unit::new_normalize(perp), std::f64::consts::PI);
    }
    UnitQuaternion::new_normalize(q)
}

/// Any vector orthogonal to `v` (non-zero input assumed).
fn orthogonal(v: &Vector3<f64>) -> Vector3<f64> {
    // Cross with the axis v is least aligned with.
    let abs = v.abs();
    let pick = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&pick)
}

/// Converts intrinsic XYZ Euler angles (radians) to a quaternion.
pub fn euler_to_quaternion(euler: &Vector3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(euler.x, euler.y, euler.z)
}

/// Converts a quaternion to intrinsic XYZ Euler angles (radians).
pub fn quaternion_to_euler(rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
    let (roll, pitch, yaw) = rotation.euler_angles();
    Vector3::new(roll, pitch, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_intersection_and_touching() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
        let b = Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(15.0, 15.0, 15.0));
        let c = Aabb::new(Point3::new(10.0, 0.0, 0.0), Point3::new(20.0, 10.0, 10.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Shared face only
        assert!(!a.intersects(&c));
    }

    #[test]
    fn aabb_containment_with_slack() {
        let volume = Aabb::new(
            Point3::new(-100.0, -100.0, 0.0),
            Point3::new(100.0, 100.0, 200.0),
        );
        let inside = Aabb::new(Point3::new(-5.0, -5.0, 0.0), Point3::new(5.0, 5.0, 10.0));
        let outside = inside.translated(&Vector3::new(150.0, 0.0, 0.0));

        assert!(volume.contains(&inside, 1e-6));
        assert!(!volume.contains(&outside, 1e-6));
        assert!(volume.contains_xy(&inside, 1e-6));
        assert!(!volume.contains_xy(&outside, 1e-6));
    }

    #[test]
    fn rotation_between_aligns_vectors() {
        let source = Vector3::new(1.0, 1.0, 1.0);
        let target = Vector3::new(0.0, 0.0, -1.0);
        let q = rotation_between(&target, &source);
        let rotated = q * source.normalize();
        assert!((rotated - target.normalize()).norm() < 1e-9);
    }

    #[test]
    fn rotation_between_parallel_is_identity() {
        let v = Vector3::new(0.3, -0.4, 0.5);
        let q = rotation_between(&v, &v);
        assert!(q.angle() < 1e-9);
    }

    #[test]
    fn rotation_between_antiparallel_is_half_turn() {
        let v = Vector3::new(0.0, 0.0, 1.0);
        let q = rotation_between(&v, &-v);
        assert!((q.angle() - std::f64::consts::PI).abs() < 1e-9);
        let rotated = q * (-v);
        assert!((rotated - v).norm() < 1e-9);
    }

    #[test]
    fn euler_round_trip() {
        let euler = Vector3::new(0.2, -0.5, 1.1);
        let q = euler_to_quaternion(&euler);
        let back = quaternion_to_euler(&q);
        assert!((euler - back).norm() < 1e-9);
    }
}
