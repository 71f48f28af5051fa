//! Placed model: identity, source shape, transform, and cached bounds.

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use platekit_core::ModelId;

use crate::geometry::{self, Aabb};
use crate::mesh::{ConvexHull, Mesh};

/// The two kinds of placeable objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Full 3D mesh object.
    Solid3D,
    /// Flat rectangular image/vector placed on the work plane.
    Planar2D,
}

/// Mirror code for planar models: bit 0 mirrors X, bit 1 mirrors Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlipCode(u8);

impl FlipCode {
    /// Creates a flip code; values above 3 are masked to the two valid bits.
    pub fn new(code: u8) -> Self {
        Self(code & 0b11)
    }

    /// Whether the X axis is mirrored.
    pub fn mirror_x(&self) -> bool {
        self.0 & 0b01 != 0
    }

    /// Whether the Y axis is mirrored.
    pub fn mirror_y(&self) -> bool {
        self.0 & 0b10 != 0
    }

    /// The raw 0..=3 code.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

/// Position, rotation, scale, and mirror state of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelTransform {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
    pub flip: FlipCode,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            flip: FlipCode::default(),
        }
    }
}

impl ModelTransform {
    /// Composes the world matrix as translation * rotation * scale, with
    /// the flip code folded into the scale sign.
    pub fn matrix(&self) -> Matrix4<f64> {
        let mut scale = self.scale;
        if self.flip.mirror_x() {
            scale.x = -scale.x;
        }
        if self.flip.mirror_y() {
            scale.y = -scale.y;
        }
        Matrix4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&scale)
    }
}

/// Partial transform edit coming from UI input. Only the supplied
/// fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformPatch {
    pub position: Option<Vector3<f64>>,
    /// Rotation as intrinsic XYZ Euler angles, in radians.
    pub rotation_euler: Option<Vector3<f64>>,
    pub scale: Option<Vector3<f64>>,
    pub flip: Option<FlipCode>,
}

impl TransformPatch {
    pub fn position(position: Vector3<f64>) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn rotation_euler(euler: Vector3<f64>) -> Self {
        Self {
            rotation_euler: Some(euler),
            ..Self::default()
        }
    }

    pub fn scale(scale: Vector3<f64>) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn flip(flip: FlipCode) -> Self {
        Self {
            flip: Some(flip),
            ..Self::default()
        }
    }
}

/// Source geometry of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelShape {
    /// Owned indexed mesh of a 3D solid.
    Solid(Mesh),
    /// Flat rectangle of a 2D image/vector, sized in mm.
    Planar { width: f64, height: f64 },
}

/// One placed object on the build plate.
///
/// Models are exclusively owned by the `ModelGroup`; every mutation is
/// mediated by the group so snapshots stay consistent with the models
/// they capture.
#[derive(Debug, Clone)]
pub struct Model {
    id: ModelId,
    shape: ModelShape,
    transform: ModelTransform,
    convex_hull: Option<ConvexHull>,
    /// Valid only until the next transform mutation.
    cached_bounds: Option<Aabb>,
    /// View flag maintained by the group's overstep check.
    pub overstepped: bool,
    /// View flag maintained by the group's selection handling.
    pub selected: bool,
    /// Set when a planar model still needs its preview generated by the
    /// external image pipeline.
    pub needs_preview: bool,
}

impl Model {
    /// Creates a solid model from a mesh.
    pub fn solid(mesh: Mesh) -> Self {
        Self {
            id: ModelId::new(),
            shape: ModelShape::Solid(mesh),
            transform: ModelTransform::default(),
            convex_hull: None,
            cached_bounds: None,
            overstepped: false,
            selected: false,
            needs_preview: false,
        }
    }

    /// Creates a planar model of the given size.
    pub fn planar(width: f64, height: f64) -> Self {
        Self {
            id: ModelId::new(),
            shape: ModelShape::Planar { width, height },
            transform: ModelTransform::default(),
            convex_hull: None,
            cached_bounds: None,
            overstepped: false,
            selected: false,
            needs_preview: false,
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn source_kind(&self) -> SourceKind {
        match self.shape {
            ModelShape::Solid(_) => SourceKind::Solid3D,
            ModelShape::Planar { .. } => SourceKind::Planar2D,
        }
    }

    pub fn shape(&self) -> &ModelShape {
        &self.shape
    }

    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }

    /// Attaches the convex hull computed by the external geometry
    /// provider. The hull is owned by the model from here on.
    pub fn set_convex_hull(&mut self, hull: ConvexHull) {
        self.convex_hull = Some(hull);
    }

    pub fn convex_hull(&self) -> Option<&ConvexHull> {
        self.convex_hull.as_ref()
    }

    /// The convex hull transformed into world space, if one is attached.
    pub fn world_hull(&self) -> Option<ConvexHull> {
        self.convex_hull
            .as_ref()
            .map(|hull| hull.transformed(&self.transform.matrix()))
    }

    pub(crate) fn set_transform(&mut self, transform: ModelTransform) {
        self.transform = transform;
        self.invalidate_bounds();
    }

    pub(crate) fn set_position(&mut self, position: Vector3<f64>) {
        self.transform.position = position;
        self.invalidate_bounds();
    }

    pub(crate) fn set_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.transform.rotation = rotation;
        self.invalidate_bounds();
    }

    /// Applies the supplied fields of `patch`, leaving the rest alone.
    pub(crate) fn apply_patch(&mut self, patch: &TransformPatch) {
        if let Some(position) = patch.position {
            self.transform.position = position;
        }
        if let Some(euler) = patch.rotation_euler {
            self.transform.rotation = geometry::euler_to_quaternion(&euler);
        }
        if let Some(scale) = patch.scale {
            self.transform.scale = scale;
        }
        if let Some(flip) = patch.flip {
            self.transform.flip = flip;
        }
        self.invalidate_bounds();
    }

    /// Translates along Z so the lowest point rests on the plate.
    pub(crate) fn stick_to_plate(&mut self) {
        let bounds = self.bounding_box();
        self.transform.position.z -= bounds.min.z;
        self.invalidate_bounds();
    }

    fn invalidate_bounds(&mut self) {
        self.cached_bounds = None;
    }

    /// World-space bounding box, recomputed on demand after transform
    /// mutations.
    pub fn bounding_box(&mut self) -> Aabb {
        if let Some(bounds) = self.cached_bounds {
            return bounds;
        }
        let bounds = self.compute_bounds();
        self.cached_bounds = Some(bounds);
        bounds
    }

    /// World-space bounding box without touching the cache.
    pub fn compute_bounds(&self) -> Aabb {
        let matrix = self.transform.matrix();
        let bounds = match &self.shape {
            ModelShape::Solid(mesh) => {
                Aabb::from_points(mesh.vertices.iter().map(|v| matrix.transform_point(v)))
            }
            ModelShape::Planar { width, height } => {
                let (hx, hy) = (width / 2.0, height / 2.0);
                let corners = [
                    Point3::new(-hx, -hy, 0.0),
                    Point3::new(hx, -hy, 0.0),
                    Point3::new(hx, hy, 0.0),
                    Point3::new(-hx, hy, 0.0),
                ];
                Aabb::from_points(corners.iter().map(|c| matrix.transform_point(c)))
            }
        };
        // An empty mesh degenerates to a point at the model position.
        bounds.unwrap_or_else(|| {
            let at = Point3::from(self.transform.position);
            Aabb::new(at, at)
        })
    }
}
