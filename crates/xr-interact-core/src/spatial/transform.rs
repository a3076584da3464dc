//! Object transform: position, rotation and scale

use super::{Point3D, Quaternion, RigidTransform, Vector3D};

/// The full transform of a grabbable object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3D,
    pub rotation: Quaternion,
    pub scale: Vector3D,
}

impl Transform {
    /// Identity transform (origin, no rotation, unit scale)
    pub fn identity() -> Self {
        Self {
            position: Point3D::ORIGIN,
            rotation: Quaternion::IDENTITY,
            scale: Vector3D::ONE,
        }
    }

    /// Create a transform with just position
    pub fn from_position(position: Point3D) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Point3D, rotation: Quaternion) -> Self {
        Self {
            position,
            rotation,
            scale: Vector3D::ONE,
        }
    }

    /// Set a uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3D::ONE * scale;
        self
    }

    /// Position and rotation without the scale
    pub fn rigid(&self) -> RigidTransform {
        RigidTransform::new(self.position, self.rotation)
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, local: Point3D) -> Point3D {
        let scaled = Vector3D::new(
            local.x * self.scale.x,
            local.y * self.scale.y,
            local.z * self.scale.z,
        );
        self.position + self.rotation.rotate_vector(scaled)
    }

    /// True when every component is finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// Component-wise comparison within `tolerance`; rotations compare by angle
    pub fn approx_eq(&self, other: &Transform, tolerance: f32) -> bool {
        self.position.distance(&other.position) <= tolerance
            && self.rotation.angle_between(&other.rotation) <= tolerance
            && (self.scale - other.scale).magnitude() <= tolerance
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
