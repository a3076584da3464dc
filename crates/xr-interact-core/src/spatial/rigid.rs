//! Rigid transforms (position + unit rotation, no scale)

use super::{Matrix4, Point3D, Quaternion, Vector3D};

/// A rigid body pose: where it is and which way it faces
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RigidTransform {
    pub position: Point3D,
    pub rotation: Quaternion,
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        position: Point3D::ORIGIN,
        rotation: Quaternion::IDENTITY,
    };

    pub fn new(position: Point3D, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    /// Map a point from this transform's local frame into its parent frame
    pub fn transform_point(&self, local: Point3D) -> Point3D {
        self.position + self.rotation.rotate_vector(local.to_vector())
    }

    /// The transform that undoes this one
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        let position = Point3D::from(rotation.rotate_vector(-self.position.to_vector()));
        Self { position, rotation }
    }

    /// Apply `self` inside the frame of `parent` (`parent * self` as matrices).
    ///
    /// The resulting rotation is renormalized so long chains stay unit length.
    pub fn compose(&self, parent: &RigidTransform) -> Self {
        Self {
            position: parent.transform_point(self.position),
            rotation: (parent.rotation * self.rotation).normalize(),
        }
    }

    /// Express this transform in the local frame of `reference`
    pub fn relative_to(&self, reference: &RigidTransform) -> Self {
        self.compose(&reference.inverse())
    }

    /// Reflect across the YZ plane
    pub fn mirrored(&self) -> Self {
        Self {
            position: self.position.mirrored(),
            rotation: self.rotation.mirrored(),
        }
    }

    /// Row-major 4x4 matrix with the translation in the last column
    pub fn to_matrix(&self) -> Matrix4 {
        let r = self.rotation.to_rotation_matrix();
        let p = self.position;
        Matrix4::from_rows([
            [r[0][0], r[0][1], r[0][2], p.x],
            [r[1][0], r[1][1], r[1][2], p.y],
            [r[2][0], r[2][1], r[2][2], p.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Inverse of [`RigidTransform::to_matrix`]
    pub fn from_matrix(m: &Matrix4) -> Self {
        let t = m.translation();
        Self {
            position: Point3D::new(t.x, t.y, t.z),
            rotation: Quaternion::from_rotation_matrix(&m.rotation_block()),
        }
    }

    /// Translation only
    pub fn from_translation(offset: Vector3D) -> Self {
        Self {
            position: Point3D::from(offset),
            rotation: Quaternion::IDENTITY,
        }
    }
}
