//! Unit quaternions for rigid rotations
//!
//! `a * b` is the Hamilton product: the rotation `b` followed by `a`.
//! [`Quaternion::then`] reads in application order instead.

use std::f32::consts::PI;
use std::ops::Mul;

use super::Vector3D;

/// A rotation in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a new quaternion
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle_radians` about `axis`
    pub fn from_axis_angle(axis: Vector3D, angle_radians: f32) -> Self {
        let half_angle = angle_radians / 2.0;
        let sin_half = half_angle.sin();
        let axis = axis.normalize();

        Self {
            x: axis.x * sin_half,
            y: axis.y * sin_half,
            z: axis.z * sin_half,
            w: half_angle.cos(),
        }
    }

    /// Shortest rotation taking unit vector `from` onto unit vector `to`.
    ///
    /// Antiparallel input has no unique shortest arc; a half turn about an
    /// arbitrary perpendicular axis is returned.
    pub fn from_rotation_arc(from: Vector3D, to: Vector3D) -> Self {
        let d = from.dot(&to);
        if d < -1.0 + 1e-6 {
            return Self::from_axis_angle(from.any_orthogonal(), PI);
        }
        let c = from.cross(&to);
        Self::new(c.x, c.y, c.z, 1.0 + d).normalize()
    }

    /// Build from the upper-left 3x3 of a row-major matrix
    pub fn from_rotation_matrix(m: &[[f32; 3]; 3]) -> Self {
        let trace = m[0][0] + m[1][1] + m[2][2];
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new(
                (m[2][1] - m[1][2]) / s,
                (m[0][2] - m[2][0]) / s,
                (m[1][0] - m[0][1]) / s,
                0.25 * s,
            )
        } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
            let s = (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt() * 2.0;
            Self::new(
                0.25 * s,
                (m[0][1] + m[1][0]) / s,
                (m[0][2] + m[2][0]) / s,
                (m[2][1] - m[1][2]) / s,
            )
        } else if m[1][1] > m[2][2] {
            let s = (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt() * 2.0;
            Self::new(
                (m[0][1] + m[1][0]) / s,
                0.25 * s,
                (m[1][2] + m[2][1]) / s,
                (m[0][2] - m[2][0]) / s,
            )
        } else {
            let s = (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt() * 2.0;
            Self::new(
                (m[0][2] + m[2][0]) / s,
                (m[1][2] + m[2][1]) / s,
                0.25 * s,
                (m[1][0] - m[0][1]) / s,
            )
        };
        q.normalize()
    }

    /// Row-major 3x3 rotation matrix
    pub fn to_rotation_matrix(&self) -> [[f32; 3]; 3] {
        let Self { x, y, z, w } = *self;
        [
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - z * w),
                2.0 * (x * z + y * w),
            ],
            [
                2.0 * (x * y + z * w),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - x * w),
            ],
            [
                2.0 * (x * z - y * w),
                2.0 * (y * z + x * w),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ]
    }

    /// Get the magnitude of the quaternion
    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalize the quaternion
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
                w: self.w / mag,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Four-component dot product
    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Get the conjugate of the quaternion
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Get the inverse of the quaternion
    pub fn inverse(&self) -> Self {
        let mag_sq = self.dot(self);
        if mag_sq > 0.0 {
            let inv_mag_sq = 1.0 / mag_sq;
            Self {
                x: -self.x * inv_mag_sq,
                y: -self.y * inv_mag_sq,
                z: -self.z * inv_mag_sq,
                w: self.w * inv_mag_sq,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Apply `next` after this rotation
    pub fn then(&self, next: &Quaternion) -> Self {
        *next * *self
    }

    /// Shortest-arc angle in radians between two rotations, in `[0, PI]`
    pub fn angle_between(&self, other: &Quaternion) -> f32 {
        // atan2 of the relative rotation stays accurate for tiny angles,
        // where acos of the dot product loses most of its precision
        let r = self.conjugate() * *other;
        let sin_half = (r.x * r.x + r.y * r.y + r.z * r.z).sqrt();
        2.0 * sin_half.atan2(r.w.abs())
    }

    /// Normalized linear interpolation along the shorter arc
    pub fn nlerp(&self, other: &Quaternion, t: f32) -> Self {
        let sign = if self.dot(other) < 0.0 { -1.0 } else { 1.0 };
        Quaternion::new(
            self.x + t * (sign * other.x - self.x),
            self.y + t * (sign * other.y - self.y),
            self.z + t * (sign * other.z - self.z),
            self.w + t * (sign * other.w - self.w),
        )
        .normalize()
    }

    /// Rotate a vector by this quaternion
    pub fn rotate_vector(&self, v: Vector3D) -> Vector3D {
        let q_vec = Vector3D::new(self.x, self.y, self.z);
        let uv = q_vec.cross(&v);
        let uuv = q_vec.cross(&uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// The same rotation seen through a reflection across the YZ plane.
    ///
    /// Negates X and the scalar part, which maps a right-hand joint rotation
    /// onto its left-hand counterpart. Angles between rotations survive it.
    pub fn mirrored(&self) -> Self {
        Self::new(-self.x, self.y, self.z, -self.w)
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Self) -> Self::Output {
        Quaternion::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vector3D, b: Vector3D) {
        assert!((a - b).magnitude() < 0.0001, "{a:?} != {b:?}");
    }

    #[test]
    fn test_90_degree_rotation() {
        let q = Quaternion::from_axis_angle(Vector3D::UP, FRAC_PI_2);
        assert_vec_eq(q.rotate_vector(Vector3D::FORWARD), Vector3D::RIGHT);
    }

    #[test]
    fn test_inverse() {
        let q = Quaternion::from_axis_angle(Vector3D::UP, PI / 4.0);
        let result = q * q.inverse();
        assert!((result.w - 1.0).abs() < 0.0001);
        assert!(result.x.abs() < 0.0001);
        assert!(result.y.abs() < 0.0001);
        assert!(result.z.abs() < 0.0001);
    }

    #[test]
    fn test_then_applies_in_order() {
        let yaw = Quaternion::from_axis_angle(Vector3D::UP, FRAC_PI_2);
        let pitch = Quaternion::from_axis_angle(Vector3D::RIGHT, FRAC_PI_2);
        let combined = yaw.then(&pitch);
        let stepwise = pitch.rotate_vector(yaw.rotate_vector(Vector3D::FORWARD));
        assert_vec_eq(combined.rotate_vector(Vector3D::FORWARD), stepwise);
    }

    #[test]
    fn test_angle_between() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vector3D::FORWARD, 0.5);
        assert!((a.angle_between(&b) - 0.5).abs() < 0.001);
        // q and -q describe the same rotation
        let neg = Quaternion::new(-b.x, -b.y, -b.z, -b.w);
        assert!(b.angle_between(&neg) < 0.001);
    }

    #[test]
    fn test_rotation_arc() {
        let from = Vector3D::RIGHT;
        let to = Vector3D::new(1.0, 1.0, 0.0).normalize();
        let q = Quaternion::from_rotation_arc(from, to);
        assert_vec_eq(q.rotate_vector(from), to);
        assert!((q.angle_between(&Quaternion::IDENTITY) - PI / 4.0).abs() < 0.001);
    }

    #[test]
    fn test_rotation_arc_parallel_and_antiparallel() {
        let same = Quaternion::from_rotation_arc(Vector3D::UP, Vector3D::UP);
        assert!(same.angle_between(&Quaternion::IDENTITY) < 0.001);

        let flipped = Quaternion::from_rotation_arc(Vector3D::UP, -Vector3D::UP);
        assert_vec_eq(flipped.rotate_vector(Vector3D::UP), -Vector3D::UP);
    }

    #[test]
    fn test_matrix_conversion() {
        let q = Quaternion::from_axis_angle(Vector3D::new(1.0, 2.0, -0.5), 2.4);
        let back = Quaternion::from_rotation_matrix(&q.to_rotation_matrix());
        assert!(q.angle_between(&back) < 0.001);
    }

    #[test]
    fn test_mirror_preserves_angles() {
        let a = Quaternion::from_axis_angle(Vector3D::new(0.3, 1.0, 0.2), 0.9);
        let b = Quaternion::from_axis_angle(Vector3D::new(-1.0, 0.1, 0.5), 1.7);
        let direct = a.angle_between(&b);
        let mirrored = a.mirrored().angle_between(&b.mirrored());
        assert!((direct - mirrored).abs() < 0.0001);
    }

    #[test]
    fn test_mirror_reflects_rotated_vectors() {
        let q = Quaternion::from_axis_angle(Vector3D::new(0.3, 1.0, 0.2), 0.9);
        let v = Vector3D::new(0.5, -0.25, 1.0);
        assert_vec_eq(
            q.mirrored().rotate_vector(v.mirrored()),
            q.rotate_vector(v).mirrored(),
        );
    }
}
