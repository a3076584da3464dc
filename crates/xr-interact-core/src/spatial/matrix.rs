//! Row-major 4x4 matrices as stored in joint buffers and pose templates

use std::ops::Mul;

use super::{Point3D, Vector3D};

/// A 4x4 matrix, `rows[r][c]`, acting on column vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    rows: [[f32; 4]; 4],
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Build from 16 floats in row-major order
    pub fn from_row_major(values: &[f32; 16]) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, v) in values.iter().enumerate() {
            rows[i / 4][i % 4] = *v;
        }
        Self { rows }
    }

    /// Flatten to 16 floats in row-major order
    pub fn to_row_major(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.rows[i / 4][i % 4];
        }
        out
    }

    pub fn rows(&self) -> &[[f32; 4]; 4] {
        &self.rows
    }

    /// Upper-left 3x3 block
    pub fn rotation_block(&self) -> [[f32; 3]; 3] {
        let r = &self.rows;
        [
            [r[0][0], r[0][1], r[0][2]],
            [r[1][0], r[1][1], r[1][2]],
            [r[2][0], r[2][1], r[2][2]],
        ]
    }

    /// Last column
    pub fn translation(&self) -> Vector3D {
        Vector3D::new(self.rows[0][3], self.rows[1][3], self.rows[2][3])
    }

    pub fn transform_point(&self, p: Point3D) -> Point3D {
        let r = &self.rows;
        Point3D::new(
            r[0][0] * p.x + r[0][1] * p.y + r[0][2] * p.z + r[0][3],
            r[1][0] * p.x + r[1][1] * p.y + r[1][2] * p.z + r[1][3],
            r[2][0] * p.x + r[2][1] * p.y + r[2][2] * p.z + r[2][3],
        )
    }

    /// Conjugate by a reflection across the YZ plane (`S * M * S`)
    pub fn mirrored(&self) -> Self {
        let mut rows = self.rows;
        // Entries in row 0 or column 0 flip sign, except the (0, 0) entry
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                if (r == 0) != (c == 0) {
                    *v = -*v;
                }
            }
        }
        Self { rows }
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..4).map(|k| self.rows[r][k] * rhs.rows[k][c]).sum();
            }
        }
        Matrix4 { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Quaternion, RigidTransform};

    fn sample() -> RigidTransform {
        RigidTransform::new(
            Point3D::new(0.4, -0.1, 0.9),
            Quaternion::from_axis_angle(Vector3D::new(1.0, 0.5, -0.2), 1.1),
        )
    }

    #[test]
    fn test_row_major_roundtrip() {
        let values: [f32; 16] = std::array::from_fn(|i| i as f32);
        let m = Matrix4::from_row_major(&values);
        assert_eq!(m.rows()[1][0], 4.0);
        assert_eq!(m.to_row_major(), values);
    }

    #[test]
    fn test_product_matches_rigid_compose() {
        let a = sample();
        let b = RigidTransform::new(
            Point3D::new(-0.3, 0.2, 0.1),
            Quaternion::from_axis_angle(Vector3D::UP, 0.4),
        );
        let via_matrix = RigidTransform::from_matrix(&(a.to_matrix() * b.to_matrix()));
        let via_rigid = b.compose(&a);
        assert!(via_matrix.position.distance(&via_rigid.position) < 0.0001);
        assert!(via_matrix.rotation.angle_between(&via_rigid.rotation) < 0.001);
    }

    #[test]
    fn test_mirrored_matches_rigid_mirror() {
        let t = sample();
        let via_matrix = RigidTransform::from_matrix(&t.to_matrix().mirrored());
        let via_rigid = t.mirrored();
        assert!(via_matrix.position.distance(&via_rigid.position) < 0.0001);
        assert!(via_matrix.rotation.angle_between(&via_rigid.rotation) < 0.001);
    }
}
