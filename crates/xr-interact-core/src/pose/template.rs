//! Pose templates and their binary encoding
//!
//! Layout, all little-endian `f32`:
//!
//! ```text
//! [J] [J x 16 row-major 4x4 joint matrices] [J weights]
//! ```

use crate::error::{InteractionError, Result};
use crate::hand::JointBuffer;
use crate::spatial::{Matrix4, Quaternion};

const FLOATS_PER_MATRIX: usize = 16;

/// A stored reference pose: wrist-relative joint rotations and how much
/// each joint counts when matching.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseTemplate {
    rotations: Vec<Quaternion>,
    weights: Vec<f32>,
}

impl PoseTemplate {
    pub fn new(rotations: Vec<Quaternion>, weights: Vec<f32>) -> Result<Self> {
        if rotations.len() != weights.len() {
            return Err(InteractionError::MalformedTemplate(format!(
                "{} rotations but {} weights",
                rotations.len(),
                weights.len()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
            return Err(InteractionError::MalformedTemplate(format!(
                "joint weight {bad} is not a non-negative number"
            )));
        }
        Ok(Self { rotations, weights })
    }

    /// Capture a live skeleton with every weight set to 1, optionally mirrored
    /// into the other hand's space.
    pub fn from_joint_buffer(buffer: &JointBuffer, mirror: bool) -> Self {
        let rotations: Vec<_> = buffer
            .rotations()
            .into_iter()
            .map(|q| if mirror { q.mirrored() } else { q })
            .collect();
        let weights = vec![1.0; rotations.len()];
        Self { rotations, weights }
    }

    pub fn joint_count(&self) -> usize {
        self.rotations.len()
    }

    pub fn rotations(&self) -> &[Quaternion] {
        &self.rotations
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Decode the binary layout. Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(InteractionError::MalformedTemplate(format!(
                "payload of {} bytes is not a whole number of floats",
                bytes.len()
            )));
        }
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        let Some(&header) = floats.first() else {
            return Err(InteractionError::MalformedTemplate("empty payload".to_string()));
        };
        if !header.is_finite() || header < 0.0 || header.fract() != 0.0 {
            return Err(InteractionError::MalformedTemplate(format!(
                "invalid joint count {header}"
            )));
        }

        let joints = header as usize;
        let needed = joints
            .checked_mul(FLOATS_PER_MATRIX + 1)
            .and_then(|n| n.checked_add(1));
        match needed {
            Some(needed) if needed <= floats.len() => {}
            _ => {
                return Err(InteractionError::MalformedTemplate(format!(
                    "{joints} joints need more than the {} floats provided",
                    floats.len()
                )))
            }
        }

        let matrices_end = 1 + joints * FLOATS_PER_MATRIX;
        if let Some(offset) = floats[1..matrices_end].iter().position(|f| !f.is_finite()) {
            return Err(InteractionError::MalformedTemplate(format!(
                "joint {} matrix holds a non-finite value",
                offset / FLOATS_PER_MATRIX
            )));
        }

        let rotations = (0..joints)
            .map(|j| {
                let base = 1 + j * FLOATS_PER_MATRIX;
                let values: [f32; FLOATS_PER_MATRIX] = std::array::from_fn(|k| floats[base + k]);
                Quaternion::from_rotation_matrix(&Matrix4::from_row_major(&values).rotation_block())
            })
            .collect();

        let weights = floats[matrices_end..matrices_end + joints].to_vec();

        Self::new(rotations, weights)
    }

    /// Encode into the binary layout (rotation-only matrices)
    pub fn to_bytes(&self) -> Vec<u8> {
        let matrices = self.rotations.iter().map(|q| {
            let r = q.to_rotation_matrix();
            Matrix4::from_rows([
                [r[0][0], r[0][1], r[0][2], 0.0],
                [r[1][0], r[1][1], r[1][2], 0.0],
                [r[2][0], r[2][1], r[2][2], 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ])
        });
        encode(matrices, &self.weights)
    }

    /// Serialize a raw skeleton snapshot (matrices as tracked, translation
    /// included) with unit weights, for authoring new templates.
    pub fn snapshot_bytes(buffer: &JointBuffer, mirror: bool) -> Vec<u8> {
        let matrices = buffer
            .matrices()
            .iter()
            .map(|m| if mirror { m.mirrored() } else { *m });
        encode(matrices, &vec![1.0; buffer.len()])
    }
}

fn encode(matrices: impl Iterator<Item = Matrix4>, weights: &[f32]) -> Vec<u8> {
    let mut floats = Vec::with_capacity(1 + weights.len() * (FLOATS_PER_MATRIX + 1));
    floats.push(weights.len() as f32);
    for m in matrices {
        floats.extend_from_slice(&m.to_row_major());
    }
    floats.extend_from_slice(weights);
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}
