//! Joint buffers: one tracked skeleton per frame

use super::Handedness;
use crate::spatial::{Matrix4, Quaternion, RigidTransform};

/// Wrist-relative joint transforms for one device.
///
/// Joint 0 is the wrist (or controller grip) and is always identity; every
/// other entry is expressed in its frame. The wrist's world pose is kept
/// separately for consumers that need an anchor in interaction space.
#[derive(Debug, Clone, PartialEq)]
pub struct JointBuffer {
    handedness: Handedness,
    joints: Vec<Matrix4>,
    wrist_world: RigidTransform,
    valid: bool,
}

impl JointBuffer {
    /// A buffer of `count` identity joints, not yet valid
    pub fn new(handedness: Handedness, count: usize) -> Self {
        Self {
            handedness,
            joints: vec![Matrix4::IDENTITY; count.max(1)],
            wrist_world: RigidTransform::IDENTITY,
            valid: false,
        }
    }

    /// A valid buffer from transforms already relative to the wrist
    pub fn from_local_transforms(handedness: Handedness, joints: &[RigidTransform]) -> Self {
        let mut buffer = Self::new(handedness, joints.len());
        for (slot, joint) in buffer.joints.iter_mut().zip(joints) {
            *slot = joint.to_matrix();
        }
        buffer.joints[0] = Matrix4::IDENTITY;
        buffer.valid = true;
        buffer
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Whether this frame's data can be trusted
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn matrices(&self) -> &[Matrix4] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> Option<&Matrix4> {
        self.joints.get(index)
    }

    /// Wrist-relative rotation of every joint, in buffer order
    pub fn rotations(&self) -> Vec<Quaternion> {
        self.joints
            .iter()
            .map(|m| Quaternion::from_rotation_matrix(&m.rotation_block()))
            .collect()
    }

    /// World pose of the wrist (or grip) from the last valid update
    pub fn wrist_world(&self) -> &RigidTransform {
        &self.wrist_world
    }

    /// The same skeleton reflected into the other hand's space
    pub fn mirrored(&self) -> Self {
        Self {
            handedness: self.handedness.opposite(),
            joints: self.joints.iter().map(Matrix4::mirrored).collect(),
            wrist_world: self.wrist_world.mirrored(),
            valid: self.valid,
        }
    }

    pub(crate) fn set_joint(&mut self, index: usize, matrix: Matrix4) {
        if let Some(slot) = self.joints.get_mut(index) {
            *slot = matrix;
        }
    }

    pub(crate) fn set_wrist_world(&mut self, wrist: RigidTransform) {
        self.wrist_world = wrist;
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
}
