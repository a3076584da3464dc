//! Tracking source contract and device kinds

use std::collections::HashMap;

use super::{HandJoint, Handedness};
use crate::spatial::RigidTransform;

/// Reference space poses are reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferenceSpace {
    Viewer,
    #[default]
    Local,
    LocalFloor,
    BoundedFloor,
    Unbounded,
}

/// Per-frame pose queries answered by the XR runtime.
///
/// `None` means the runtime has no valid pose for that joint this frame.
pub trait TrackingSource {
    fn joint_pose(
        &self,
        handedness: Handedness,
        joint: HandJoint,
        space: ReferenceSpace,
    ) -> Option<RigidTransform>;

    fn grip_pose(&self, handedness: Handedness, space: ReferenceSpace) -> Option<RigidTransform>;
}

/// What kind of tracked input a pose updater serves; fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedDevice {
    /// Articulated hand with a full joint skeleton
    Hand(Handedness),
    /// Controller with a single grip pose
    Controller(Handedness),
}

impl TrackedDevice {
    pub fn handedness(&self) -> Handedness {
        match self {
            TrackedDevice::Hand(h) | TrackedDevice::Controller(h) => *h,
        }
    }

    pub fn is_hand(&self) -> bool {
        matches!(self, TrackedDevice::Hand(_))
    }

    /// Joints in this device's buffer
    pub fn joint_count(&self) -> usize {
        match self {
            TrackedDevice::Hand(_) => HandJoint::COUNT,
            TrackedDevice::Controller(_) => 1,
        }
    }
}

/// A tracking source answering from a fixed table of poses.
///
/// Poses are reported the same for every reference space. Useful for replaying
/// recorded frames and for tests.
#[derive(Debug, Clone, Default)]
pub struct FixedTracking {
    joints: HashMap<(Handedness, HandJoint), RigidTransform>,
    grips: HashMap<Handedness, RigidTransform>,
}

impl FixedTracking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_joint(&mut self, handedness: Handedness, joint: HandJoint, pose: RigidTransform) {
        self.joints.insert((handedness, joint), pose);
    }

    pub fn clear_joint(&mut self, handedness: Handedness, joint: HandJoint) {
        self.joints.remove(&(handedness, joint));
    }

    pub fn set_grip(&mut self, handedness: Handedness, pose: RigidTransform) {
        self.grips.insert(handedness, pose);
    }

    pub fn clear_grip(&mut self, handedness: Handedness) {
        self.grips.remove(&handedness);
    }
}

impl TrackingSource for FixedTracking {
    fn joint_pose(
        &self,
        handedness: Handedness,
        joint: HandJoint,
        _space: ReferenceSpace,
    ) -> Option<RigidTransform> {
        self.joints.get(&(handedness, joint)).copied()
    }

    fn grip_pose(&self, handedness: Handedness, _space: ReferenceSpace) -> Option<RigidTransform> {
        self.grips.get(&handedness).copied()
    }
}
