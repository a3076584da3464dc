//! Per-frame copy of tracked poses into a joint buffer

use super::{HandJoint, Handedness, JointBuffer, ReferenceSpace, TrackedDevice, TrackingSource};
use crate::spatial::{Matrix4, RigidTransform};

/// Refreshes one device's joint buffer from a tracking source each frame
#[derive(Debug, Clone)]
pub struct PoseUpdater {
    device: TrackedDevice,
    space: ReferenceSpace,
    buffer: JointBuffer,
}

impl PoseUpdater {
    pub fn new(device: TrackedDevice, space: ReferenceSpace) -> Self {
        Self {
            device,
            space,
            buffer: JointBuffer::new(device.handedness(), device.joint_count()),
        }
    }

    pub fn device(&self) -> TrackedDevice {
        self.device
    }

    pub fn buffer(&self) -> &JointBuffer {
        &self.buffer
    }

    /// World pose to drive hand-attached contacts from, when tracking is valid
    pub fn anchor(&self) -> Option<RigidTransform> {
        self.buffer.is_valid().then(|| *self.buffer.wrist_world())
    }

    /// Pull this frame's poses. Returns whether the buffer is valid.
    ///
    /// A missing wrist (or grip) invalidates the whole buffer, since every
    /// other joint is only meaningful relative to it. Any other missing
    /// joint keeps its previous value.
    pub fn update(&mut self, source: &dyn TrackingSource) -> bool {
        let valid = match self.device {
            TrackedDevice::Hand(handedness) => self.update_hand(source, handedness),
            TrackedDevice::Controller(handedness) => {
                match source.grip_pose(handedness, self.space) {
                    Some(grip) => {
                        self.buffer.set_wrist_world(grip);
                        self.buffer.set_joint(0, Matrix4::IDENTITY);
                        true
                    }
                    None => false,
                }
            }
        };

        if !valid && self.buffer.is_valid() {
            tracing::debug!(device = ?self.device, "Tracking lost");
        }
        self.buffer.set_valid(valid);
        valid
    }

    fn update_hand(&mut self, source: &dyn TrackingSource, handedness: Handedness) -> bool {
        let Some(wrist) = source.joint_pose(handedness, HandJoint::Wrist, self.space) else {
            return false;
        };

        let to_wrist = wrist.inverse();
        self.buffer.set_wrist_world(wrist);
        self.buffer.set_joint(HandJoint::Wrist.index(), Matrix4::IDENTITY);

        let mut missing = 0usize;
        for joint in HandJoint::ALL.iter().skip(1) {
            match source.joint_pose(handedness, *joint, self.space) {
                Some(pose) => self
                    .buffer
                    .set_joint(joint.index(), pose.compose(&to_wrist).to_matrix()),
                None => missing += 1,
            }
        }
        if missing > 0 {
            tracing::trace!(missing, hand = handedness.as_str(), "Keeping stale joints");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::FixedTracking;
    use crate::spatial::{Point3D, Quaternion, Vector3D};

    fn wrist_pose() -> RigidTransform {
        RigidTransform::new(
            Point3D::new(0.1, 1.2, -0.4),
            Quaternion::from_axis_angle(Vector3D::UP, 0.9),
        )
    }

    fn tracked_hand() -> FixedTracking {
        let mut tracking = FixedTracking::new();
        let wrist = wrist_pose();
        tracking.set_joint(Handedness::Right, HandJoint::Wrist, wrist);
        for joint in HandJoint::ALL.iter().skip(1) {
            let local = RigidTransform::new(
                Point3D::new(0.0, 0.01 * joint.index() as f32, 0.0),
                Quaternion::from_axis_angle(Vector3D::RIGHT, 0.05 * joint.index() as f32),
            );
            tracking.set_joint(Handedness::Right, *joint, local.compose(&wrist));
        }
        tracking
    }

    #[test]
    fn test_joints_are_wrist_relative() {
        let tracking = tracked_hand();
        let mut updater = PoseUpdater::new(TrackedDevice::Hand(Handedness::Right), ReferenceSpace::Local);
        assert!(updater.update(&tracking));

        let buffer = updater.buffer();
        assert_eq!(buffer.joint(0), Some(&Matrix4::IDENTITY));
        let rotations = buffer.rotations();
        let expected = Quaternion::from_axis_angle(Vector3D::RIGHT, 0.05 * 9.0);
        assert!(rotations[HandJoint::IndexFingerTip.index()].angle_between(&expected) < 1e-3);

        let tip = RigidTransform::from_matrix(buffer.joint(9).unwrap());
        assert!(tip.position.distance(&Point3D::new(0.0, 0.09, 0.0)) < 1e-4);
    }

    #[test]
    fn test_missing_wrist_invalidates_hand() {
        let mut tracking = tracked_hand();
        let mut updater = PoseUpdater::new(TrackedDevice::Hand(Handedness::Right), ReferenceSpace::Local);
        assert!(updater.update(&tracking));
        assert!(updater.anchor().is_some());

        tracking.clear_joint(Handedness::Right, HandJoint::Wrist);
        assert!(!updater.update(&tracking));
        assert!(!updater.buffer().is_valid());
        assert!(updater.anchor().is_none());
    }

    #[test]
    fn test_missing_joint_keeps_previous_value() {
        let mut tracking = tracked_hand();
        let mut updater = PoseUpdater::new(TrackedDevice::Hand(Handedness::Right), ReferenceSpace::Local);
        updater.update(&tracking);
        let before = *updater.buffer().joint(HandJoint::ThumbTip.index()).unwrap();

        tracking.clear_joint(Handedness::Right, HandJoint::ThumbTip);
        assert!(updater.update(&tracking));
        assert_eq!(*updater.buffer().joint(HandJoint::ThumbTip.index()).unwrap(), before);
    }

    #[test]
    fn test_other_hand_is_not_tracked() {
        let tracking = tracked_hand();
        let mut updater = PoseUpdater::new(TrackedDevice::Hand(Handedness::Left), ReferenceSpace::Local);
        assert!(!updater.update(&tracking));
    }

    #[test]
    fn test_controller_grip() {
        let mut tracking = FixedTracking::new();
        let mut updater = PoseUpdater::new(
            TrackedDevice::Controller(Handedness::Left),
            ReferenceSpace::LocalFloor,
        );
        assert_eq!(updater.buffer().len(), 1);
        assert!(!updater.update(&tracking));

        tracking.set_grip(Handedness::Left, wrist_pose());
        assert!(updater.update(&tracking));
        assert_eq!(updater.anchor(), Some(wrist_pose()));
    }
}
