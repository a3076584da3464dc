//! Contact points between an input device and a grabbed object

use crate::input::ContactId;
use crate::spatial::{Point3D, Quaternion};

/// One pointer holding the object.
///
/// The start fields are the anchor the solver measures motion from; they are
/// reset whenever the owning session rebases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub id: ContactId,
    pub start_position: Point3D,
    pub current_position: Point3D,
    pub start_rotation: Quaternion,
    pub current_rotation: Quaternion,
}

impl ContactPoint {
    /// New contact with start and current fields equal
    pub fn new(id: ContactId, point: Point3D, orientation: Quaternion) -> Self {
        Self {
            id,
            start_position: point,
            current_position: point,
            start_rotation: orientation,
            current_rotation: orientation,
        }
    }

    /// Record the latest device pose
    pub fn update(&mut self, point: Point3D, orientation: Quaternion) {
        self.current_position = point;
        self.current_rotation = orientation;
    }

    /// Make the current pose the new anchor
    pub fn rebase(&mut self) {
        self.start_position = self.current_position;
        self.start_rotation = self.current_rotation;
    }

    /// Rotation the device has undergone since the anchor was taken, in world
    /// space: `current * start⁻¹`, so `delta * start == current`.
    pub fn delta_rotation(&self) -> Quaternion {
        self.start_rotation.inverse().then(&self.current_rotation)
    }
}
