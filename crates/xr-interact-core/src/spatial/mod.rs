//! Rigid transform utilities shared by the grab solver and the pose matcher
//!
//! Right-handed coordinates:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)
//!
//! Mirroring always reflects across the YZ plane (X is the primary axis).

mod matrix;
mod point3d;
mod quaternion;
mod rigid;
mod transform;
mod vector3d;

pub use matrix::Matrix4;
pub use point3d::Point3D;
pub use quaternion::Quaternion;
pub use rigid::RigidTransform;
pub use transform::Transform;
pub use vector3d::Vector3D;
