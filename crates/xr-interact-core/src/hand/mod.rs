//! Tracked hands and controllers
//!
//! A [`PoseUpdater`] pulls per-joint poses from a [`TrackingSource`] each
//! frame and stores them wrist-relative in a [`JointBuffer`], which the pose
//! matcher reads.

mod buffer;
mod joints;
mod tracking;
mod updater;

pub use buffer::JointBuffer;
pub use joints::{HandJoint, Handedness};
pub use tracking::{FixedTracking, ReferenceSpace, TrackedDevice, TrackingSource};
pub use updater::PoseUpdater;
