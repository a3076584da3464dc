//! xr-interact-core: grab manipulation and hand pose recognition for XR input
//!
//! This crate provides:
//! - Rigid transform math (vectors, quaternions, row-major matrices)
//! - A grab solver turning one or two contact points into move/rotate/scale
//! - Tracked hand and controller pose updaters feeding joint buffers
//! - Binary pose templates, a memoizing async template cache and a matcher
//! - A frame loop that advances all of the above once per tick

pub mod config;
pub mod error;
pub mod frame;
pub mod grab;
pub mod hand;
pub mod input;
pub mod pose;
pub mod spatial;

// Re-export commonly used types
pub use config::InteractionConfig;
pub use error::{InteractionError, Result};
pub use frame::{FrameContext, FrameHandler, FrameRunner, InteractionFrame};
pub use grab::{GrabSignal, GrabState, Grabbable};
pub use hand::{HandJoint, Handedness, JointBuffer, PoseUpdater, TrackedDevice, TrackingSource};
pub use input::{resolve_profile, ContactId, PointerEvent};
pub use pose::{MatchResult, PoseMatcher, PoseTemplate, TemplateCache};
pub use spatial::{Point3D, Quaternion, RigidTransform, Transform, Vector3D};
