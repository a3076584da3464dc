//! Synthetic hands and scripted grabs
//!
//! Stand-ins for XR hardware: hand shapes that can be captured as templates
//! or fed through a tracking source, and pointer scripts for grab replay.

use std::f32::consts::FRAC_PI_2;

use clap::ValueEnum;
use xr_interact_core::hand::FixedTracking;
use xr_interact_core::input::PointerSimulator;
use xr_interact_core::{HandJoint, Handedness, JointBuffer, Point3D, Quaternion, RigidTransform, Vector3D};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HandShape {
    Open,
    Fist,
    Point,
    Pinch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// Sideways offset of the finger's base from the wrist, right hand
    fn lateral(self) -> f32 {
        match self {
            Finger::Thumb => -0.035,
            Finger::Index => -0.02,
            Finger::Middle => 0.0,
            Finger::Ring => 0.018,
            Finger::Pinky => 0.034,
        }
    }
}

/// Finger and segment (0 = metacarpal) a joint belongs to
fn finger_of(joint: HandJoint) -> Option<(Finger, usize)> {
    const FINGERS: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];
    match joint.index() {
        0 => None,
        i @ 1..=4 => Some((Finger::Thumb, i - 1)),
        i => Some((FINGERS[(i - 5) / 5], (i - 5) % 5)),
    }
}

impl HandShape {
    /// Bend per segment, in radians
    fn curl(self, finger: Finger) -> f32 {
        match (self, finger) {
            (HandShape::Open, _) => 0.05,
            (HandShape::Fist | HandShape::Point, Finger::Thumb) => 0.6,
            (HandShape::Point, Finger::Index) => 0.05,
            (HandShape::Fist | HandShape::Point, _) => 1.3,
            (HandShape::Pinch, Finger::Thumb | Finger::Index) => 0.7,
            (HandShape::Pinch, _) => 0.15,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandShape::Open => "open",
            HandShape::Fist => "fist",
            HandShape::Point => "point",
            HandShape::Pinch => "pinch",
        }
    }

    /// Wrist-relative joint transforms of a right hand in this shape.
    /// Metacarpals stay flat and the bend accumulates towards the tip.
    pub fn local_joints(self) -> Vec<RigidTransform> {
        HandJoint::ALL
            .iter()
            .map(|joint| match finger_of(*joint) {
                None => RigidTransform::IDENTITY,
                Some((finger, segment)) => {
                    let segment = segment as f32;
                    RigidTransform::new(
                        Point3D::new(finger.lateral(), 0.03 + 0.02 * segment, 0.0),
                        Quaternion::from_axis_angle(Vector3D::RIGHT, self.curl(finger) * segment),
                    )
                }
            })
            .collect()
    }

    pub fn joint_buffer(self, handedness: Handedness) -> JointBuffer {
        let right = JointBuffer::from_local_transforms(Handedness::Right, &self.local_joints());
        match handedness {
            Handedness::Right => right,
            Handedness::Left => right.mirrored(),
        }
    }

    /// Report this shape for `handedness` with its wrist at `wrist`
    pub fn track(self, tracking: &mut FixedTracking, handedness: Handedness, wrist: RigidTransform) {
        for (joint, local) in HandJoint::ALL.iter().zip(self.local_joints()) {
            let local = match handedness {
                Handedness::Right => local,
                Handedness::Left => local.mirrored(),
            };
            tracking.set_joint(handedness, *joint, local.compose(&wrist));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GrabScript {
    /// One pointer drags the object sideways and lets go
    Drag,
    /// Two pointers pull apart, doubling the object's size
    Stretch,
    /// One pointer turns a quarter turn about the vertical axis
    Twist,
    /// Second pointer joins, the first leaves, the second carries on
    Regrab,
}

impl GrabScript {
    /// Queue the script's pointer events around `origin`
    pub fn build(self, origin: Point3D, steps: u32) -> PointerSimulator {
        let mut sim = PointerSimulator::new();
        let at = |x: f32, y: f32| origin + Vector3D::new(x, y, 0.0);

        match self {
            GrabScript::Drag => {
                let hand = sim.press(origin, Quaternion::IDENTITY);
                sim.drag_to(hand, at(0.3, 0.1), Quaternion::IDENTITY, steps);
                sim.release(hand);
            }
            GrabScript::Stretch => {
                let left = sim.press(at(-0.1, 0.0), Quaternion::IDENTITY);
                let right = sim.press(at(0.1, 0.0), Quaternion::IDENTITY);
                sim.drag_together(&[(left, at(-0.2, 0.0)), (right, at(0.2, 0.0))], steps);
                sim.release(right);
                sim.release(left);
            }
            GrabScript::Twist => {
                let hand = sim.press(origin, Quaternion::IDENTITY);
                let turned = Quaternion::from_axis_angle(Vector3D::UP, FRAC_PI_2);
                sim.drag_to(hand, origin, turned, steps);
                sim.release(hand);
            }
            GrabScript::Regrab => {
                let first = sim.press(at(-0.1, 0.0), Quaternion::IDENTITY);
                sim.drag_to(first, at(-0.1, 0.2), Quaternion::IDENTITY, steps);
                let second = sim.press(at(0.1, 0.2), Quaternion::IDENTITY);
                sim.drag_together(&[(first, at(-0.2, 0.2)), (second, at(0.2, 0.2))], steps);
                sim.leave(first);
                sim.drag_to(second, at(0.2, 0.5), Quaternion::IDENTITY, steps);
                sim.release(second);
            }
        }
        sim
    }
}
