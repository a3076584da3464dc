//! Per-tick interaction driver

use std::collections::BTreeMap;

use super::{FrameContext, FrameHandler};
use crate::config::InteractionConfig;
use crate::error::{InteractionError, Result};
use crate::grab::{GrabSignal, Grabbable};
use crate::hand::{JointBuffer, PoseUpdater, ReferenceSpace, TrackedDevice, TrackingSource};
use crate::input::{ContactId, PointerEvent};
use crate::pose::{MatchResult, PoseMatcher, TemplateLookup};
use crate::spatial::Transform;

/// Handle for a grabbable registered with an [`InteractionFrame`]
pub type ObjectId = u32;

struct TrackedInput {
    updater: PoseUpdater,
    matcher: Option<PoseMatcher>,
    last_match: Option<MatchResult>,
}

/// A grab contact that follows a tracked device's anchor pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeviceContact {
    device: usize,
    object: ObjectId,
    contact: ContactId,
}

/// Owns the tracked devices and grabbable objects of one scene and advances
/// them each tick.
pub struct InteractionFrame<S, T> {
    config: InteractionConfig,
    tracking: S,
    templates: T,
    inputs: Vec<TrackedInput>,
    objects: BTreeMap<ObjectId, Grabbable>,
    attached: Vec<DeviceContact>,
    next_object_id: ObjectId,
    context: FrameContext,
    moved: Vec<ObjectId>,
}

impl<S: TrackingSource, T: TemplateLookup> InteractionFrame<S, T> {
    pub fn new(config: InteractionConfig, tracking: S, templates: T) -> Self {
        Self {
            config,
            tracking,
            templates,
            inputs: Vec::new(),
            objects: BTreeMap::new(),
            attached: Vec::new(),
            next_object_id: 0,
            context: FrameContext::new(),
            moved: Vec::new(),
        }
    }

    /// Track a hand or controller. Hands get a pose matcher when the pose
    /// library is non-empty. Returns the device's index.
    pub fn add_device(&mut self, device: TrackedDevice, space: ReferenceSpace) -> usize {
        let matcher = (device.is_hand() && !self.config.poses.library.is_empty())
            .then(|| PoseMatcher::from_config(&self.config.poses));
        self.inputs.push(TrackedInput {
            updater: PoseUpdater::new(device, space),
            matcher,
            last_match: None,
        });
        self.inputs.len() - 1
    }

    pub fn add_object(&mut self, transform: Transform) -> ObjectId {
        let id = self.next_object_id;
        self.next_object_id += 1;
        self.objects.insert(id, Grabbable::new(transform, &self.config.grab));
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<Grabbable> {
        self.attached.retain(|bound| bound.object != id);
        self.objects.remove(&id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Grabbable> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Grabbable)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    /// Route a pointer event to the object it targets
    pub fn dispatch(&mut self, id: ObjectId, event: &PointerEvent) -> Option<GrabSignal> {
        self.objects.get_mut(&id)?.handle_event(event)
    }

    /// Grab `object` with a tracked device.
    ///
    /// The contact starts at the device's anchor from the last tick and
    /// follows it on every tick where tracking is valid. While the anchor is
    /// lost the contact holds its last pose.
    pub fn attach(&mut self, device: usize, object: ObjectId, contact: ContactId) -> Result<Option<GrabSignal>> {
        let reject = |reason: String| InteractionError::AttachRejected { contact, reason };

        let input = self
            .inputs
            .get(device)
            .ok_or_else(|| reject(format!("no tracked device {device}")))?;
        let anchor = input
            .updater
            .anchor()
            .ok_or_else(|| reject(format!("{:?} is not tracked", input.updater.device())))?;
        let target = self
            .objects
            .get_mut(&object)
            .ok_or_else(|| reject(format!("no object {object}")))?;
        if target.session().contains(contact) {
            return Err(reject(format!("already holding object {object}")));
        }

        let signal = target.contact_down(contact, anchor.position, anchor.rotation);
        if !target.session().contains(contact) {
            return Err(reject(format!("object {object} is already fully held")));
        }

        tracing::debug!(device, object, contact, "Device contact attached");
        self.attached.push(DeviceContact { device, object, contact });
        Ok(signal)
    }

    /// Release a contact created by [`attach`](Self::attach)
    pub fn detach(&mut self, object: ObjectId, contact: ContactId) -> Option<GrabSignal> {
        let index = self
            .attached
            .iter()
            .position(|bound| bound.object == object && bound.contact == contact)?;
        self.attached.remove(index);
        self.objects.get_mut(&object)?.contact_up(contact)
    }

    pub fn buffer(&self, device: usize) -> Option<&JointBuffer> {
        self.inputs.get(device).map(|input| input.updater.buffer())
    }

    pub fn last_match(&self, device: usize) -> Option<&MatchResult> {
        self.inputs.get(device)?.last_match.as_ref()
    }

    /// Objects whose transform changed on the last tick
    pub fn moved(&self) -> &[ObjectId] {
        &self.moved
    }

    pub fn context(&self) -> &FrameContext {
        &self.context
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn tracking_mut(&mut self) -> &mut S {
        &mut self.tracking
    }

    pub fn templates(&self) -> &T {
        &self.templates
    }

    /// Build the next context from `dt` and run one tick
    pub fn advance(&mut self, dt: std::time::Duration) {
        let mut ctx = self.context.clone();
        ctx.update(dt);
        self.on_frame(&ctx);
    }
}

impl<S: TrackingSource, T: TemplateLookup> FrameHandler for InteractionFrame<S, T> {
    fn on_frame(&mut self, ctx: &FrameContext) {
        self.context = ctx.clone();

        for input in &mut self.inputs {
            input.updater.update(&self.tracking);
            let Some(matcher) = input.matcher.as_mut() else {
                continue;
            };
            input.last_match = matcher.update(input.updater.buffer(), &self.templates);
            if let Some(result) = input.last_match.as_ref().filter(|r| r.changed()) {
                tracing::debug!(
                    device = ?input.updater.device(),
                    pose = %result.name,
                    margin = result.confidence_margin,
                    tick = ctx.tick,
                    "Hand pose changed"
                );
            }
        }

        for bound in &self.attached {
            let Some(anchor) = self.inputs.get(bound.device).and_then(|input| input.updater.anchor()) else {
                tracing::trace!(device = bound.device, contact = bound.contact, "Anchor lost, holding contact");
                continue;
            };
            if let Some(object) = self.objects.get_mut(&bound.object) {
                object.contact_move(bound.contact, anchor.position, anchor.rotation);
            }
        }

        self.moved.clear();
        for (id, object) in &mut self.objects {
            let before = *object.transform();
            if object.on_frame() && *object.transform() != before {
                self.moved.push(*id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoseEntry;
    use crate::hand::{FixedTracking, HandJoint, Handedness};
    use crate::pose::{PoseTemplate, TemplateState};
    use crate::spatial::{Point3D, Quaternion, RigidTransform, Vector3D};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    struct Library(HashMap<String, Arc<PoseTemplate>>);

    impl TemplateLookup for Library {
        fn get_template(&self, path: &str) -> TemplateState {
            self.0
                .get(path)
                .map(|t| TemplateState::Ready(Arc::clone(t)))
                .unwrap_or(TemplateState::Pending)
        }
    }

    fn flat_hand(curl: f32) -> Vec<Quaternion> {
        (0..HandJoint::COUNT)
            .map(|i| {
                if i == 0 {
                    Quaternion::IDENTITY
                } else {
                    Quaternion::from_axis_angle(Vector3D::RIGHT, curl)
                }
            })
            .collect()
    }

    fn library() -> Library {
        let mut templates = HashMap::new();
        for (path, curl) in [("open.bin", 0.0), ("fist.bin", 1.5)] {
            let rotations = flat_hand(curl);
            let weights = vec![1.0; rotations.len()];
            templates.insert(path.to_string(), Arc::new(PoseTemplate::new(rotations, weights).unwrap()));
        }
        Library(templates)
    }

    fn config() -> InteractionConfig {
        let mut config = InteractionConfig::default();
        config.poses.library = vec![
            PoseEntry {
                name: "open".to_string(),
                path: "open.bin".to_string(),
            },
            PoseEntry {
                name: "fist".to_string(),
                path: "fist.bin".to_string(),
            },
        ];
        config
    }

    fn track_hand(tracking: &mut FixedTracking, handedness: Handedness, curl: f32) {
        let wrist = RigidTransform::from_translation(Vector3D::new(0.0, 1.0, -0.3));
        tracking.set_joint(handedness, HandJoint::Wrist, wrist);
        for (joint, rotation) in HandJoint::ALL.iter().zip(flat_hand(curl)).skip(1) {
            let local = RigidTransform::new(Point3D::new(0.0, 0.02, 0.0), rotation);
            tracking.set_joint(handedness, *joint, local.compose(&wrist));
        }
    }

    #[test]
    fn test_tick_runs_matcher_on_fresh_joints() {
        let mut tracking = FixedTracking::new();
        track_hand(&mut tracking, Handedness::Right, 1.4);
        let mut frame = InteractionFrame::new(config(), tracking, library());
        let hand = frame.add_device(TrackedDevice::Hand(Handedness::Right), ReferenceSpace::Local);

        frame.advance(Duration::from_millis(16));
        assert_eq!(frame.last_match(hand).unwrap().name, "fist");

        track_hand(frame.tracking_mut(), Handedness::Right, 0.1);
        frame.advance(Duration::from_millis(16));
        let result = frame.last_match(hand).unwrap();
        assert_eq!(result.name, "open");
        assert_eq!(result.previous_name.as_deref(), Some("fist"));
        assert_eq!(frame.context().tick, 2);
    }

    #[test]
    fn test_left_hand_is_mirrored() {
        let mut tracking = FixedTracking::new();
        track_hand(&mut tracking, Handedness::Left, 1.5);
        let mut frame = InteractionFrame::new(config(), tracking, library());
        let hand = frame.add_device(TrackedDevice::Hand(Handedness::Left), ReferenceSpace::Local);

        frame.advance(Duration::from_millis(16));
        assert_eq!(frame.last_match(hand).unwrap().name, "fist");
    }

    #[test]
    fn test_lost_hand_clears_match() {
        let mut tracking = FixedTracking::new();
        track_hand(&mut tracking, Handedness::Right, 1.5);
        let mut frame = InteractionFrame::new(config(), tracking, library());
        let hand = frame.add_device(TrackedDevice::Hand(Handedness::Right), ReferenceSpace::Local);
        frame.advance(Duration::from_millis(16));
        assert!(frame.last_match(hand).is_some());

        frame.tracking_mut().clear_joint(Handedness::Right, HandJoint::Wrist);
        frame.advance(Duration::from_millis(16));
        assert!(frame.last_match(hand).is_none());
        assert!(!frame.buffer(hand).unwrap().is_valid());
    }

    #[test]
    fn test_controllers_have_no_matcher() {
        let mut frame = InteractionFrame::new(config(), FixedTracking::new(), library());
        let pad = frame.add_device(TrackedDevice::Controller(Handedness::Right), ReferenceSpace::Local);
        frame.tracking_mut().set_grip(Handedness::Right, RigidTransform::IDENTITY);
        frame.advance(Duration::from_millis(16));
        assert!(frame.buffer(pad).unwrap().is_valid());
        assert!(frame.last_match(pad).is_none());
    }

    #[test]
    fn test_dispatched_drag_moves_object_on_tick() {
        let mut frame = InteractionFrame::new(config(), FixedTracking::new(), library());
        let cube = frame.add_object(Transform::from_position(Point3D::new(0.0, 1.0, -1.0)));
        let other = frame.add_object(Transform::identity());

        let signal = frame.dispatch(
            cube,
            &PointerEvent::Down {
                id: 7,
                point: Point3D::new(0.0, 1.0, -1.0),
                orientation: Quaternion::IDENTITY,
            },
        );
        assert_eq!(signal, Some(GrabSignal::Grabbed));
        frame.dispatch(
            cube,
            &PointerEvent::Move {
                id: 7,
                point: Point3D::new(0.5, 1.0, -1.0),
                orientation: Quaternion::IDENTITY,
            },
        );

        frame.advance(Duration::from_millis(16));
        assert_eq!(frame.moved(), &[cube]);
        let position = frame.object(cube).unwrap().transform().position;
        assert!(position.distance(&Point3D::new(0.5, 1.0, -1.0)) < 1e-5);
        assert_eq!(frame.object(other).unwrap().transform(), &Transform::identity());

        assert_eq!(frame.dispatch(cube, &PointerEvent::Up { id: 7 }), Some(GrabSignal::Released));
        assert_eq!(frame.dispatch(99, &PointerEvent::Up { id: 7 }), None);
    }

    fn place_wrist(frame: &mut InteractionFrame<FixedTracking, Library>, x: f32, y: f32) {
        let wrist = RigidTransform::from_translation(Vector3D::new(x, y, -0.3));
        frame.tracking_mut().set_joint(Handedness::Right, HandJoint::Wrist, wrist);
    }

    #[test]
    fn test_hand_contact_follows_wrist_and_holds_when_lost() {
        let mut frame = InteractionFrame::new(InteractionConfig::default(), FixedTracking::new(), library());
        let hand = frame.add_device(TrackedDevice::Hand(Handedness::Right), ReferenceSpace::Local);
        let cube = frame.add_object(Transform::from_position(Point3D::new(0.0, 1.0, -0.5)));

        // No anchor before the hand has been tracked
        assert!(matches!(
            frame.attach(hand, cube, 1),
            Err(InteractionError::AttachRejected { contact: 1, .. })
        ));

        place_wrist(&mut frame, 0.0, 1.0);
        frame.advance(Duration::from_millis(16));
        assert_eq!(frame.attach(hand, cube, 1).unwrap(), Some(GrabSignal::Grabbed));

        place_wrist(&mut frame, 0.2, 1.0);
        frame.advance(Duration::from_millis(16));
        assert_eq!(frame.moved(), &[cube]);
        let held = *frame.object(cube).unwrap().transform();
        assert!(held.position.distance(&Point3D::new(0.2, 1.0, -0.5)) < 1e-5);

        frame.tracking_mut().clear_joint(Handedness::Right, HandJoint::Wrist);
        frame.advance(Duration::from_millis(16));
        assert!(frame.moved().is_empty());
        assert_eq!(*frame.object(cube).unwrap().transform(), held);

        place_wrist(&mut frame, 0.2, 1.5);
        frame.advance(Duration::from_millis(16));
        let position = frame.object(cube).unwrap().transform().position;
        assert!(position.distance(&Point3D::new(0.2, 1.5, -0.5)) < 1e-5);

        assert_eq!(frame.detach(cube, 1), Some(GrabSignal::Released));
        assert_eq!(frame.detach(cube, 1), None);
        place_wrist(&mut frame, -1.0, 0.0);
        frame.advance(Duration::from_millis(16));
        assert!(frame.moved().is_empty());
    }

    #[test]
    fn test_attach_rejections() {
        let mut frame = InteractionFrame::new(InteractionConfig::default(), FixedTracking::new(), library());
        let hand = frame.add_device(TrackedDevice::Hand(Handedness::Right), ReferenceSpace::Local);
        let cube = frame.add_object(Transform::identity());
        place_wrist(&mut frame, 0.0, 1.0);
        frame.advance(Duration::from_millis(16));

        assert!(frame.attach(5, cube, 1).is_err());
        assert!(frame.attach(hand, 42, 1).is_err());
        assert!(frame.attach(hand, cube, 1).is_ok());
        assert!(frame.attach(hand, cube, 1).is_err());
        assert_eq!(frame.attach(hand, cube, 2).unwrap(), None);
        assert!(frame.attach(hand, cube, 3).is_err());

        // Removing the object drops its device contacts
        assert!(frame.remove_object(cube).is_some());
        assert_eq!(frame.detach(cube, 1), None);
        frame.advance(Duration::from_millis(16));
        assert!(frame.moved().is_empty());
    }
}
