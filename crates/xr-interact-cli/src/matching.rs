//! Live pose recognition against a synthetic hand

use xr_interact_core::hand::{FixedTracking, ReferenceSpace};
use xr_interact_core::pose::{MatchDebouncer, TemplateLookup};
use xr_interact_core::{
    FrameContext, FrameHandler, Handedness, InteractionConfig, InteractionFrame, MatchResult, Point3D,
    Quaternion, RigidTransform, TrackedDevice, Vector3D,
};

use crate::scenario::HandShape;

pub struct MatchSession<T> {
    frame: InteractionFrame<FixedTracking, T>,
    hand: usize,
    debouncer: MatchDebouncer,
    /// Tick and pose each time the debounced pose changed
    settled: Vec<(u64, String)>,
    frames_without_match: u64,
}

impl<T: TemplateLookup> MatchSession<T> {
    pub fn new(
        config: InteractionConfig,
        templates: T,
        shape: HandShape,
        handedness: Handedness,
        debouncer: MatchDebouncer,
    ) -> Self {
        let mut tracking = FixedTracking::new();
        let wrist = RigidTransform::new(
            Point3D::new(0.0, 1.3, -0.35),
            Quaternion::from_axis_angle(Vector3D::RIGHT, -0.4),
        );
        shape.track(&mut tracking, handedness, wrist);

        let mut frame = InteractionFrame::new(config, tracking, templates);
        let hand = frame.add_device(TrackedDevice::Hand(handedness), ReferenceSpace::LocalFloor);
        Self {
            frame,
            hand,
            debouncer,
            settled: Vec::new(),
            frames_without_match: 0,
        }
    }

    pub fn last_match(&self) -> Option<&MatchResult> {
        self.frame.last_match(self.hand)
    }

    pub fn stable(&self) -> Option<&str> {
        self.debouncer.stable()
    }

    pub fn settled(&self) -> &[(u64, String)] {
        &self.settled
    }

    /// Frames where no template was ready to compare against
    pub fn frames_without_match(&self) -> u64 {
        self.frames_without_match
    }
}

impl<T: TemplateLookup> FrameHandler for MatchSession<T> {
    fn on_frame(&mut self, ctx: &FrameContext) {
        self.frame.on_frame(ctx);

        let result = self.frame.last_match(self.hand);
        if result.is_none() {
            self.frames_without_match += 1;
        }
        if self.debouncer.observe(result) {
            if let Some(pose) = self.debouncer.stable() {
                tracing::info!(tick = ctx.tick, pose, "Pose settled");
                self.settled.push((ctx.tick, pose.to_string()));
            }
        }
    }
}
