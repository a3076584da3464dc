//! Scripted grab replay

use xr_interact_core::frame::ObjectId;
use xr_interact_core::hand::FixedTracking;
use xr_interact_core::input::PointerSimulator;
use xr_interact_core::pose::TemplateLookup;
use xr_interact_core::{
    FrameContext, FrameHandler, GrabSignal, GrabState, InteractionConfig, InteractionFrame, Transform,
};

/// What one replayed frame did to the object
#[derive(Debug, Clone)]
pub struct ReplayFrame {
    pub tick: u64,
    pub signals: Vec<GrabSignal>,
    pub state: GrabState,
    pub transform: Transform,
    pub moved: bool,
}

/// Feeds a pointer script into a single grabbable, one script frame per tick
pub struct ReplaySession<T> {
    frame: InteractionFrame<FixedTracking, T>,
    script: PointerSimulator,
    object: ObjectId,
    frames: Vec<ReplayFrame>,
}

impl<T: TemplateLookup> ReplaySession<T> {
    pub fn new(config: InteractionConfig, templates: T, script: PointerSimulator, start: Transform) -> Self {
        let mut frame = InteractionFrame::new(config, FixedTracking::new(), templates);
        let object = frame.add_object(start);
        Self {
            frame,
            script,
            object,
            frames: Vec::new(),
        }
    }

    pub fn remaining_frames(&self) -> usize {
        self.script.remaining_frames()
    }

    pub fn frames(&self) -> &[ReplayFrame] {
        &self.frames
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.frame.object(self.object).map(|object| object.transform())
    }
}

impl<T: TemplateLookup> FrameHandler for ReplaySession<T> {
    fn on_frame(&mut self, ctx: &FrameContext) {
        let events = self.script.next_frame().unwrap_or_default();
        let signals: Vec<_> = events
            .iter()
            .filter_map(|event| self.frame.dispatch(self.object, event))
            .collect();

        self.frame.on_frame(ctx);

        let Some(object) = self.frame.object(self.object) else {
            return;
        };
        for signal in &signals {
            tracing::info!(tick = ctx.tick, ?signal, "Grab signal");
        }
        self.frames.push(ReplayFrame {
            tick: ctx.tick,
            signals,
            state: object.state(),
            transform: *object.transform(),
            moved: self.frame.moved().contains(&self.object),
        });
    }
}
