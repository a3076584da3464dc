//! Frame loop
//!
//! Everything in the interaction core advances once per render tick. The
//! [`FrameContext`] carries timing for the tick and [`FrameHandler`]s receive
//! it; [`InteractionFrame`] is the handler that runs pose updaters, pose
//! matchers and grab solvers in that order.

mod driver;
mod runner;

pub use driver::{InteractionFrame, ObjectId};
pub use runner::FrameRunner;

use std::time::Duration;

/// Timing for the current tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    /// Time since the first tick
    pub time: Duration,
    /// Time since the previous tick
    pub delta_time: Duration,
    /// Number of ticks so far
    pub tick: u64,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            time: Duration::ZERO,
            delta_time: Duration::ZERO,
            tick: 0,
        }
    }
}

impl FrameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next tick
    pub fn update(&mut self, dt: Duration) {
        self.delta_time = dt;
        self.time += dt;
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta_time.as_secs_f32()
    }
}

/// Per-tick callback
pub trait FrameHandler {
    fn on_frame(&mut self, ctx: &FrameContext);
}
