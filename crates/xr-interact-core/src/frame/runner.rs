//! Fixed-rate frame runner

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use super::{FrameContext, FrameHandler};

/// Drives a [`FrameHandler`] at a fixed tick rate on the tokio timer
#[derive(Debug, Clone)]
pub struct FrameRunner {
    tick_rate: Duration,
}

impl FrameRunner {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Run `frames` ticks, returning the final context.
    ///
    /// Ticks that fall behind are delayed rather than bunched, so
    /// `delta_time` reflects the real gap between callbacks.
    pub async fn run<H: FrameHandler + ?Sized>(&self, handler: &mut H, frames: u64) -> FrameContext {
        let mut interval = tokio::time::interval(self.tick_rate);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        let mut ctx = FrameContext::new();
        let mut last = Instant::now();
        while ctx.tick < frames {
            interval.tick().await;
            let now = Instant::now();
            ctx.update(now - last);
            last = now;
            handler.on_frame(&ctx);
        }

        tracing::debug!(ticks = ctx.tick, elapsed = ?ctx.time, "Frame runner finished");
        ctx
    }
}

impl Default for FrameRunner {
    fn default() -> Self {
        Self::new(Duration::from_millis(11))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        ticks: Vec<u64>,
    }

    impl FrameHandler for Recorder {
        fn on_frame(&mut self, ctx: &FrameContext) {
            self.ticks.push(ctx.tick);
        }
    }

    #[tokio::test]
    async fn test_runs_requested_frames_in_order() {
        let mut recorder = Recorder::default();
        let ctx = FrameRunner::new(Duration::from_millis(1))
            .run(&mut recorder, 4)
            .await;

        assert_eq!(recorder.ticks, vec![1, 2, 3, 4]);
        assert_eq!(ctx.tick, 4);
        assert!(ctx.time >= Duration::from_millis(3));
    }

    #[tokio::test]
    async fn test_zero_frames_never_calls_handler() {
        let mut recorder = Recorder::default();
        FrameRunner::default().run(&mut recorder, 0).await;
        assert!(recorder.ticks.is_empty());
    }
}
