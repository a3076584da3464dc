//! Match debouncing
//!
//! The matcher reports its best guess every frame, however close the runner-up
//! was. A debouncer only commits to a pose once the guess has been confident
//! for several frames in a row.

use super::matcher::MatchResult;

pub struct MatchDebouncer {
    /// Minimum confidence margin for a frame to count
    min_margin: f32,
    /// Consecutive confident frames needed before switching
    required_frames: u32,
    candidate: Option<String>,
    streak: u32,
    stable: Option<String>,
}

impl MatchDebouncer {
    pub fn new(min_margin: f32, required_frames: u32) -> Self {
        Self {
            min_margin,
            required_frames: required_frames.max(1),
            candidate: None,
            streak: 0,
            stable: None,
        }
    }

    /// Feed one frame's match. Returns true when the stable pose changed.
    pub fn observe(&mut self, result: Option<&MatchResult>) -> bool {
        let Some(result) = result.filter(|r| r.confidence_margin >= self.min_margin) else {
            self.streak = 0;
            self.candidate = None;
            return false;
        };

        if self.candidate.as_deref() == Some(result.name.as_str()) {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.candidate = Some(result.name.clone());
            self.streak = 1;
        }

        if self.streak >= self.required_frames && self.stable != self.candidate {
            tracing::debug!(pose = %result.name, from = ?self.stable, "Pose settled");
            self.stable = self.candidate.clone();
            return true;
        }
        false
    }

    /// The last pose that held long enough
    pub fn stable(&self) -> Option<&str> {
        self.stable.as_deref()
    }

    pub fn reset(&mut self) {
        self.candidate = None;
        self.streak = 0;
        self.stable = None;
    }
}

impl Default for MatchDebouncer {
    fn default() -> Self {
        Self::new(0.05, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, margin: f32) -> MatchResult {
        MatchResult {
            name: name.to_string(),
            previous_name: None,
            confidence_margin: margin,
        }
    }

    #[test]
    fn test_settles_after_required_frames() {
        let mut debouncer = MatchDebouncer::new(0.1, 3);
        let fist = result("fist", 0.5);

        assert!(!debouncer.observe(Some(&fist)));
        assert!(!debouncer.observe(Some(&fist)));
        assert!(debouncer.observe(Some(&fist)));
        assert_eq!(debouncer.stable(), Some("fist"));
        assert!(!debouncer.observe(Some(&fist)));
    }

    #[test]
    fn test_low_margin_breaks_streak() {
        let mut debouncer = MatchDebouncer::new(0.1, 2);
        debouncer.observe(Some(&result("point", 0.3)));
        debouncer.observe(Some(&result("point", 0.01)));
        assert!(!debouncer.observe(Some(&result("point", 0.3))));
        assert!(debouncer.observe(Some(&result("point", 0.3))));
    }

    #[test]
    fn test_flicker_keeps_stable_pose() {
        let mut debouncer = MatchDebouncer::new(0.0, 2);
        debouncer.observe(Some(&result("open", 1.0)));
        debouncer.observe(Some(&result("open", 1.0)));
        assert_eq!(debouncer.stable(), Some("open"));

        debouncer.observe(Some(&result("fist", 1.0)));
        debouncer.observe(None);
        debouncer.observe(Some(&result("fist", 1.0)));
        assert_eq!(debouncer.stable(), Some("open"));

        assert!(debouncer.observe(Some(&result("fist", f32::INFINITY))));
        assert_eq!(debouncer.stable(), Some("fist"));

        debouncer.reset();
        assert_eq!(debouncer.stable(), None);
    }
}
