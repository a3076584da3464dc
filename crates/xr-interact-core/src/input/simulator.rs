//! Scripted pointer input
//!
//! Produces frame-by-frame pointer events for development and replay without
//! XR hardware.

use std::collections::{HashMap, VecDeque};

use super::{ContactId, PointerEvent};
use crate::spatial::{Point3D, Quaternion};

enum ScriptItem {
    Event(PointerEvent),
    EndFrame,
}

/// Queues pointer gestures and hands them out one frame at a time
pub struct PointerSimulator {
    queue: VecDeque<ScriptItem>,
    /// Last scripted pose of every pressed pointer
    pressed: HashMap<ContactId, (Point3D, Quaternion)>,
    next_id: ContactId,
}

impl Default for PointerSimulator {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            pressed: HashMap::new(),
            next_id: 1,
        }
    }
}

impl PointerSimulator {
    /// Create an empty simulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Press a new pointer; the down event lands in its own frame
    pub fn press(&mut self, point: Point3D, orientation: Quaternion) -> ContactId {
        let id = self.next_id;
        self.next_id += 1;
        self.pressed.insert(id, (point, orientation));
        self.queue.push_back(ScriptItem::Event(PointerEvent::Down {
            id,
            point,
            orientation,
        }));
        self.queue.push_back(ScriptItem::EndFrame);
        id
    }

    /// Move a pressed pointer to `target` over `steps` frames, interpolating
    /// position and orientation. Unknown ids are ignored.
    pub fn drag_to(&mut self, id: ContactId, target: Point3D, orientation: Quaternion, steps: u32) {
        let Some((start, start_rot)) = self.pressed.get(&id).copied() else {
            return;
        };
        let steps = steps.max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            let point = start + (target - start) * t;
            self.queue.push_back(ScriptItem::Event(PointerEvent::Move {
                id,
                point,
                orientation: start_rot.nlerp(&orientation, t),
            }));
            self.queue.push_back(ScriptItem::EndFrame);
        }
        self.pressed.insert(id, (target, orientation));
    }

    /// Drag several pointers at once, sharing frames
    pub fn drag_together(&mut self, moves: &[(ContactId, Point3D)], steps: u32) {
        let steps = steps.max(1);
        let starts: Vec<_> = moves
            .iter()
            .filter_map(|(id, target)| {
                self.pressed
                    .get(id)
                    .map(|(start, rot)| (*id, *start, *target, *rot))
            })
            .collect();

        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            for (id, start, target, orientation) in &starts {
                self.queue.push_back(ScriptItem::Event(PointerEvent::Move {
                    id: *id,
                    point: *start + (*target - *start) * t,
                    orientation: *orientation,
                }));
            }
            self.queue.push_back(ScriptItem::EndFrame);
        }

        for (id, _, target, orientation) in starts {
            self.pressed.insert(id, (target, orientation));
        }
    }

    /// Release a pointer
    pub fn release(&mut self, id: ContactId) {
        self.pressed.remove(&id);
        self.queue.push_back(ScriptItem::Event(PointerEvent::Up { id }));
        self.queue.push_back(ScriptItem::EndFrame);
    }

    /// Pointer leaves the object (treated like a release downstream)
    pub fn leave(&mut self, id: ContactId) {
        self.pressed.remove(&id);
        self.queue.push_back(ScriptItem::Event(PointerEvent::Leave { id }));
        self.queue.push_back(ScriptItem::EndFrame);
    }

    /// Events for the next frame, or `None` once the script is exhausted
    pub fn next_frame(&mut self) -> Option<Vec<PointerEvent>> {
        if self.queue.is_empty() {
            return None;
        }
        let mut events = Vec::new();
        while let Some(item) = self.queue.pop_front() {
            match item {
                ScriptItem::Event(event) => events.push(event),
                ScriptItem::EndFrame => break,
            }
        }
        Some(events)
    }

    /// Number of frames left in the script
    pub fn remaining_frames(&self) -> usize {
        self.queue
            .iter()
            .filter(|item| matches!(item, ScriptItem::EndFrame))
            .count()
    }

    /// Drop the script and forget pressed pointers
    pub fn reset(&mut self) {
        self.queue.clear();
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_drag_release() {
        let mut sim = PointerSimulator::new();
        let id = sim.press(Point3D::ORIGIN, Quaternion::IDENTITY);
        sim.drag_to(id, Point3D::new(0.0, 2.0, 0.0), Quaternion::IDENTITY, 2);
        sim.release(id);
        assert_eq!(sim.remaining_frames(), 4);

        let first = sim.next_frame().unwrap();
        assert!(matches!(first[0], PointerEvent::Down { .. }));

        let halfway = sim.next_frame().unwrap();
        match &halfway[0] {
            PointerEvent::Move { point, .. } => assert!((point.y - 1.0).abs() < 0.0001),
            other => panic!("Expected Move event, got {other:?}"),
        }

        sim.next_frame().unwrap();
        let last = sim.next_frame().unwrap();
        assert!(last[0].is_release());
        assert!(sim.next_frame().is_none());
    }

    #[test]
    fn test_drag_together_shares_frames() {
        let mut sim = PointerSimulator::new();
        let a = sim.press(Point3D::ORIGIN, Quaternion::IDENTITY);
        let b = sim.press(Point3D::new(2.0, 0.0, 0.0), Quaternion::IDENTITY);
        sim.drag_together(&[(a, Point3D::ORIGIN), (b, Point3D::new(4.0, 0.0, 0.0))], 1);

        sim.next_frame();
        sim.next_frame();
        let frame = sim.next_frame().unwrap();
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_drag_unknown_id_is_ignored() {
        let mut sim = PointerSimulator::new();
        sim.drag_to(42, Point3D::ORIGIN, Quaternion::IDENTITY, 3);
        assert!(sim.next_frame().is_none());
    }
}
