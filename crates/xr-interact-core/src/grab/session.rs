//! Grab session state and the transform solver

use super::ContactPoint;
use crate::input::ContactId;
use crate::spatial::{Point3D, Quaternion, Transform};

/// Hard ceiling on simultaneous contacts
pub const MAX_CONTACTS: usize = 2;

/// Contacts currently holding one object, plus the object transform captured
/// when the contact set last changed.
#[derive(Debug, Clone, Default)]
pub struct GrabSession {
    /// Insertion order; the first entry anchors two-handed manipulation
    contacts: Vec<ContactPoint>,
    snapshot: Transform,
}

impl GrabSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contacts(&self) -> &[ContactPoint] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.contacts.iter().any(|c| c.id == id)
    }

    /// Object transform at the last rebase
    pub fn snapshot(&self) -> &Transform {
        &self.snapshot
    }

    /// Add a contact, rebasing the session on `live`
    pub(crate) fn add(&mut self, contact: ContactPoint, live: Transform) {
        self.rebase(live);
        self.contacts.push(contact);
    }

    /// Update a contact's current pose. Returns false for unknown ids.
    pub(crate) fn update(&mut self, id: ContactId, point: Point3D, orientation: Quaternion) -> bool {
        match self.contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                contact.update(point, orientation);
                true
            }
            None => false,
        }
    }

    /// Remove a contact. Survivors are rebased on `live` so the object does
    /// not jump when the solver switches mode.
    pub(crate) fn remove(&mut self, id: ContactId, live: Transform) -> Option<ContactPoint> {
        let index = self.contacts.iter().position(|c| c.id == id)?;
        let removed = self.contacts.remove(index);
        if !self.contacts.is_empty() {
            self.rebase(live);
        }
        Some(removed)
    }

    fn rebase(&mut self, live: Transform) {
        self.snapshot = live;
        for contact in &mut self.contacts {
            contact.rebase();
        }
    }

    /// Object transform implied by the current contacts.
    ///
    /// `None` when there is nothing to do: no contacts, a two-contact span
    /// shorter than `min_span`, or a non-finite result.
    pub fn solve(&self, min_span: f32) -> Option<Transform> {
        let solved = match self.contacts.as_slice() {
            [] => return None,
            [only] => self.solve_one(only),
            [first, second, ..] => self.solve_two(first, second, min_span)?,
        };

        if solved.is_finite() {
            Some(solved)
        } else {
            tracing::warn!(?solved, "Grab solver produced a non-finite transform, skipping");
            None
        }
    }

    /// Follow the hand rigidly: keep the hand-to-pivot offset and apply the
    /// device rotation since the anchor.
    fn solve_one(&self, contact: &ContactPoint) -> Transform {
        let delta = contact.delta_rotation();
        let offset = self.snapshot.position - contact.start_position;

        Transform {
            position: contact.current_position + delta.rotate_vector(offset),
            rotation: (delta * self.snapshot.rotation).normalize(),
            scale: self.snapshot.scale,
        }
    }

    /// Scale, rotate and translate about the first contact, driven by the
    /// span to the second.
    fn solve_two(&self, first: &ContactPoint, second: &ContactPoint, min_span: f32) -> Option<Transform> {
        let initial = second.start_position - first.start_position;
        let current = second.current_position - first.current_position;
        let initial_len = initial.magnitude();
        let current_len = current.magnitude();

        if initial_len < min_span || current_len < min_span {
            tracing::debug!(
                initial_len,
                current_len,
                min_span,
                "Degenerate two-contact span, skipping update"
            );
            return None;
        }

        let factor = current_len / initial_len;
        let delta = Quaternion::from_rotation_arc(initial * (1.0 / initial_len), current * (1.0 / current_len));
        let offset = (self.snapshot.position - first.start_position) * factor;

        Some(Transform {
            position: first.current_position + delta.rotate_vector(offset),
            rotation: (delta * self.snapshot.rotation).normalize(),
            scale: self.snapshot.scale * factor,
        })
    }
}
