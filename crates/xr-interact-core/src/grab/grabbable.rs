//! Grabbable objects: contact bookkeeping and the Idle / One / Two state machine

use super::{ContactPoint, GrabSession, MAX_CONTACTS};
use crate::config::GrabConfig;
use crate::input::{ContactId, PointerEvent};
use crate::spatial::{Point3D, Quaternion, Transform};

/// Transitions the object's owner must act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabSignal {
    /// First contact landed: move the object into interaction space
    Grabbed,
    /// Last contact left: return the object to its original container
    Released,
}

/// Where the object is in its grab lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabState {
    Idle,
    GrabbedOne,
    GrabbedTwo,
}

/// An object that pointers can grab, move, rotate and scale
#[derive(Debug, Clone)]
pub struct Grabbable {
    transform: Transform,
    session: GrabSession,
    max_contacts: usize,
    min_span: f32,
}

impl Grabbable {
    /// Create a grabbable at `transform`
    pub fn new(transform: Transform, config: &GrabConfig) -> Self {
        Self {
            transform,
            session: GrabSession::new(),
            max_contacts: config.max_contacts.clamp(1, MAX_CONTACTS),
            min_span: config.min_span,
        }
    }

    /// Live transform in interaction space
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the live transform (e.g. the scene moved the object).
    ///
    /// Only honoured while idle; a held object belongs to the solver.
    pub fn set_transform(&mut self, transform: Transform) -> bool {
        if self.session.is_empty() {
            self.transform = transform;
            true
        } else {
            false
        }
    }

    pub fn session(&self) -> &GrabSession {
        &self.session
    }

    pub fn contact_count(&self) -> usize {
        self.session.len()
    }

    pub fn state(&self) -> GrabState {
        match self.session.len() {
            0 => GrabState::Idle,
            1 => GrabState::GrabbedOne,
            _ => GrabState::GrabbedTwo,
        }
    }

    /// Dispatch one pointer event
    pub fn handle_event(&mut self, event: &PointerEvent) -> Option<GrabSignal> {
        match *event {
            PointerEvent::Down { id, point, orientation } => self.contact_down(id, point, orientation),
            PointerEvent::Move { id, point, orientation } => {
                self.contact_move(id, point, orientation);
                None
            }
            PointerEvent::Up { id } | PointerEvent::Leave { id } => self.contact_up(id),
        }
    }

    /// A pointer pressed on the object.
    ///
    /// Dropped when the object is already held by as many contacts as it
    /// allows, or when the id is already live.
    pub fn contact_down(&mut self, id: ContactId, point: Point3D, orientation: Quaternion) -> Option<GrabSignal> {
        let count = self.session.len();
        if count >= self.max_contacts || self.session.contains(id) {
            tracing::trace!(id, count, max = self.max_contacts, "Ignoring contact down");
            return None;
        }

        // Bring the transform up to date with any moves since the last frame
        self.refresh();
        self.session.add(ContactPoint::new(id, point, orientation), self.transform);
        tracing::debug!(id, contacts = count + 1, "Contact added");

        (count == 0).then_some(GrabSignal::Grabbed)
    }

    /// A pressed pointer moved; unknown ids are ignored
    pub fn contact_move(&mut self, id: ContactId, point: Point3D, orientation: Quaternion) {
        if !self.session.update(id, point, orientation) {
            tracing::trace!(id, "Ignoring move for unknown contact");
        }
    }

    /// A pointer released or left; unknown ids are ignored
    pub fn contact_up(&mut self, id: ContactId) -> Option<GrabSignal> {
        if !self.session.contains(id) {
            tracing::trace!(id, "Ignoring release for unknown contact");
            return None;
        }

        self.refresh();
        self.session.remove(id, self.transform)?;
        tracing::debug!(id, contacts = self.session.len(), "Contact removed");

        self.session.is_empty().then_some(GrabSignal::Released)
    }

    /// Recompute the live transform from the current contacts.
    ///
    /// Call once per frame; repeated calls with unchanged contacts produce
    /// the same transform. Returns whether the transform was written.
    pub fn on_frame(&mut self) -> bool {
        self.refresh()
    }

    fn refresh(&mut self) -> bool {
        match self.session.solve(self.min_span) {
            Some(solved) => {
                self.transform = solved;
                true
            }
            None => false,
        }
    }
}
