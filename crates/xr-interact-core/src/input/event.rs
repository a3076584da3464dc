//! Pointer events delivered by the input source

use crate::spatial::{Point3D, Quaternion};

/// Identifier the input source assigns to one pointer for the life of a press
pub type ContactId = u32;

/// Pointer input against a grabbable object.
///
/// Events may arrive between frames, late, or duplicated; consumers treat
/// unknown ids as no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// A pointer pressed on the object
    Down {
        id: ContactId,
        /// Contact point in interaction space
        point: Point3D,
        /// Orientation of the input device at the time of the event
        orientation: Quaternion,
    },

    /// A pressed pointer moved
    Move {
        id: ContactId,
        point: Point3D,
        orientation: Quaternion,
    },

    /// A pointer released
    Up { id: ContactId },

    /// A pointer left the object; equivalent to [`PointerEvent::Up`]
    Leave { id: ContactId },
}

impl PointerEvent {
    /// Contact this event refers to
    pub fn id(&self) -> ContactId {
        match self {
            PointerEvent::Down { id, .. }
            | PointerEvent::Move { id, .. }
            | PointerEvent::Up { id }
            | PointerEvent::Leave { id } => *id,
        }
    }

    /// Check if this event ends a contact
    pub fn is_release(&self) -> bool {
        matches!(self, PointerEvent::Up { .. } | PointerEvent::Leave { .. })
    }
}
