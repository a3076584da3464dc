//! Grab session solver
//!
//! Each [`Grabbable`] tracks up to two contact points and recomputes its
//! transform once per frame:
//! - one contact: the object follows the hand rigidly (translation and
//!   rotation since the grab began)
//! - two contacts: the object scales, rotates and translates about the first
//!   contact, driven by the span to the second
//!
//! State machine: `Idle → GrabbedOne ⇄ GrabbedTwo → Idle`. Only the first
//! contact and the last release signal the owner.

mod contact;
mod grabbable;
mod session;

pub use contact::ContactPoint;
pub use grabbable::{GrabSignal, GrabState, Grabbable};
pub use session::{GrabSession, MAX_CONTACTS};
