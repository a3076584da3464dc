//! Input plumbing consumed by the interaction core
//!
//! - Pointer events (down / move / up / leave) driving grab sessions
//! - Input profile resolution for tracked devices
//! - A scripted pointer source for development without hardware

mod event;
mod profile;
mod simulator;

pub use event::{ContactId, PointerEvent};
pub use profile::resolve_profile;
pub use simulator::PointerSimulator;
