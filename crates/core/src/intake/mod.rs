//! Intake of transport events.
//!
//! The [`IntakeController`] is the seam between the transport and the
//! session/pipeline machinery: one handler per event kind, one reply per
//! terminal outcome, and no failure escapes a handler.

mod controller;

pub use controller::IntakeController;
