//! Scripted events: timed, keyed and conditional happenings owned by states.
//!
//! An event belongs to one state and is re-armed every time that state is
//! entered. The [`triggers`] module has constructors for the common kinds
//! (always on, at a given time, on a key press, on a game condition) and for
//! their variants that also request a state change.

mod event;
mod scheduler;
pub mod triggers;

pub use event::{DrawHook, EventHooks, EventKind, EventStatus, Expiry, ScriptedEvent, Trigger};
pub use scheduler::EventScheduler;
