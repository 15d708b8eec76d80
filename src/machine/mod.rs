//! Runtime state machines.
//!
//! A [`StateMachine`] owns its states, their hooks and the user data the
//! hooks operate on. Hooks and guards see the running machine through a
//! [`Context`].

mod context;
mod runtime;
mod transition;

pub use context::Context;
pub use runtime::StateMachine;
pub use transition::Transition;

#[cfg(test)]
pub(crate) use context::testing;
