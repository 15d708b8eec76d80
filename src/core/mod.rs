//! Core types shared by state machines, scripted events and the game layer.
//!
//! - State handles and lifecycle hooks via [`StateId`] and [`StateHooks`]
//! - Guard predicates for declared transitions
//! - Bounded transition history
//! - The error taxonomy shared by the whole crate

mod error;
mod guard;
mod history;
mod state;

pub use error::{HookResult, MachineError};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_CAPACITY};
pub use state::{is_valid_identifier, LifecycleHook, StateHooks, StateId, UpdateHook};
