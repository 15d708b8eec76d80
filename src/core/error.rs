//! Errors raised by state machines, the event scheduler and the game layer.

use super::state::StateId;
use thiserror::Error;

/// Result type returned by every state and event callback.
///
/// Callbacks return this so they can use `?` on [`Context::change_state`]
/// and hand their own failures back to the driver through
/// [`MachineError::Callback`].
///
/// [`Context::change_state`]: crate::machine::Context::change_state
pub type HookResult = Result<(), MachineError>;

/// Errors that can occur while configuring or running a state machine.
///
/// Configuration and lifecycle errors are programmer errors: the machine
/// never tries to recover from them. Callback failures are passed through
/// untouched.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("State '{name}' is already defined")]
    DuplicateState { name: String },

    #[error("Invalid state name '{name}'. Names must start with a letter or '_' and contain only letters, digits and '_'")]
    InvalidIdentifier { name: String },

    #[error("Invalid state {requested} requested while in state '{current}'")]
    InvalidState { requested: StateId, current: String },

    #[error("Cannot add a transition from state '{state}' to itself")]
    SelfTransition { state: String },

    #[error("Unknown state '{name}'")]
    UnknownState { name: String },

    #[error("State machine '{machine}' has already been started")]
    AlreadyStarted { machine: String },

    #[error("State machine '{machine}' has not been started. Call .start() first")]
    NotStarted { machine: String },

    #[error("State machine '{machine}' has no states")]
    NoStates { machine: String },

    #[error("{0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl MachineError {
    /// Wrap a failure raised by user callback code.
    pub fn callback(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        MachineError::Callback(error.into())
    }
}
