//! State handles and lifecycle hooks.
//!
//! A state is registered once on a machine and referred to afterwards by the
//! [`StateId`] handle returned from registration. Its behaviour is described
//! by a [`StateHooks`] value: any hook left unset is a no-op.

use super::error::HookResult;
use crate::machine::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque handle to a state registered on a machine.
///
/// Handles are index-like and stay valid for the lifetime of the machine that
/// issued them, including every instance cloned from it with
/// [`StateMachine::new_instance`](crate::machine::StateMachine::new_instance).
///
/// # Example
///
/// ```rust
/// use ludum::core::StateHooks;
/// use ludum::machine::StateMachine;
///
/// let mut machine = StateMachine::new("Door", ());
/// let closed = machine.add_state("CLOSED", StateHooks::new()).unwrap();
/// let open = machine.add_state("OPEN", StateHooks::new()).unwrap();
///
/// assert_eq!(closed.index(), 0);
/// assert_eq!(open.index(), 1);
/// assert_eq!(machine.state_id("OPEN"), Some(open));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    /// Build a handle from a raw index.
    ///
    /// Handles built this way are validated by every operation that accepts
    /// them, so an out-of-range index fails with `InvalidState`.
    pub const fn new(index: usize) -> Self {
        StateId(index)
    }

    /// Position of the state in its machine's insertion order.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hook run on `init`, `enter` and `leave`.
pub type LifecycleHook<D> = Arc<dyn Fn(&mut Context<'_, D>) -> HookResult + Send + Sync>;

/// Hook run on every `update`, with the tick's delta time in seconds.
pub type UpdateHook<D> = Arc<dyn Fn(&mut Context<'_, D>, f64) -> HookResult + Send + Sync>;

/// Lifecycle callbacks for one state.
///
/// - `init` runs once, the first time the state is entered by a machine instance.
/// - `enter` runs every time the state becomes current.
/// - `update` runs once per tick while the state is current.
/// - `leave` runs when the machine transitions away from the state.
///
/// Hooks are reference counted, so cloning a machine template shares them
/// between instances.
pub struct StateHooks<D> {
    init: Option<LifecycleHook<D>>,
    enter: Option<LifecycleHook<D>>,
    update: Option<UpdateHook<D>>,
    leave: Option<LifecycleHook<D>>,
}

impl<D> StateHooks<D> {
    /// Hooks that do nothing.
    pub fn new() -> Self {
        Self {
            init: None,
            enter: None,
            update: None,
            leave: None,
        }
    }

    /// Run once, before `enter`, the first time the state becomes current.
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, D>) -> HookResult + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(hook));
        self
    }

    /// Run every time the state becomes current.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, D>) -> HookResult + Send + Sync + 'static,
    {
        self.enter = Some(Arc::new(hook));
        self
    }

    /// Run on every update while the state is current.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, D>, f64) -> HookResult + Send + Sync + 'static,
    {
        self.update = Some(Arc::new(hook));
        self
    }

    /// Run when the machine transitions away from the state.
    pub fn on_leave<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, D>) -> HookResult + Send + Sync + 'static,
    {
        self.leave = Some(Arc::new(hook));
        self
    }

    pub(crate) fn run_init(&self, ctx: &mut Context<'_, D>) -> HookResult {
        self.init.as_ref().map_or(Ok(()), |hook| hook(ctx))
    }

    pub(crate) fn run_enter(&self, ctx: &mut Context<'_, D>) -> HookResult {
        self.enter.as_ref().map_or(Ok(()), |hook| hook(ctx))
    }

    pub(crate) fn run_update(&self, ctx: &mut Context<'_, D>, dt: f64) -> HookResult {
        self.update.as_ref().map_or(Ok(()), |hook| hook(ctx, dt))
    }

    pub(crate) fn run_leave(&self, ctx: &mut Context<'_, D>) -> HookResult {
        self.leave.as_ref().map_or(Ok(()), |hook| hook(ctx))
    }
}

impl<D> Default for StateHooks<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for StateHooks<D> {
    fn clone(&self) -> Self {
        Self {
            init: self.init.clone(),
            enter: self.enter.clone(),
            update: self.update.clone(),
            leave: self.leave.clone(),
        }
    }
}

/// Check whether `name` is usable as a state name.
///
/// Names follow the usual identifier shape: a letter or `_`, then letters,
/// digits or `_`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
