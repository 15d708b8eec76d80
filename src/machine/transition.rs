//! Declared transitions and per-state definitions.

use crate::core::{Guard, StateHooks, StateId};

/// A guarded transition declared on a state.
///
/// Declared transitions are checked in the order they were added, after the
/// state's `update` hook, and only when the hook did not request a change
/// itself. The first one whose guard passes is followed.
pub struct Transition<D> {
    pub to: StateId,
    pub guard: Guard<D>,
}

impl<D> Clone for Transition<D> {
    fn clone(&self) -> Self {
        Self {
            to: self.to,
            guard: self.guard.clone(),
        }
    }
}

/// Everything a machine knows about one of its states.
pub(crate) struct StateDef<D> {
    pub(crate) name: String,
    pub(crate) hooks: StateHooks<D>,
    pub(crate) transitions: Vec<Transition<D>>,
}

impl<D> StateDef<D> {
    pub(crate) fn new(name: String, hooks: StateHooks<D>) -> Self {
        Self {
            name,
            hooks,
            transitions: Vec::new(),
        }
    }

    /// First declared transition whose guard passes.
    pub(crate) fn pick_transition(&self, ctx: &crate::machine::Context<'_, D>) -> Option<StateId> {
        self.transitions
            .iter()
            .find(|transition| transition.guard.check(ctx))
            .map(|transition| transition.to)
    }
}

impl<D> Clone for StateDef<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            hooks: self.hooks.clone(),
            transitions: self.transitions.clone(),
        }
    }
}
