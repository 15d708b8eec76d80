//! Guard predicates for declared transitions.
//!
//! Guards are boolean checks over the running machine's [`Context`]. A machine
//! evaluates the guards of the current state's declared transitions after the
//! state's `update` hook, unless the hook already requested a transition.

use crate::machine::Context;
use std::sync::Arc;

/// Predicate that decides whether a declared transition should be followed.
///
/// Guards are evaluated very frequently (once per tick per declared
/// transition), so they should be cheap and free of side effects.
///
/// # Example
///
/// ```rust
/// use ludum::core::{Guard, StateHooks};
/// use ludum::machine::StateMachine;
///
/// #[derive(Clone)]
/// struct Enemy {
///     health: i32,
/// }
///
/// let mut machine = StateMachine::new("Enemy", Enemy { health: 3 });
/// let alive = machine.add_state("ALIVE", StateHooks::new()).unwrap();
/// let dead = machine.add_state("DEAD", StateHooks::new()).unwrap();
/// machine.add_transition(alive, dead, |ctx| ctx.data().health <= 0).unwrap();
///
/// machine.start().unwrap();
/// machine.update(0.1).unwrap();
/// assert_eq!(machine.current_state(), Some(alive));
///
/// machine.data_mut().health = 0;
/// machine.update(0.1).unwrap();
/// assert_eq!(machine.current_state(), Some(dead));
/// ```
pub struct Guard<D> {
    predicate: Arc<dyn Fn(&Context<'_, D>) -> bool + Send + Sync>,
}

impl<D> Guard<D> {
    /// Create a guard from a predicate over the machine context.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that always passes, used for automatic transitions.
    pub fn always() -> Self
    where
        D: 'static,
    {
        Guard {
            predicate: Arc::new(|_: &Context<'_, D>| true),
        }
    }

    /// Evaluate the guard against the running machine.
    pub fn check(&self, ctx: &Context<'_, D>) -> bool {
        (self.predicate)(ctx)
    }
}

impl<D> Clone for Guard<D> {
    fn clone(&self) -> Self {
        Guard {
            predicate: Arc::clone(&self.predicate),
        }
    }
}
