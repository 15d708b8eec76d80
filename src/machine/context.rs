//! The view of a running machine handed to callbacks.

use super::transition::StateDef;
use crate::core::{MachineError, StateId};
use crate::input::Input;

/// Access to a running machine from inside a callback.
///
/// Every state hook, guard and scripted-event callback receives a context. It
/// exposes the machine's user data, the time spent in the current state, the
/// host's input and the ability to request a transition.
///
/// Requesting a transition only records the target: the machine performs it
/// after the current callback returns, at the end of the update step. When
/// several requests are made in the same step, the last one wins.
pub struct Context<'a, D> {
    pub(crate) machine: &'a str,
    pub(crate) states: &'a [StateDef<D>],
    pub(crate) data: &'a mut D,
    pub(crate) current: StateId,
    pub(crate) next: &'a mut StateId,
    pub(crate) previous: Option<StateId>,
    pub(crate) state_time: f64,
    pub(crate) input: &'a dyn Input,
}

impl<'a, D> Context<'a, D> {
    pub fn data(&self) -> &D {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut *self.data
    }

    /// Name of the machine, for diagnostics.
    pub fn machine_name(&self) -> &str {
        self.machine
    }

    /// State whose hooks are running.
    pub fn current(&self) -> StateId {
        self.current
    }

    /// Name of the state whose hooks are running.
    pub fn current_name(&self) -> &str {
        &self.states[self.current.index()].name
    }

    /// The state that was current before the last transition.
    pub fn previous(&self) -> Option<StateId> {
        self.previous
    }

    /// Seconds spent in the current state, excluding paused time.
    pub fn state_time(&self) -> f64 {
        self.state_time
    }

    /// Input exposed by the host for this call.
    pub fn input(&self) -> &dyn Input {
        self.input
    }

    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.states.get(id.index()).map(|state| state.name.as_str())
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|state| state.name == name)
            .map(StateId::new)
    }

    /// Target of the transition requested so far in this step, if any.
    pub fn pending_state(&self) -> Option<StateId> {
        (*self.next != self.current).then_some(*self.next)
    }

    /// Request a transition to `to` once the current step finishes.
    ///
    /// Requesting the current state cancels any earlier request.
    pub fn change_state(&mut self, to: StateId) -> Result<(), MachineError> {
        if to.index() >= self.states.len() {
            return Err(MachineError::InvalidState {
                requested: to,
                current: self.current_name().to_string(),
            });
        }
        *self.next = to;
        Ok(())
    }

    /// Request a transition back to the previous state, if there is one.
    ///
    /// Returns whether a request was made.
    pub fn change_to_previous_state(&mut self) -> bool {
        match self.previous {
            Some(previous) => {
                *self.next = previous;
                true
            }
            None => false,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::context_for;
    use super::*;
    use crate::input::NoInput;

    #[test]
    fn change_state_records_last_request() {
        context_for(&mut (), StateId::new(0), 0.0, &NoInput, |ctx| {
            assert_eq!(ctx.pending_state(), None);

            ctx.change_state(StateId::new(1)).unwrap();
            ctx.change_state(StateId::new(2)).unwrap();
            assert_eq!(ctx.pending_state(), Some(StateId::new(2)));

            ctx.change_state(StateId::new(0)).unwrap();
            assert_eq!(ctx.pending_state(), None);
        });
    }

    #[test]
    fn change_state_rejects_unknown_handle() {
        context_for(&mut (), StateId::new(1), 0.0, &NoInput, |ctx| {
            let result = ctx.change_state(StateId::new(9));
            match result {
                Err(MachineError::InvalidState { requested, current }) => {
                    assert_eq!(requested, StateId::new(9));
                    assert_eq!(current, "B");
                }
                other => panic!("expected InvalidState, got {other:?}"),
            }
            assert_eq!(ctx.pending_state(), None);
        });
    }

    #[test]
    fn names_resolve_both_ways() {
        context_for(&mut (), StateId::new(2), 1.5, &NoInput, |ctx| {
            assert_eq!(ctx.current_name(), "C");
            assert_eq!(ctx.state_id("B"), Some(StateId::new(1)));
            assert_eq!(ctx.state_name(StateId::new(0)), Some("A"));
            assert_eq!(ctx.state_name(StateId::new(5)), None);
            assert_eq!(ctx.state_time(), 1.5);
            assert_eq!(ctx.machine_name(), "Test");
        });
    }

    #[test]
    fn previous_state_is_optional() {
        context_for(&mut (), StateId::new(0), 0.0, &NoInput, |ctx| {
            assert!(!ctx.change_to_previous_state());
            assert_eq!(ctx.pending_state(), None);
        });
    }

    #[test]
    fn data_is_mutable() {
        let mut score = 10;
        context_for(&mut score, StateId::new(0), 0.0, &NoInput, |ctx| {
            *ctx.data_mut() += 5;
        });
        assert_eq!(score, 15);
    }
}
