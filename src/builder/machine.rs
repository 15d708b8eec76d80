//! Builder for constructing state machines by state name.

use crate::core::{Guard, MachineError, StateHooks, StateId, DEFAULT_HISTORY_CAPACITY};
use crate::machine::{Context, StateMachine};

/// Builder for constructing state machines with a fluent API.
///
/// States are referred to by name while building; names are resolved to
/// [`StateId`] handles in [`build`](Self::build), which reports the first
/// configuration error it finds.
pub struct MachineBuilder<D> {
    name: String,
    data: D,
    states: Vec<(String, StateHooks<D>)>,
    initial: Option<String>,
    transitions: Vec<(String, String, Guard<D>)>,
    log_transitions: bool,
    history_capacity: usize,
}

impl<D: 'static> MachineBuilder<D> {
    /// Create a new builder.
    pub fn new(name: impl Into<String>, data: D) -> Self {
        Self {
            name: name.into(),
            data,
            states: Vec::new(),
            initial: None,
            transitions: Vec::new(),
            log_transitions: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Add a state. The first one added is the initial state by default.
    pub fn state(mut self, name: impl Into<String>, hooks: StateHooks<D>) -> Self {
        self.states.push((name.into(), hooks));
        self
    }

    /// Set the initial state.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a guarded transition.
    pub fn transition<F>(mut self, from: impl Into<String>, to: impl Into<String>, guard: F) -> Self
    where
        F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
    {
        self.transitions
            .push((from.into(), to.into(), Guard::new(guard)));
        self
    }

    /// Add a transition taken on the first update in `from`.
    pub fn automatic(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.transitions
            .push((from.into(), to.into(), Guard::always()));
        self
    }

    /// See [`StateMachine::set_log_transitions`].
    pub fn log_transitions(mut self, enabled: bool) -> Self {
        self.log_transitions = enabled;
        self
    }

    /// See [`StateMachine::set_history_capacity`].
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Build the state machine, unstarted.
    pub fn build(self) -> Result<StateMachine<D>, MachineError> {
        let mut machine = StateMachine::new(self.name, self.data);
        machine.set_log_transitions(self.log_transitions);
        machine.set_history_capacity(self.history_capacity);

        for (name, hooks) in self.states {
            machine.add_state(name, hooks)?;
        }

        if let Some(initial) = self.initial {
            let id = resolve(&machine, &initial)?;
            machine.set_initial_state(id)?;
        }

        for (from, to, guard) in self.transitions {
            let from = resolve(&machine, &from)?;
            let to = resolve(&machine, &to)?;
            machine.push_transition(from, to, guard)?;
        }

        Ok(machine)
    }
}

fn resolve<D>(machine: &StateMachine<D>, name: &str) -> Result<StateId, MachineError> {
    machine
        .state_id(name)
        .ok_or_else(|| MachineError::UnknownState {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Door {
        opened: u32,
        locked: bool,
    }

    fn door() -> MachineBuilder<Door> {
        MachineBuilder::new("Door", Door::default())
            .state("CLOSED", StateHooks::new())
            .state(
                "OPEN",
                StateHooks::<Door>::new().on_enter(|ctx| {
                    ctx.data_mut().opened += 1;
                    Ok(())
                }),
            )
            .state("LOCKED", StateHooks::new())
    }

    #[test]
    fn builder_validates_state_names() {
        let result = door().initial("AJAR").build();
        assert!(matches!(result, Err(MachineError::UnknownState { name }) if name == "AJAR"));

        let result = door().automatic("CLOSED", "AJAR").build();
        assert!(matches!(result, Err(MachineError::UnknownState { .. })));
    }

    #[test]
    fn builder_rejects_duplicates_and_bad_identifiers() {
        let result = door().state("OPEN", StateHooks::new()).build();
        assert!(matches!(result, Err(MachineError::DuplicateState { .. })));

        let result = door().state("half-open", StateHooks::new()).build();
        assert!(matches!(result, Err(MachineError::InvalidIdentifier { .. })));
    }

    #[test]
    fn builder_rejects_self_transition() {
        let result = door().automatic("OPEN", "OPEN").build();
        assert!(matches!(result, Err(MachineError::SelfTransition { .. })));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let mut machine = door()
            .initial("CLOSED")
            .automatic("CLOSED", "OPEN")
            .transition("OPEN", "LOCKED", |ctx| ctx.data().locked)
            .history_capacity(1)
            .build()
            .unwrap();

        assert_eq!(machine.state_count(), 3);
        assert_eq!(machine.name(), "Door");

        machine.start().unwrap();
        machine.update(0.1).unwrap();
        assert_eq!(machine.current_state_name(), Some("OPEN"));
        assert_eq!(machine.data().opened, 1);

        machine.data_mut().locked = true;
        machine.update(0.1).unwrap();
        assert_eq!(machine.current_state_name(), Some("LOCKED"));
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn initial_defaults_to_first_state() {
        let machine = door().build().unwrap();
        assert_eq!(machine.initial_state(), StateId::new(0));

        let machine = door().initial("LOCKED").build().unwrap();
        assert_eq!(machine.state_name(machine.initial_state()), Some("LOCKED"));
    }
}
