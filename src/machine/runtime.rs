//! State machine that runs lifecycle hooks and resolves transitions.

use super::context::Context;
use super::transition::{StateDef, Transition};
use crate::core::{
    is_valid_identifier, Guard, HookResult, MachineError, StateHistory, StateHooks, StateId,
    StateTransition,
};
use crate::input::{Input, NoInput};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Reusable finite state machine.
///
/// A machine owns an ordered list of states, the user data shared by all of
/// their hooks, and the runtime position (current, pending and previous
/// state). Exactly one state is current once [`start`](Self::start) has been
/// called; before that no state is current and [`update`](Self::update)
/// fails.
///
/// A machine that is configured but never started can serve as a template:
/// [`new_instance`](Self::new_instance) clones it into independent runtime
/// instances, e.g. one per enemy.
///
/// # Example
///
/// ```rust
/// use ludum::core::StateHooks;
/// use ludum::machine::StateMachine;
///
/// let mut machine = StateMachine::new("Player", Vec::<String>::new());
/// let idle = machine
///     .add_state(
///         "IDLE",
///         StateHooks::new().on_update(|ctx, _dt| {
///             let moving = ctx.state_id("MOVING").unwrap();
///             ctx.change_state(moving)
///         }),
///     )
///     .unwrap();
/// let moving = machine
///     .add_state(
///         "MOVING",
///         StateHooks::<Vec<String>>::new().on_enter(|ctx| {
///             ctx.data_mut().push("started moving".to_string());
///             Ok(())
///         }),
///     )
///     .unwrap();
///
/// machine.start().unwrap();
/// assert_eq!(machine.current_state(), Some(idle));
///
/// machine.update(0.1).unwrap();
/// assert_eq!(machine.current_state(), Some(moving));
/// assert_eq!(machine.data(), &vec!["started moving".to_string()]);
/// ```
pub struct StateMachine<D> {
    name: String,
    instance: Uuid,
    states: Vec<StateDef<D>>,
    initialised: Vec<bool>,
    initial: StateId,
    current: Option<StateId>,
    next: StateId,
    previous: Option<StateId>,
    state_time: f64,
    data: D,
    history: StateHistory,
    log_transitions: bool,
}

impl<D> StateMachine<D> {
    /// Create an empty, unstarted machine owning `data`.
    pub fn new(name: impl Into<String>, data: D) -> Self {
        Self {
            name: name.into(),
            instance: Uuid::new_v4(),
            states: Vec::new(),
            initialised: Vec::new(),
            initial: StateId::new(0),
            current: None,
            next: StateId::new(0),
            previous: None,
            state_time: 0.0,
            data,
            history: StateHistory::new(),
            log_transitions: false,
        }
    }

    /// Register a new state.
    ///
    /// The first state added is the initial state unless
    /// [`set_initial_state`](Self::set_initial_state) says otherwise.
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        hooks: StateHooks<D>,
    ) -> Result<StateId, MachineError> {
        let name = name.into();
        if self.states.iter().any(|state| state.name == name) {
            return Err(MachineError::DuplicateState { name });
        }
        if !is_valid_identifier(&name) {
            return Err(MachineError::InvalidIdentifier { name });
        }

        let id = StateId::new(self.states.len());
        self.states.push(StateDef::new(name, hooks));
        self.initialised.push(false);
        Ok(id)
    }

    /// Choose which state [`start`](Self::start) enters.
    pub fn set_initial_state(&mut self, state: StateId) -> Result<(), MachineError> {
        if self.current.is_some() {
            return Err(MachineError::AlreadyStarted {
                machine: self.name.clone(),
            });
        }
        self.check_state(state)?;
        self.initial = state;
        self.next = state;
        Ok(())
    }

    /// Declare a guarded transition from `from` to `to`.
    ///
    /// Declared transitions of a state are checked in the order they were
    /// added, after the state's `update` hook, whenever the hook did not
    /// request a transition itself.
    pub fn add_transition<F>(&mut self, from: StateId, to: StateId, guard: F) -> Result<(), MachineError>
    where
        F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
    {
        self.push_transition(from, to, Guard::new(guard))
    }

    /// Declare a transition that is followed on the first update in `from`.
    pub fn add_automatic_transition(&mut self, from: StateId, to: StateId) -> Result<(), MachineError>
    where
        D: 'static,
    {
        self.push_transition(from, to, Guard::always())
    }

    pub(crate) fn push_transition(
        &mut self,
        from: StateId,
        to: StateId,
        guard: Guard<D>,
    ) -> Result<(), MachineError> {
        self.check_state(from)?;
        self.check_state(to)?;
        if from == to {
            return Err(MachineError::SelfTransition {
                state: self.states[from.index()].name.clone(),
            });
        }
        self.states[from.index()]
            .transitions
            .push(Transition { to, guard });
        Ok(())
    }

    /// Log every transition at `info` level instead of `debug`.
    pub fn set_log_transitions(&mut self, enabled: bool) {
        self.log_transitions = enabled;
    }

    /// Keep at most `capacity` transitions in the history.
    pub fn set_history_capacity(&mut self, capacity: usize) {
        self.history = StateHistory::with_capacity(capacity);
    }

    /// Enter the initial state.
    pub fn start(&mut self) -> Result<(), MachineError> {
        self.start_with_input(&NoInput)
    }

    /// Enter the initial state, exposing `input` to its hooks.
    pub fn start_with_input(&mut self, input: &dyn Input) -> Result<(), MachineError> {
        if self.current.is_some() {
            return Err(MachineError::AlreadyStarted {
                machine: self.name.clone(),
            });
        }
        if self.states.is_empty() {
            return Err(MachineError::NoStates {
                machine: self.name.clone(),
            });
        }

        let initial = self.next;
        self.current = Some(initial);
        self.state_time = 0.0;
        debug!(
            machine = %self.name,
            instance = %self.instance,
            state = %self.states[initial.index()].name,
            "state machine started"
        );
        self.enter(initial, input)
    }

    /// Run one update step.
    ///
    /// Calls the current state's `update` hook with `dt`, then performs at
    /// most one transition: the last one requested during the step or, when
    /// none was requested, the first declared transition whose guard passes.
    /// Returns the transition performed, if any.
    pub fn update(&mut self, dt: f64) -> Result<Option<StateTransition>, MachineError> {
        self.update_with_input(dt, &NoInput)
    }

    /// Like [`update`](Self::update), exposing `input` to hooks and guards.
    pub fn update_with_input(
        &mut self,
        dt: f64,
        input: &dyn Input,
    ) -> Result<Option<StateTransition>, MachineError> {
        let current = self.require_started()?;
        self.state_time += dt;

        let mut ctx = self.context(current, input);
        let states = ctx.states;
        let state = &states[current.index()];
        state.hooks.run_update(&mut ctx, dt)?;
        if ctx.pending_state().is_none() {
            if let Some(to) = state.pick_transition(&ctx) {
                *ctx.next = to;
            }
        }

        self.apply_pending_transition(input)
    }

    /// Perform the pending transition, if one was requested.
    ///
    /// [`update`](Self::update) calls this itself. Hosts that let other
    /// collaborators (such as scripted events) request transitions call it
    /// at the end of their tick.
    pub fn apply_pending_transition(
        &mut self,
        input: &dyn Input,
    ) -> Result<Option<StateTransition>, MachineError> {
        let from = self.require_started()?;
        let to = self.next;
        if to == from {
            return Ok(None);
        }

        let transition = StateTransition {
            from,
            to,
            state_time: self.state_time,
            timestamp: Utc::now(),
        };
        {
            let mut ctx = self.context(from, input);
            let states = ctx.states;
            states[from.index()].hooks.run_leave(&mut ctx)?;
        }
        self.log_transition(&transition);

        self.previous = Some(from);
        self.current = Some(to);
        self.state_time = 0.0;
        self.history.record(transition.clone());
        self.enter(to, input)?;
        Ok(Some(transition))
    }

    /// Request a transition from outside the machine's own hooks.
    pub fn change_state(&mut self, to: StateId) -> Result<(), MachineError> {
        let current = self.require_started()?;
        if to.index() >= self.states.len() {
            return Err(MachineError::InvalidState {
                requested: to,
                current: self.states[current.index()].name.clone(),
            });
        }
        self.next = to;
        Ok(())
    }

    /// Request a transition back to the previous state, if there is one.
    pub fn change_to_previous_state(&mut self) -> Result<bool, MachineError> {
        self.require_started()?;
        match self.previous {
            Some(previous) => {
                self.next = previous;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clone this machine's definition into a fresh, unstarted instance.
    ///
    /// States, hooks and declared transitions are shared with `self`; the
    /// user data is cloned, so instances never alias each other's fields.
    pub fn new_instance(&self) -> Self
    where
        D: Clone,
    {
        Self {
            name: self.name.clone(),
            instance: Uuid::new_v4(),
            states: self.states.clone(),
            initialised: vec![false; self.states.len()],
            initial: self.initial,
            current: None,
            next: self.initial,
            previous: None,
            state_time: 0.0,
            data: self.data.clone(),
            history: StateHistory::with_capacity(self.history.capacity()),
            log_transitions: self.log_transitions,
        }
    }

    /// Name given to the machine at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique id of this runtime instance.
    pub fn instance_id(&self) -> Uuid {
        self.instance
    }

    /// Whether [`start`](Self::start) has entered the initial state.
    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    /// The current state, or `None` before start.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Name of the current state, or `None` before start.
    pub fn current_state_name(&self) -> Option<&str> {
        self.current.map(|id| self.states[id.index()].name.as_str())
    }

    /// Target of the transition that will happen at the end of the step.
    pub fn pending_state(&self) -> Option<StateId> {
        self.current.filter(|current| *current != self.next).map(|_| self.next)
    }

    /// The state the machine was in before the last transition.
    pub fn previous_state(&self) -> Option<StateId> {
        self.previous
    }

    /// State entered by [`start`](Self::start).
    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    /// Number of states added so far.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Look a state up by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|state| state.name == name)
            .map(StateId::new)
    }

    /// Name of `id`, or `None` if no such state exists.
    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.states.get(id.index()).map(|state| state.name.as_str())
    }

    /// Seconds spent in the current state, as accumulated from `update` deltas.
    pub fn state_time(&self) -> f64 {
        self.state_time
    }

    /// Shared game data passed to every hook.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable access to the shared game data.
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Transitions performed so far, oldest first.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Context over the current state, for collaborators that run callbacks
    /// between `update` and [`apply_pending_transition`](Self::apply_pending_transition).
    pub(crate) fn running_context<'a>(
        &'a mut self,
        input: &'a dyn Input,
    ) -> Result<Context<'a, D>, MachineError> {
        let current = self.require_started()?;
        Ok(self.context(current, input))
    }

    pub(crate) fn check_state(&self, state: StateId) -> Result<(), MachineError> {
        if state.index() < self.states.len() {
            return Ok(());
        }
        Err(MachineError::InvalidState {
            requested: state,
            current: self
                .current_state_name()
                .unwrap_or("<not started>")
                .to_string(),
        })
    }

    fn require_started(&self) -> Result<StateId, MachineError> {
        self.current.ok_or_else(|| MachineError::NotStarted {
            machine: self.name.clone(),
        })
    }

    fn context<'a>(&'a mut self, current: StateId, input: &'a dyn Input) -> Context<'a, D> {
        Context {
            machine: &self.name,
            states: &self.states,
            data: &mut self.data,
            current,
            next: &mut self.next,
            previous: self.previous,
            state_time: self.state_time,
            input,
        }
    }

    fn enter(&mut self, state: StateId, input: &dyn Input) -> HookResult {
        let first_entry = !self.initialised[state.index()];
        self.initialised[state.index()] = true;

        let mut ctx = self.context(state, input);
        let states = ctx.states;
        let hooks = &states[state.index()].hooks;
        if first_entry {
            hooks.run_init(&mut ctx)?;
        }
        hooks.run_enter(&mut ctx)
    }

    fn log_transition(&self, transition: &StateTransition) {
        let from = &self.states[transition.from.index()].name;
        let to = &self.states[transition.to.index()].name;
        if self.log_transitions {
            info!(
                machine = %self.name,
                instance = %self.instance,
                %from,
                %to,
                state_time = transition.state_time,
                "state transition"
            );
        } else {
            debug!(
                machine = %self.name,
                instance = %self.instance,
                %from,
                %to,
                state_time = transition.state_time,
                "state transition"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type Log = Vec<String>;

    fn logging(name: &'static str) -> StateHooks<Log> {
        StateHooks::<Log>::new()
            .on_init(move |ctx| {
                ctx.data_mut().push(format!("{name}.init"));
                Ok(())
            })
            .on_enter(move |ctx| {
                ctx.data_mut().push(format!("{name}.enter"));
                Ok(())
            })
            .on_update(move |ctx, _dt| {
                ctx.data_mut().push(format!("{name}.update"));
                Ok(())
            })
            .on_leave(move |ctx| {
                ctx.data_mut().push(format!("{name}.leave"));
                Ok(())
            })
    }

    fn machine_with(names: &[&'static str]) -> (StateMachine<Log>, Vec<StateId>) {
        let mut machine = StateMachine::new("Test", Log::new());
        let ids = names
            .iter()
            .map(|name| machine.add_state(*name, logging(*name)).unwrap())
            .collect();
        (machine, ids)
    }

    #[test]
    fn first_state_is_initial() {
        let (mut machine, ids) = machine_with(&["FOO", "BAR"]);
        assert_eq!(machine.initial_state(), ids[0]);
        assert_eq!(machine.current_state(), None);

        machine.start().unwrap();
        assert_eq!(machine.current_state(), Some(ids[0]));
        assert_eq!(machine.data(), &vec!["FOO.init", "FOO.enter"]);
    }

    #[test]
    fn set_initial_state_overrides_default() {
        let (mut machine, ids) = machine_with(&["FOO", "BAR"]);
        machine.set_initial_state(ids[1]).unwrap();
        machine.set_initial_state(ids[0]).unwrap();
        machine.set_initial_state(ids[1]).unwrap();

        machine.start().unwrap();
        assert_eq!(machine.current_state_name(), Some("BAR"));
    }

    #[test]
    fn set_initial_state_rejects_unknown_state() {
        let mut machine: StateMachine<()> = StateMachine::new("Empty", ());
        let result = machine.set_initial_state(StateId::new(0));
        assert!(matches!(result, Err(MachineError::InvalidState { .. })));

        machine.add_state("FOO", StateHooks::new()).unwrap();
        let result = machine.set_initial_state(StateId::new(1));
        assert!(matches!(result, Err(MachineError::InvalidState { .. })));
    }

    #[test]
    fn set_initial_state_fails_after_start() {
        let (mut machine, ids) = machine_with(&["FOO", "BAR"]);
        machine.start().unwrap();

        let result = machine.set_initial_state(ids[1]);
        assert!(matches!(result, Err(MachineError::AlreadyStarted { .. })));
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let (mut machine, _) = machine_with(&["FOO"]);
        let result = machine.add_state("FOO", StateHooks::new());

        assert!(matches!(result, Err(MachineError::DuplicateState { name }) if name == "FOO"));
        assert_eq!(machine.state_count(), 1);
    }

    #[test]
    fn invalid_identifier_is_rejected() {
        let mut machine: StateMachine<()> = StateMachine::new("Test", ());
        let result = machine.add_state("invalid state", StateHooks::new());

        assert!(matches!(result, Err(MachineError::InvalidIdentifier { .. })));
        assert_eq!(machine.state_count(), 0);
    }

    #[test]
    fn update_before_start_fails() {
        let (mut machine, _) = machine_with(&["FOO"]);
        let result = machine.update(0.1);

        assert!(matches!(result, Err(MachineError::NotStarted { .. })));
        assert!(machine.data().is_empty());
        assert_eq!(machine.current_state(), None);
    }

    #[test]
    fn change_state_before_start_fails() {
        let (mut machine, ids) = machine_with(&["FOO", "BAR"]);
        let result = machine.change_state(ids[1]);
        assert!(matches!(result, Err(MachineError::NotStarted { .. })));
    }

    #[test]
    fn start_twice_fails() {
        let (mut machine, _) = machine_with(&["FOO"]);
        machine.start().unwrap();
        assert!(matches!(
            machine.start(),
            Err(MachineError::AlreadyStarted { .. })
        ));
    }

    #[test]
    fn start_without_states_fails() {
        let mut machine: StateMachine<()> = StateMachine::new("Empty", ());
        assert!(matches!(machine.start(), Err(MachineError::NoStates { .. })));
        assert!(!machine.is_started());
    }

    #[test]
    fn update_without_transition_stays_put() {
        let (mut machine, ids) = machine_with(&["FOO", "BAR"]);
        machine.start().unwrap();

        let transition = machine.update(0.25).unwrap();
        assert!(transition.is_none());
        assert_eq!(machine.current_state(), Some(ids[0]));
        assert_eq!(machine.state_time(), 0.25);
        assert_eq!(machine.data(), &vec!["FOO.init", "FOO.enter", "FOO.update"]);
    }

    #[test]
    fn last_change_request_wins() {
        let mut machine = StateMachine::new("Test", Log::new());
        let a = machine
            .add_state(
                "A",
                StateHooks::new().on_update(|ctx, _dt| {
                    let b = ctx.state_id("B").unwrap();
                    let c = ctx.state_id("C").unwrap();
                    ctx.change_state(b)?;
                    ctx.change_state(c)
                }),
            )
            .unwrap();
        let _b = machine.add_state("B", logging("B")).unwrap();
        let c = machine.add_state("C", logging("C")).unwrap();

        machine.start().unwrap();
        let transition = machine.update(0.1).unwrap().unwrap();

        assert_eq!(transition.from, a);
        assert_eq!(transition.to, c);
        assert_eq!(machine.current_state(), Some(c));
        assert_eq!(machine.data(), &vec!["C.init", "C.enter"]);
    }

    #[test]
    fn change_state_with_unknown_handle_names_current_state() {
        let mut machine = StateMachine::new("Test", ());
        machine
            .add_state(
                "ONLY",
                StateHooks::new().on_update(|ctx, _dt| ctx.change_state(StateId::new(3))),
            )
            .unwrap();
        machine.start().unwrap();

        match machine.update(0.1) {
            Err(MachineError::InvalidState { current, .. }) => assert_eq!(current, "ONLY"),
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn explicit_change_beats_declared_transition() {
        let mut machine = StateMachine::new("Test", ());
        let a = machine
            .add_state(
                "A",
                StateHooks::new().on_update(|ctx, _dt| {
                    let c = ctx.state_id("C").unwrap();
                    ctx.change_state(c)
                }),
            )
            .unwrap();
        let b = machine.add_state("B", StateHooks::new()).unwrap();
        let c = machine.add_state("C", StateHooks::new()).unwrap();
        machine.add_automatic_transition(a, b).unwrap();

        machine.start().unwrap();
        machine.update(0.1).unwrap();
        assert_eq!(machine.current_state(), Some(c));
    }

    #[test]
    fn declared_transitions_follow_insertion_order() {
        let mut machine = StateMachine::new("Test", 5);
        let a = machine.add_state("A", StateHooks::new()).unwrap();
        let b = machine.add_state("B", StateHooks::new()).unwrap();
        let c = machine.add_state("C", StateHooks::new()).unwrap();
        machine.add_transition(a, b, |ctx| *ctx.data() > 3).unwrap();
        machine.add_transition(a, c, |ctx| *ctx.data() > 1).unwrap();

        machine.start().unwrap();
        machine.update(0.1).unwrap();
        assert_eq!(machine.current_state(), Some(b));
    }

    #[test]
    fn declared_transition_waits_for_guard() {
        let mut machine = StateMachine::new("Test", ());
        let a = machine.add_state("A", StateHooks::new()).unwrap();
        let b = machine.add_state("B", StateHooks::new()).unwrap();
        machine
            .add_transition(a, b, |ctx| ctx.input().is_key_down(Key::ENTER))
            .unwrap();

        let mut input = KeyState::new();
        machine.start().unwrap();
        machine.update_with_input(0.1, &input).unwrap();
        assert_eq!(machine.current_state(), Some(a));

        input.press(Key::ENTER);
        machine.update_with_input(0.1, &input).unwrap();
        assert_eq!(machine.current_state(), Some(b));
    }

    #[test]
    fn self_transition_is_rejected() {
        let mut machine: StateMachine<()> = StateMachine::new("Test", ());
        let a = machine.add_state("A", StateHooks::new()).unwrap();

        let result = machine.add_automatic_transition(a, a);
        assert!(matches!(result, Err(MachineError::SelfTransition { .. })));

        let result = machine.add_automatic_transition(a, StateId::new(4));
        assert!(matches!(result, Err(MachineError::InvalidState { .. })));
    }

    #[test]
    fn init_runs_only_on_first_entry() {
        let (mut machine, ids) = machine_with(&["A", "B"]);
        machine.add_automatic_transition(ids[0], ids[1]).unwrap();
        machine.add_automatic_transition(ids[1], ids[0]).unwrap();

        machine.start().unwrap();
        machine.update(0.1).unwrap();
        machine.update(0.1).unwrap();

        let inits: Vec<_> = machine
            .data()
            .iter()
            .filter(|entry| entry.ends_with(".init"))
            .cloned()
            .collect();
        assert_eq!(inits, vec!["A.init", "B.init"]);
        assert_eq!(machine.current_state(), Some(ids[0]));
    }

    #[test]
    fn state_time_resets_on_transition() {
        let (mut machine, ids) = machine_with(&["A", "B"]);
        machine
            .add_transition(ids[0], ids[1], |ctx| ctx.state_time() >= 1.0)
            .unwrap();

        machine.start().unwrap();
        machine.update(0.5).unwrap();
        assert_eq!(machine.state_time(), 0.5);
        machine.update(0.5).unwrap();

        assert_eq!(machine.current_state(), Some(ids[1]));
        assert_eq!(machine.state_time(), 0.0);
        assert_eq!(machine.history().last().map(|t| t.state_time), Some(1.0));
    }

    #[test]
    fn previous_state_can_be_restored() {
        let (mut machine, ids) = machine_with(&["PLAYING", "PAUSED"]);
        machine.start().unwrap();
        assert!(!machine.change_to_previous_state().unwrap());

        machine.change_state(ids[1]).unwrap();
        machine.update(0.1).unwrap();
        assert_eq!(machine.previous_state(), Some(ids[0]));

        assert!(machine.change_to_previous_state().unwrap());
        machine.update(0.1).unwrap();
        assert_eq!(machine.current_state(), Some(ids[0]));
        assert_eq!(machine.previous_state(), Some(ids[1]));
    }

    #[test]
    fn change_requested_on_enter_waits_for_next_update() {
        let mut machine = StateMachine::new("Test", Log::new());
        let a = machine
            .add_state(
                "A",
                logging("A").on_enter(|ctx| {
                    let b = ctx.state_id("B").unwrap();
                    ctx.change_state(b)
                }),
            )
            .unwrap();
        let b = machine.add_state("B", logging("B")).unwrap();

        machine.start().unwrap();
        assert_eq!(machine.current_state(), Some(a));
        assert_eq!(machine.pending_state(), Some(b));

        machine.update(0.1).unwrap();
        assert_eq!(machine.current_state(), Some(b));
        assert_eq!(
            machine.data(),
            &vec!["A.init", "A.update", "A.leave", "B.init", "B.enter"]
        );
    }

    #[test]
    fn callback_errors_propagate_unchanged() {
        let mut machine = StateMachine::new("Test", ());
        machine
            .add_state(
                "A",
                StateHooks::new().on_update(|_ctx, _dt| Err(MachineError::callback("boss missing"))),
            )
            .unwrap();
        machine.start().unwrap();

        match machine.update(0.1) {
            Err(MachineError::Callback(source)) => assert_eq!(source.to_string(), "boss missing"),
            other => panic!("expected Callback, got {other:?}"),
        }
    }

    #[test]
    fn failed_leave_keeps_current_state() {
        let mut machine = StateMachine::new("Test", ());
        let a = machine
            .add_state(
                "A",
                StateHooks::new().on_leave(|_ctx| Err(MachineError::callback("stuck"))),
            )
            .unwrap();
        let b = machine.add_state("B", StateHooks::new()).unwrap();
        machine.add_automatic_transition(a, b).unwrap();

        machine.start().unwrap();
        assert!(machine.update(0.1).is_err());
        assert_eq!(machine.current_state(), Some(a));
        assert_eq!(machine.pending_state(), Some(b));
    }

    #[test]
    fn new_instance_copies_data_and_shares_hooks() {
        let enters = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&enters);

        let mut template = StateMachine::new("Enemy", vec![1, 2, 3]);
        let patrol = template
            .add_state(
                "PATROL",
                StateHooks::new().on_enter(move |_ctx| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            )
            .unwrap();
        let chase = template.add_state("CHASE", StateHooks::new()).unwrap();
        template.set_initial_state(chase).unwrap();
        template.set_initial_state(patrol).unwrap();

        let mut first = template.new_instance();
        let mut second = template.new_instance();
        assert_ne!(first.instance_id(), second.instance_id());
        assert!(!first.is_started());

        first.start().unwrap();
        second.start().unwrap();
        first.data_mut().push(4);

        assert_eq!(enters.load(Ordering::SeqCst), 2);
        assert_eq!(first.data(), &vec![1, 2, 3, 4]);
        assert_eq!(second.data(), &vec![1, 2, 3]);
        assert_eq!(template.data(), &vec![1, 2, 3]);
        assert!(!template.is_started());
        assert_eq!(second.current_state(), Some(patrol));
    }

    #[test]
    fn history_records_path() {
        let (mut machine, ids) = machine_with(&["A", "B", "C"]);
        machine.add_automatic_transition(ids[0], ids[1]).unwrap();
        machine.add_automatic_transition(ids[1], ids[2]).unwrap();

        machine.start().unwrap();
        machine.update(0.1).unwrap();
        machine.update(0.1).unwrap();
        machine.update(0.1).unwrap();

        assert_eq!(machine.history().path(), ids);
    }
}
