//! A running game: one state machine plus its scripted events.

use super::config::EngineConfig;
use crate::core::{HookResult, MachineError, StateHooks, StateId, StateTransition};
use crate::events::{triggers, DrawHook, EventHooks, EventScheduler, ScriptedEvent};
use crate::input::{Input, Key};
use crate::machine::{Context, StateMachine};
use crate::time::GameClock;
use std::sync::Arc;
use tracing::debug;

/// A game driven frame by frame by its host.
///
/// The host calls [`start`](Self::start) once, then every frame
/// [`update`](Self::update) (or [`tick`](Self::tick) with a wall-clock
/// reading) followed by [`draw`](Self::draw). A frame
///
/// 1. runs the current state's `update` and performs at most one
///    transition (requested, or from the declared transition table),
/// 2. ticks the current state's scripted events,
/// 3. performs a transition requested by an event, unless step 1 already
///    transitioned, in which case it waits for the next frame.
///
/// Each state change re-arms the new state's events and, by default, clears
/// the host's input.
///
/// `D` is the game's data, shared by every callback. `S` is whatever the
/// host draws onto.
///
/// # Example
///
/// ```rust
/// use ludum::core::StateHooks;
/// use ludum::events::EventHooks;
/// use ludum::game::Game;
/// use ludum::input::{Key, KeyState};
///
/// let mut game: Game<u32, Vec<String>> = Game::new("Demo", 0);
/// let title = game.add_state("TITLE", StateHooks::new()).unwrap();
/// let playing = game.add_state("PLAYING", StateHooks::new()).unwrap();
/// game.add_change_state_on_key_press_event(title, Some(Key::ENTER), playing, EventHooks::new())
///     .unwrap();
/// game.set_state_draw(title, |_score, frame: &mut Vec<String>| {
///     frame.push("press enter".to_string());
///     Ok(())
/// })
/// .unwrap();
///
/// let mut input = KeyState::new();
/// game.start(&mut input).unwrap();
///
/// let mut frame = Vec::new();
/// game.draw(&mut frame).unwrap();
/// assert_eq!(frame, vec!["press enter".to_string()]);
///
/// input.press(Key::ENTER);
/// game.update(0.016, &mut input).unwrap();
/// assert_eq!(game.current_state(), Some(playing));
/// ```
pub struct Game<D, S = ()> {
    machine: StateMachine<D>,
    events: EventScheduler<D, S>,
    draws: Vec<Option<DrawHook<D, S>>>,
    clock: GameClock,
    config: EngineConfig,
}

impl<D: 'static, S> Game<D, S> {
    /// Game with the default [`EngineConfig`].
    pub fn new(name: impl Into<String>, data: D) -> Self {
        Self::with_config(name, data, EngineConfig::default())
    }

    pub fn with_config(name: impl Into<String>, data: D, config: EngineConfig) -> Self {
        let mut machine = StateMachine::new(name, data);
        machine.set_log_transitions(config.log_transitions);
        Self {
            machine,
            events: EventScheduler::new(),
            draws: Vec::new(),
            clock: GameClock::default(),
            config,
        }
    }

    /// Add a state. See [`StateMachine::add_state`].
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        hooks: StateHooks<D>,
    ) -> Result<StateId, MachineError> {
        let id = self.machine.add_state(name, hooks)?;
        self.draws.push(None);
        Ok(id)
    }

    /// Set the hook that draws `state` while it is current.
    pub fn set_state_draw<F>(&mut self, state: StateId, draw: F) -> Result<(), MachineError>
    where
        F: Fn(&D, &mut S) -> HookResult + Send + Sync + 'static,
    {
        self.machine.check_state(state)?;
        self.draws[state.index()] = Some(Arc::new(draw));
        Ok(())
    }

    /// Choose the state entered by [`start`](Self::start).
    pub fn set_initial_state(&mut self, state: StateId) -> Result<(), MachineError> {
        self.machine.set_initial_state(state)
    }

    /// Declare a guarded transition, checked after `from`'s `update` hook.
    pub fn add_transition<F>(&mut self, from: StateId, to: StateId, guard: F) -> Result<(), MachineError>
    where
        F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
    {
        self.machine.add_transition(from, to, guard)
    }

    /// Declare a transition taken on the first update in `from`.
    pub fn add_automatic_transition(&mut self, from: StateId, to: StateId) -> Result<(), MachineError> {
        self.machine.add_automatic_transition(from, to)
    }

    /// Register a scripted event on `owner`. Returns its index among the
    /// owner's events.
    pub fn add_event(
        &mut self,
        owner: StateId,
        event: ScriptedEvent<D, S>,
    ) -> Result<usize, MachineError> {
        self.machine.check_state(owner)?;
        if let Some(target) = event.target() {
            self.machine.check_state(target)?;
        }
        Ok(self.events.add_event(owner, event))
    }

    /// Event active for as long as `owner` is current.
    pub fn add_always_on_event(
        &mut self,
        owner: StateId,
        hooks: EventHooks<D, S>,
    ) -> Result<usize, MachineError> {
        self.add_event(owner, triggers::always_on(hooks))
    }

    /// Event that fires at state time `t`, active for `duration` seconds if
    /// one is given.
    pub fn add_time_event(
        &mut self,
        owner: StateId,
        t: f64,
        duration: Option<f64>,
        hooks: EventHooks<D, S>,
    ) -> Result<usize, MachineError> {
        self.add_event(owner, triggers::at_time(t, duration, hooks))
    }

    /// One-shot event that moves the game to `target` at state time `time`.
    pub fn add_change_state_at_time_event(
        &mut self,
        owner: StateId,
        t: f64,
        target: StateId,
        hooks: EventHooks<D, S>,
    ) -> Result<usize, MachineError> {
        self.add_event(owner, triggers::change_state_at_time(t, target, hooks))
    }

    /// Event that fires when `key` is down (any key for `None`), active for
    /// `duration` seconds if one is given.
    pub fn add_key_press_event(
        &mut self,
        owner: StateId,
        key: Option<Key>,
        duration: Option<f64>,
        hooks: EventHooks<D, S>,
    ) -> Result<usize, MachineError> {
        self.add_event(owner, triggers::on_key_press(key, duration, hooks))
    }

    /// Event that moves the game to `target` when `key` (or any key) is down.
    pub fn add_change_state_on_key_press_event(
        &mut self,
        owner: StateId,
        key: Option<Key>,
        target: StateId,
        hooks: EventHooks<D, S>,
    ) -> Result<usize, MachineError> {
        self.add_event(owner, triggers::change_state_on_key_press(key, target, hooks))
    }

    /// One-shot event that fires once `condition` holds.
    pub fn add_condition_event<F>(
        &mut self,
        owner: StateId,
        condition: F,
        hooks: EventHooks<D, S>,
    ) -> Result<usize, MachineError>
    where
        F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
    {
        self.add_event(owner, triggers::on_condition(condition, hooks))
    }

    /// Event that moves the game to `target` once `condition` holds.
    pub fn add_game_condition_event<F>(
        &mut self,
        owner: StateId,
        condition: F,
        target: StateId,
        hooks: EventHooks<D, S>,
    ) -> Result<usize, MachineError>
    where
        F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
    {
        self.add_event(owner, triggers::game_condition(condition, target, hooks))
    }

    /// Enter the initial state and arm its events.
    ///
    /// A failing `enter` hook still leaves the initial state current, with
    /// its events armed.
    pub fn start(&mut self, input: &mut dyn Input) -> Result<(), MachineError> {
        let before = self.machine.current_state();
        let result = self.machine.start_with_input(&*input);
        self.follow_machine(before, input);
        result?;
        debug!(game = %self.machine.name(), "game started");
        Ok(())
    }

    /// Run one frame with a host-supplied delta, in seconds.
    ///
    /// The delta is clamped to the configured maximum and ignored while the
    /// game is paused.
    pub fn update(
        &mut self,
        dt: f64,
        input: &mut dyn Input,
    ) -> Result<Option<StateTransition>, MachineError> {
        let dt = self.clock.advance(self.config.clamp_delta(dt));
        self.step(dt, input)
    }

    /// Run one frame, deriving the delta from a wall-clock reading.
    pub fn tick(
        &mut self,
        wall_now: f64,
        input: &mut dyn Input,
    ) -> Result<Option<StateTransition>, MachineError> {
        let dt = self.config.clamp_delta(self.clock.tick(wall_now));
        self.step(dt, input)
    }

    /// Draw the current state, then its active events.
    pub fn draw(&self, surface: &mut S) -> HookResult {
        let current = self
            .machine
            .current_state()
            .ok_or_else(|| MachineError::NotStarted {
                machine: self.machine.name().to_string(),
            })?;
        if let Some(draw) = &self.draws[current.index()] {
            draw(self.machine.data(), surface)?;
        }
        self.events.draw(self.machine.data(), surface)
    }

    /// Request a state change, performed at the end of the next frame.
    pub fn change_state(&mut self, to: StateId) -> Result<(), MachineError> {
        self.machine.change_state(to)
    }

    /// Request a change back to the previous state. Returns whether there
    /// was one.
    pub fn change_to_previous_state(&mut self) -> Result<bool, MachineError> {
        self.machine.change_to_previous_state()
    }

    /// Stop counting time. Frames still run, with a delta of zero.
    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Resume counting time.
    pub fn unpause(&mut self) {
        self.clock.unpause();
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Restart the clock at `wall_now`, e.g. before the first [`tick`](Self::tick).
    pub fn reset_clock(&mut self, wall_now: f64) {
        self.clock = GameClock::starting_at(wall_now);
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// The current state, or `None` before start.
    pub fn current_state(&self) -> Option<StateId> {
        self.machine.current_state()
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.machine.current_state_name()
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.machine.state_id(name)
    }

    /// Seconds spent in the current state, excluding paused time.
    pub fn state_time(&self) -> f64 {
        self.machine.state_time()
    }

    /// The underlying state machine.
    pub fn machine(&self) -> &StateMachine<D> {
        &self.machine
    }

    /// The scheduler holding every state's scripted events.
    pub fn events(&self) -> &EventScheduler<D, S> {
        &self.events
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn data(&self) -> &D {
        self.machine.data()
    }

    pub fn data_mut(&mut self) -> &mut D {
        self.machine.data_mut()
    }

    fn step(
        &mut self,
        dt: f64,
        input: &mut dyn Input,
    ) -> Result<Option<StateTransition>, MachineError> {
        let before = self.machine.current_state();
        let result = self.machine.update_with_input(dt, &*input);
        self.follow_machine(before, input);
        let transition = result?;

        {
            let mut ctx = self.machine.running_context(&*input)?;
            self.events.tick(&mut ctx, dt)?;
        }

        if transition.is_some() {
            return Ok(transition);
        }
        let before = self.machine.current_state();
        let result = self.machine.apply_pending_transition(&*input);
        self.follow_machine(before, input);
        result
    }

    /// Re-arm events if the machine's current state moved away from `before`.
    /// Called on success and failure alike: a failing `enter` hook still
    /// leaves the new state current.
    fn follow_machine(&mut self, before: Option<StateId>, input: &mut dyn Input) {
        let current = self.machine.current_state();
        if current == before {
            return;
        }
        if let Some(state) = current {
            self.events.enter_state(state);
            if self.config.clear_input_on_transition {
                input.clear();
            }
        }
    }
}
