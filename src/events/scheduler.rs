//! Per-state scheduling of scripted events.

use super::event::{EventStatus, ScriptedEvent};
use crate::core::{HookResult, StateId};
use crate::machine::Context;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug)]
struct ActiveEvent {
    slot: usize,
    fired_at: f64,
}

/// Runs the scripted events of whichever state is current.
///
/// Events are registered per owning state. Entering a state resets its
/// events to pending and discards whatever the previous state left behind.
/// Each [`tick`](Self::tick) then
///
/// 1. expires active events whose expiry holds, calling `leave`,
/// 2. updates the remaining active events,
/// 3. fires pending events whose trigger holds, in registration order.
///
/// An event fired in step 3 is neither expired nor updated until the next
/// tick.
///
/// # Example
///
/// ```rust
/// use ludum::core::StateId;
/// use ludum::events::{triggers, EventHooks, EventScheduler, EventStatus};
///
/// let playing = StateId::new(0);
/// let mut scheduler: EventScheduler<u32, ()> = EventScheduler::new();
/// let index = scheduler.add_event(playing, triggers::at_time(3.0, None, EventHooks::new()));
///
/// scheduler.enter_state(playing);
/// assert_eq!(scheduler.status(playing, index), Some(EventStatus::Pending));
/// assert_eq!(scheduler.pending_len(), 1);
/// ```
pub struct EventScheduler<D, S> {
    definitions: Vec<Vec<ScriptedEvent<D, S>>>,
    owner: Option<StateId>,
    status: Vec<EventStatus>,
    pending: Vec<usize>,
    active: Vec<ActiveEvent>,
}

impl<D, S> EventScheduler<D, S> {
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
            owner: None,
            status: Vec::new(),
            pending: Vec::new(),
            active: Vec::new(),
        }
    }

    /// Register `event` on `owner` and return its index among that state's
    /// events.
    ///
    /// Events added to the state that is currently running take effect the
    /// next time it is entered.
    pub fn add_event(&mut self, owner: StateId, event: ScriptedEvent<D, S>) -> usize {
        if self.definitions.len() <= owner.index() {
            self.definitions.resize_with(owner.index() + 1, Vec::new);
        }
        let events = &mut self.definitions[owner.index()];
        events.push(event);
        events.len() - 1
    }

    /// Make `owner`'s events the current ones, all pending.
    pub fn enter_state(&mut self, owner: StateId) {
        let count = self.events_of(owner).len();
        self.owner = Some(owner);
        self.status = vec![EventStatus::Pending; count];
        self.pending = (0..count).collect();
        self.active.clear();
        debug!(state = %owner, events = count, "scripted events reset");
    }

    /// Run one scheduler pass over the current state's events.
    ///
    /// `ctx` must be a context over the state passed to the latest
    /// [`enter_state`](Self::enter_state). Callback failures are returned
    /// as-is; events already processed in this pass keep their new status.
    pub fn tick(&mut self, ctx: &mut Context<'_, D>, dt: f64) -> HookResult {
        let Some(owner) = self.owner else {
            return Ok(());
        };
        let Some(events) = self.definitions.get(owner.index()) else {
            return Ok(());
        };

        let mut i = 0;
        while i < self.active.len() {
            let entry = self.active[i];
            let event = &events[entry.slot];
            if !event.is_expired(ctx, entry.fired_at) {
                i += 1;
                continue;
            }
            self.active.remove(i);
            self.status[entry.slot] = EventStatus::Removed;
            trace!(state = %owner, slot = entry.slot, kind = %event.kind, "event expired");
            event.hooks.run_leave(ctx)?;
        }

        for entry in &self.active {
            events[entry.slot].hooks.run_update(ctx, dt)?;
        }

        let mut i = 0;
        while i < self.pending.len() {
            let slot = self.pending[i];
            let event = &events[slot];
            if !event.is_triggered(ctx) {
                i += 1;
                continue;
            }
            self.pending.remove(i);
            trace!(state = %owner, slot, kind = %event.kind, "event fired");

            if event.is_one_shot() {
                self.status[slot] = EventStatus::Removed;
            } else {
                self.status[slot] = EventStatus::Active;
                self.active.push(ActiveEvent {
                    slot,
                    fired_at: ctx.state_time(),
                });
            }

            event.hooks.run_enter(ctx)?;
            if let Some(target) = event.target {
                ctx.change_state(target)?;
            }
            if event.is_one_shot() {
                event.hooks.run_leave(ctx)?;
            }
        }
        Ok(())
    }

    /// Draw the active events, in the order they fired.
    pub fn draw(&self, data: &D, surface: &mut S) -> HookResult {
        let Some(events) = self.owner.and_then(|owner| self.definitions.get(owner.index())) else {
            return Ok(());
        };
        for entry in &self.active {
            events[entry.slot].hooks.run_draw(data, surface)?;
        }
        Ok(())
    }

    /// Status of `owner`'s event at `index` in the current state entry.
    ///
    /// Returns `None` unless `owner` is the state whose events are running.
    pub fn status(&self, owner: StateId, index: usize) -> Option<EventStatus> {
        if self.owner != Some(owner) {
            return None;
        }
        self.status.get(index).copied()
    }

    /// Events of the current state still waiting for their trigger.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Events of the current state that fired and have not expired.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of events registered on `owner`.
    pub fn event_count(&self, owner: StateId) -> usize {
        self.events_of(owner).len()
    }

    fn events_of(&self, owner: StateId) -> &[ScriptedEvent<D, S>] {
        self.definitions
            .get(owner.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl<D, S> Default for EventScheduler<D, S> {
    fn default() -> Self {
        Self::new()
    }
}
