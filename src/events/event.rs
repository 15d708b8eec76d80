//! Scripted event definitions.

use crate::core::{HookResult, LifecycleHook, StateId, UpdateHook};
use crate::machine::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Predicate deciding when a pending event fires.
pub type Trigger<D> = Arc<dyn Fn(&Context<'_, D>) -> bool + Send + Sync>;

/// Predicate deciding when an active event expires.
///
/// Receives the state time at which the event fired.
pub type Expiry<D> = Arc<dyn Fn(&Context<'_, D>, f64) -> bool + Send + Sync>;

/// Renders an event or a state onto the host's surface.
pub type DrawHook<D, S> = Arc<dyn Fn(&D, &mut S) -> HookResult + Send + Sync>;

/// Where an event is in its life within the current state entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EventStatus {
    Pending,
    Active,
    Removed,
}

/// Which constructor produced an event. Used in log output only.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EventKind {
    Custom,
    AlwaysOn,
    Time,
    KeyPress,
    Condition,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Custom => "custom",
            Self::AlwaysOn => "always_on",
            Self::Time => "time",
            Self::KeyPress => "key_press",
            Self::Condition => "condition",
        };
        f.write_str(name)
    }
}

/// Optional callbacks of a scripted event. Unset callbacks are no-ops.
pub struct EventHooks<D, S> {
    enter: Option<LifecycleHook<D>>,
    update: Option<UpdateHook<D>>,
    leave: Option<LifecycleHook<D>>,
    draw: Option<DrawHook<D, S>>,
}

impl<D, S> EventHooks<D, S> {
    pub fn new() -> Self {
        Self {
            enter: None,
            update: None,
            leave: None,
            draw: None,
        }
    }

    /// Run when the event fires.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, D>) -> HookResult + Send + Sync + 'static,
    {
        self.enter = Some(Arc::new(hook));
        self
    }

    /// Run on every tick while the event is active.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, D>, f64) -> HookResult + Send + Sync + 'static,
    {
        self.update = Some(Arc::new(hook));
        self
    }

    /// Run when the event expires, or right after `enter` for one-shot events.
    pub fn on_leave<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, D>) -> HookResult + Send + Sync + 'static,
    {
        self.leave = Some(Arc::new(hook));
        self
    }

    /// Draw while the event is active.
    pub fn on_draw<F>(mut self, hook: F) -> Self
    where
        F: Fn(&D, &mut S) -> HookResult + Send + Sync + 'static,
    {
        self.draw = Some(Arc::new(hook));
        self
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

    pub(crate) fn run_draw(&self, data: &D, surface: &mut S) -> HookResult {
        self.draw.as_ref().map_or(Ok(()), |hook| hook(data, surface))
    }
}

impl<D, S> Default for EventHooks<D, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, S> Clone for EventHooks<D, S> {
    fn clone(&self) -> Self {
        Self {
            enter: self.enter.clone(),
            update: self.update.clone(),
            leave: self.leave.clone(),
            draw: self.draw.clone(),
        }
    }
}

/// A scripted event owned by a state.
///
/// Each time its owning state is entered the event starts out pending. It
/// fires on the first tick its trigger holds: `enter` runs, and then
///
/// - without an expiry predicate the event is one-shot: `leave` runs in the
///   same tick and it is removed;
/// - with one it becomes active, receives `update` and `draw` calls, and is
///   removed (after `leave`) on the first later tick its expiry holds.
///
/// An event with a target state also requests a transition to that state
/// right after its `enter` hook.
///
/// # Example
///
/// ```rust
/// use ludum::events::{EventHooks, ScriptedEvent};
///
/// let flash: ScriptedEvent<u32, Vec<String>> = ScriptedEvent::new(|ctx| ctx.state_time() >= 2.0)
///     .expires_when(|ctx, fired_at| ctx.state_time() >= fired_at + 0.5)
///     .with_hooks(EventHooks::new().on_draw(|_data, frame: &mut Vec<String>| {
///         frame.push("flash".to_string());
///         Ok(())
///     }));
///
/// assert!(!flash.is_one_shot());
/// assert!(flash.target().is_none());
/// ```
pub struct ScriptedEvent<D, S> {
    pub(crate) kind: EventKind,
    pub(crate) trigger: Trigger<D>,
    pub(crate) expire: Option<Expiry<D>>,
    pub(crate) hooks: EventHooks<D, S>,
    pub(crate) target: Option<StateId>,
}

impl<D, S> ScriptedEvent<D, S> {
    /// One-shot event that fires when `trigger` holds.
    pub fn new<F>(trigger: F) -> Self
    where
        F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
    {
        Self {
            kind: EventKind::Custom,
            trigger: Arc::new(trigger),
            expire: None,
            hooks: EventHooks::new(),
            target: None,
        }
    }

    /// Keep the event active after it fires until `expire` holds.
    pub fn expires_when<F>(mut self, expire: F) -> Self
    where
        F: Fn(&Context<'_, D>, f64) -> bool + Send + Sync + 'static,
    {
        self.expire = Some(Arc::new(expire));
        self
    }

    /// Replace the event's hooks.
    pub fn with_hooks(mut self, hooks: EventHooks<D, S>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Request a transition to `target` whenever the event fires.
    pub fn changes_state_to(mut self, target: StateId) -> Self {
        self.target = Some(target);
        self
    }

    pub(crate) fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn target(&self) -> Option<StateId> {
        self.target
    }

    /// One-shot events enter and leave in the same tick.
    pub fn is_one_shot(&self) -> bool {
        self.expire.is_none()
    }

    pub(crate) fn is_triggered(&self, ctx: &Context<'_, D>) -> bool {
        (self.trigger)(ctx)
    }

    pub(crate) fn is_expired(&self, ctx: &Context<'_, D>, fired_at: f64) -> bool {
        self.expire
            .as_ref()
            .is_some_and(|expire| expire(ctx, fired_at))
    }
}

impl<D, S> Clone for ScriptedEvent<D, S> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            trigger: self.trigger.clone(),
            expire: self.expire.clone(),
            hooks: self.hooks.clone(),
            target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateId;
    use crate::input::NoInput;
    use crate::machine::testing::context_for;

    #[test]
    fn new_event_is_one_shot() {
        let event: ScriptedEvent<(), ()> = ScriptedEvent::new(|_ctx| true);
        assert!(event.is_one_shot());
        assert_eq!(event.kind(), EventKind::Custom);

        context_for(&mut (), StateId::new(0), 10.0, &NoInput, |ctx| {
            assert!(event.is_triggered(ctx));
            assert!(!event.is_expired(ctx, 0.0));
        });
    }

    #[test]
    fn expiry_sees_fire_time() {
        let event: ScriptedEvent<(), ()> = ScriptedEvent::new(|_ctx| true)
            .expires_when(|ctx, fired_at| ctx.state_time() >= fired_at + 1.0);

        context_for(&mut (), StateId::new(0), 2.5, &NoInput, |ctx| {
            assert!(!event.is_expired(ctx, 2.0));
            assert!(event.is_expired(ctx, 1.5));
        });
    }

    #[test]
    fn unset_hooks_are_noops() {
        let hooks: EventHooks<u32, Vec<u32>> = EventHooks::new();
        let mut surface = Vec::new();

        context_for(&mut 7, StateId::new(0), 0.0, &NoInput, |ctx| {
            hooks.run_enter(ctx).unwrap();
            hooks.run_update(ctx, 0.1).unwrap();
            hooks.run_leave(ctx).unwrap();
        });
        hooks.run_draw(&7, &mut surface).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn draw_hook_receives_data_and_surface() {
        let hooks: EventHooks<u32, Vec<u32>> =
            EventHooks::new().on_draw(|data, surface: &mut Vec<u32>| {
                surface.push(*data * 2);
                Ok(())
            });
        let mut surface = Vec::new();

        hooks.run_draw(&21, &mut surface).unwrap();
        assert_eq!(surface, vec![42]);
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(EventKind::KeyPress.to_string(), "key_press");
        assert_eq!(EventKind::AlwaysOn.to_string(), "always_on");
    }
}
