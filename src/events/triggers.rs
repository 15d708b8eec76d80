//! Ready-made triggers and event constructors.
//!
//! Time is always state time: seconds since the owning state was entered,
//! excluding paused periods.

use super::event::{EventHooks, EventKind, ScriptedEvent};
use crate::core::StateId;
use crate::input::Key;
use crate::machine::Context;

/// Trigger that holds on every tick.
pub fn always<D>(_ctx: &Context<'_, D>) -> bool {
    true
}

/// Expiry that never holds.
pub fn never<D>(_ctx: &Context<'_, D>, _fired_at: f64) -> bool {
    false
}

/// Trigger that holds once `t` seconds of state time have passed.
pub fn time_reached<D: 'static>(t: f64) -> impl Fn(&Context<'_, D>) -> bool + Send + Sync + 'static {
    move |ctx| ctx.state_time() >= t
}

/// Trigger that holds while `key` is down, or any key when `key` is `None`.
pub fn key_down<D: 'static>(key: Option<Key>) -> impl Fn(&Context<'_, D>) -> bool + Send + Sync + 'static {
    move |ctx| match key {
        Some(key) => ctx.input().is_key_down(key),
        None => ctx.input().any_key_down(),
    }
}

/// Event that fires as soon as its state is entered and stays active until
/// the state is left.
pub fn always_on<D: 'static, S>(hooks: EventHooks<D, S>) -> ScriptedEvent<D, S> {
    ScriptedEvent::new(always::<D>)
        .expires_when(never::<D>)
        .with_hooks(hooks)
        .with_kind(EventKind::AlwaysOn)
}

/// Event that fires at state time `t`.
///
/// With a positive `duration` it stays active until state time
/// `t + duration`; otherwise it is one-shot.
pub fn at_time<D: 'static, S>(
    t: f64,
    duration: Option<f64>,
    hooks: EventHooks<D, S>,
) -> ScriptedEvent<D, S> {
    let event = ScriptedEvent::new(time_reached(t))
        .with_hooks(hooks)
        .with_kind(EventKind::Time);
    match duration.filter(|duration| *duration > 0.0) {
        Some(duration) => event.expires_when(move |ctx, _fired_at| ctx.state_time() >= t + duration),
        None => event,
    }
}

/// One-shot event that requests a transition to `target` at state time `t`.
pub fn change_state_at_time<D: 'static, S>(
    t: f64,
    target: StateId,
    hooks: EventHooks<D, S>,
) -> ScriptedEvent<D, S> {
    at_time(t, None, hooks).changes_state_to(target)
}

/// Event that fires when `key` (or any key, for `None`) is down.
///
/// With a positive `duration` it stays active for `duration` seconds of
/// state time after firing; otherwise it is one-shot.
pub fn on_key_press<D: 'static, S>(
    key: Option<Key>,
    duration: Option<f64>,
    hooks: EventHooks<D, S>,
) -> ScriptedEvent<D, S> {
    let event = ScriptedEvent::new(key_down(key))
        .with_hooks(hooks)
        .with_kind(EventKind::KeyPress);
    match duration.filter(|duration| *duration > 0.0) {
        Some(duration) => {
            event.expires_when(move |ctx, fired_at| ctx.state_time() >= fired_at + duration)
        }
        None => event,
    }
}

/// One-shot event that requests a transition to `target` on a key press.
pub fn change_state_on_key_press<D: 'static, S>(
    key: Option<Key>,
    target: StateId,
    hooks: EventHooks<D, S>,
) -> ScriptedEvent<D, S> {
    on_key_press(key, None, hooks).changes_state_to(target)
}

/// One-shot event that fires when `condition` holds.
pub fn on_condition<D, S, F>(condition: F, hooks: EventHooks<D, S>) -> ScriptedEvent<D, S>
where
    F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
{
    ScriptedEvent::new(condition)
        .with_hooks(hooks)
        .with_kind(EventKind::Condition)
}

/// One-shot event that requests a transition to `target` when `condition`
/// holds, e.g. a victory or defeat check.
pub fn game_condition<D, S, F>(
    condition: F,
    target: StateId,
    hooks: EventHooks<D, S>,
) -> ScriptedEvent<D, S>
where
    F: Fn(&Context<'_, D>) -> bool + Send + Sync + 'static,
{
    on_condition(condition, hooks).changes_state_to(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyState, NoInput};
    use crate::machine::testing::context_for;

    fn at<R>(state_time: f64, f: impl FnOnce(&Context<'_, ()>) -> R) -> R {
        context_for(&mut (), StateId::new(0), state_time, &NoInput, |ctx| f(ctx))
    }

    #[test]
    fn time_trigger_is_inclusive() {
        let trigger = time_reached::<()>(3.0);
        assert!(!at(1.0, &trigger));
        assert!(!at(2.999, &trigger));
        assert!(at(3.0, &trigger));
        assert!(at(3.5, &trigger));
    }

    #[test]
    fn timed_event_expires_relative_to_its_start() {
        let event: ScriptedEvent<(), ()> = at_time(1.0, Some(2.0), EventHooks::new());
        assert!(!event.is_one_shot());
        assert_eq!(event.kind(), EventKind::Time);

        // Firing late does not extend the window.
        assert!(!at(2.9, |ctx| event.is_expired(ctx, 1.5)));
        assert!(at(3.0, |ctx| event.is_expired(ctx, 1.5)));
    }

    #[test]
    fn zero_duration_is_one_shot() {
        let event: ScriptedEvent<(), ()> = at_time(1.0, Some(0.0), EventHooks::new());
        assert!(event.is_one_shot());

        let event: ScriptedEvent<(), ()> = on_key_press(None, Some(-1.0), EventHooks::new());
        assert!(event.is_one_shot());
    }

    #[test]
    fn key_press_expires_relative_to_fire_time() {
        let event: ScriptedEvent<(), ()> =
            on_key_press(Some(Key::SPACE), Some(0.5), EventHooks::new());

        assert!(!at(2.4, |ctx| event.is_expired(ctx, 2.0)));
        assert!(at(2.5, |ctx| event.is_expired(ctx, 2.0)));
    }

    #[test]
    fn key_trigger_reads_input() {
        let mut input = KeyState::new();
        let space = key_down::<()>(Some(Key::SPACE));
        let any = key_down::<()>(None);

        let check = |input: &KeyState| {
            context_for(&mut (), StateId::new(0), 0.0, input, |ctx| {
                (space(ctx), any(ctx))
            })
        };

        assert_eq!(check(&input), (false, false));
        input.press(Key::ENTER);
        assert_eq!(check(&input), (false, true));
        input.press(Key::SPACE);
        assert_eq!(check(&input), (true, true));
    }

    #[test]
    fn change_state_constructors_set_target() {
        let target = StateId::new(2);
        let timed: ScriptedEvent<(), ()> = change_state_at_time(4.0, target, EventHooks::new());
        let on_key: ScriptedEvent<(), ()> =
            change_state_on_key_press(None, target, EventHooks::new());
        let on_win: ScriptedEvent<(), ()> =
            game_condition(|_ctx| false, target, EventHooks::new());

        for event in [&timed, &on_key, &on_win] {
            assert_eq!(event.target(), Some(target));
            assert!(event.is_one_shot());
        }
        assert_eq!(on_win.kind(), EventKind::Condition);
    }

    #[test]
    fn always_on_never_expires() {
        let event: ScriptedEvent<(), ()> = always_on(EventHooks::new());
        assert!(at(0.0, |ctx| event.is_triggered(ctx)));
        assert!(!at(1_000.0, |ctx| event.is_expired(ctx, 0.0)));
    }
}
