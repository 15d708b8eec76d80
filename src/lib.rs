//! Ludum: state machines and scripted events for small real-time games
//!
//! A game is a set of named states, exactly one of which is current. Each
//! state reacts to the frame loop through lifecycle hooks and owns a list of
//! scripted events (timed banners, key presses, win conditions) that are
//! re-armed every time the state is entered.
//!
//! # Core Concepts
//!
//! - **State machine**: states with `init`/`enter`/`update`/`leave` hooks,
//!   explicit or declared transitions, at most one transition per update
//! - **Scripted events**: pending → active → removed, driven by trigger and
//!   expiry predicates measured in state time
//! - **Game**: a machine, its events, a pause-aware clock and the engine
//!   configuration, stepped by the host once per frame
//!
//! # Example
//!
//! ```rust
//! use ludum::core::StateHooks;
//! use ludum::events::EventHooks;
//! use ludum::game::Game;
//! use ludum::input::NoInput;
//!
//! #[derive(Clone, Default)]
//! struct Level {
//!     banner_shown: bool,
//! }
//!
//! let mut game: Game<Level> = Game::new("Platformer", Level::default());
//! let intro = game.add_state("INTRO", StateHooks::new()).unwrap();
//! let playing = game.add_state("PLAYING", StateHooks::new()).unwrap();
//!
//! game.add_time_event(
//!     intro,
//!     0.2,
//!     None,
//!     EventHooks::<Level, ()>::new().on_enter(|ctx| {
//!         ctx.data_mut().banner_shown = true;
//!         Ok(())
//!     }),
//! )
//! .unwrap();
//! game.add_change_state_at_time_event(intro, 0.5, playing, EventHooks::new())
//!     .unwrap();
//!
//! game.start(&mut NoInput).unwrap();
//! for _ in 0..6 {
//!     game.update(0.1, &mut NoInput).unwrap();
//! }
//!
//! assert!(game.data().banner_shown);
//! assert_eq!(game.current_state(), Some(playing));
//! ```

pub mod builder;
pub mod core;
pub mod events;
pub mod game;
pub mod input;
pub mod machine;
pub mod time;

// Re-export commonly used types
pub use builder::MachineBuilder;
pub use crate::core::{HookResult, MachineError, StateHooks, StateId, StateTransition};
pub use events::{EventHooks, EventScheduler, ScriptedEvent};
pub use game::{EngineConfig, Game};
pub use input::{Input, Key, KeyState, NoInput};
pub use machine::{Context, StateMachine};
