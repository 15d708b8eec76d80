//! The game layer: a state machine, its scripted events, a pause-aware
//! clock and the engine configuration, driven by the host's frame loop.

mod config;
#[allow(clippy::module_inception)]
mod game;

pub use config::EngineConfig;
pub use game::Game;
