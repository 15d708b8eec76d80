//! Game time that excludes paused periods.
//!
//! The clock never stops its wall-clock source. Pausing records when the pause
//! began and unpausing adds the pause length to an accumulated offset, so game
//! time resumes exactly where it stopped instead of jumping forward.

use chrono::Utc;
use tracing::debug;

/// Source of wall-clock time, in seconds.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Reads the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Wall-clock source moved by hand, for tests and fixed-step drivers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualTimeSource {
    now: f64,
}

impl ManualTimeSource {
    pub fn new(now: f64) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: f64) {
        self.now = now;
    }

    pub fn advance(&mut self, dt: f64) {
        self.now += dt;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        self.now
    }
}

/// Pause-aware game clock.
///
/// # Example
///
/// ```rust
/// use ludum::time::GameClock;
///
/// let mut clock = GameClock::starting_at(100.0);
/// assert_eq!(clock.tick(101.0), 1.0);
///
/// clock.pause();
/// assert_eq!(clock.tick(105.0), 0.0);
/// clock.unpause();
///
/// assert_eq!(clock.tick(105.5), 0.5);
/// assert_eq!(clock.now(), 101.5);
/// ```
#[derive(Clone, Debug)]
pub struct GameClock {
    wall: f64,
    game: f64,
    paused_total: f64,
    paused_at: Option<f64>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::starting_at(0.0)
    }
}

impl GameClock {
    /// Clock whose game time starts equal to the given wall time.
    pub fn starting_at(wall: f64) -> Self {
        Self {
            wall,
            game: wall,
            paused_total: 0.0,
            paused_at: None,
        }
    }

    /// Clock starting at the current reading of `source`.
    pub fn from_source(source: &impl TimeSource) -> Self {
        Self::starting_at(source.now())
    }

    /// Record a new wall-clock reading and return how much game time passed.
    ///
    /// Game time does not advance while paused, and never runs backwards if
    /// the wall clock does.
    pub fn tick(&mut self, wall_now: f64) -> f64 {
        self.wall = wall_now;
        if self.paused_at.is_some() {
            return 0.0;
        }
        let previous = self.game;
        self.game = (self.wall - self.paused_total).max(previous);
        self.game - previous
    }

    /// Move the wall clock forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.tick(self.wall + dt.max(0.0))
    }

    /// Current game time in seconds.
    pub fn now(&self) -> f64 {
        self.game
    }

    /// Most recent wall-clock reading.
    pub fn wall_time(&self) -> f64 {
        self.wall
    }

    /// Total wall-clock time spent paused, not counting a pause in progress.
    pub fn paused_time(&self) -> f64 {
        self.paused_total
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Stop game time from advancing. Has no effect when already paused.
    pub fn pause(&mut self) {
        if self.paused_at.is_some() {
            return;
        }
        debug!(wall = self.wall, game = self.game, "clock paused");
        self.paused_at = Some(self.wall);
    }

    /// Resume game time. Has no effect when not paused.
    pub fn unpause(&mut self) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };
        let pause_length = self.wall - paused_at;
        self.paused_total += pause_length;
        debug!(pause_length, "clock unpaused");
    }
}
