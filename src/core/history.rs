//! State transition history tracking.
//!
//! Every transition a machine performs is recorded as a [`StateTransition`].
//! The history keeps the most recent transitions up to a fixed capacity so a
//! long-running game does not grow it without bound.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of transitions kept by a machine.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use ludum::core::{StateId, StateTransition};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: StateId::new(0),
///     to: StateId::new(1),
///     state_time: 2.5,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, StateId::new(1));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
    /// Seconds spent in `from` before leaving it
    pub state_time: f64,
    /// Wall-clock time of the transition
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of state transitions.
///
/// # Example
///
/// ```rust
/// use ludum::core::{StateHistory, StateId, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_capacity(8);
/// history.record(StateTransition {
///     from: StateId::new(0),
///     to: StateId::new(1),
///     state_time: 1.0,
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: StateId::new(1),
///     to: StateId::new(2),
///     state_time: 0.5,
///     timestamp: Utc::now(),
/// });
///
/// let path = history.path();
/// assert_eq!(path, vec![StateId::new(0), StateId::new(1), StateId::new(2)]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    capacity: usize,
    transitions: VecDeque<StateTransition>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHistory {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history keeping at most `capacity` transitions.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
        }
    }

    /// Record a transition, dropping the oldest one when full.
    pub fn record(&mut self, transition: StateTransition) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed, oldest first: the `from` of the oldest kept
    /// transition, then the `to` of every transition.
    pub fn path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Most recent transition.
    pub fn last(&self) -> Option<&StateTransition> {
        self.transitions.back()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
