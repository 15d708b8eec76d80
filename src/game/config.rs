//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Knobs for a [`Game`](super::Game).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use ludum::game::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{ "log_transitions": true }"#).unwrap();
/// assert!(config.log_transitions);
/// assert!(config.clear_input_on_transition);
/// assert_eq!(config.max_frame_delta, None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log state transitions at `info` level instead of `debug`.
    pub log_transitions: bool,
    /// Forget held keys and buttons whenever the game changes state.
    pub clear_input_on_transition: bool,
    /// Upper bound on a single tick's delta, in seconds. `None` (the default)
    /// passes host deltas through unchanged.
    pub max_frame_delta: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_transitions: false,
            clear_input_on_transition: true,
            max_frame_delta: None,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp a raw frame delta to `[0, max_frame_delta]`.
    pub fn clamp_delta(&self, dt: f64) -> f64 {
        let dt = dt.max(0.0);
        match self.max_frame_delta {
            Some(max) => dt.min(max),
            None => dt,
        }
    }
}
