//! # Engine Settings
//!
//! Tunable values for levels, the player template and the session protocol.

use crate::{config, BurrowError, BurrowResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stats the player starts with on every loaded level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTemplate {
    /// Display name used in event log lines
    pub name: String,
    /// Glyph drawn for the player
    pub glyph: char,
    /// Starting hitpoints
    pub hitpoints: i32,
    /// Raw attack strength
    pub strength: i32,
    /// Action points gained per turn
    pub speed: f64,
    /// Line of sight radius in tiles
    pub sight_range: i32,
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            glyph: '@',
            hitpoints: config::DEFAULT_PLAYER_HITPOINTS,
            strength: config::DEFAULT_PLAYER_STRENGTH,
            speed: config::DEFAULT_PLAYER_SPEED,
            sight_range: config::DEFAULT_PLAYER_SIGHT_RANGE,
        }
    }
}

/// Configuration for the engine.
///
/// # Examples
///
/// ```
/// use burrow::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.event_log_capacity, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lines kept in each level's circular event log
    pub event_log_capacity: usize,
    /// Stats for the player character
    pub player: PlayerTemplate,
    /// Lowest value an action point budget may fall to
    pub action_point_floor: f64,
    /// Inputs buffered by the worker before senders wait
    pub input_queue_capacity: usize,
    /// Snapshots buffered per subscriber before the worker waits
    pub snapshot_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_log_capacity: config::DEFAULT_EVENT_LOG_CAPACITY,
            player: PlayerTemplate::default(),
            action_point_floor: config::DEFAULT_ACTION_POINT_FLOOR,
            input_queue_capacity: config::DEFAULT_INPUT_QUEUE_CAPACITY,
            snapshot_queue_capacity: config::DEFAULT_SNAPSHOT_QUEUE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration for tests: a sturdier player and a log large
    /// enough that no line wraps during a short scenario.
    pub fn for_testing() -> Self {
        Self {
            event_log_capacity: 32,
            player: PlayerTemplate {
                name: "Tester".to_string(),
                hitpoints: 100,
                ..PlayerTemplate::default()
            },
            ..Self::default()
        }
    }

    /// Reads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> BurrowResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> BurrowResult<()> {
        if self.event_log_capacity == 0 {
            return Err(BurrowError::InvalidConfig(
                "event_log_capacity must be at least 1".to_string(),
            ));
        }
        if self.input_queue_capacity == 0 || self.snapshot_queue_capacity == 0 {
            return Err(BurrowError::InvalidConfig(
                "queue capacities must be at least 1".to_string(),
            ));
        }
        if self.player.hitpoints <= 0 {
            return Err(BurrowError::InvalidConfig(
                "player hitpoints must be positive".to_string(),
            ));
        }
        if self.player.sight_range < 0 || !(self.player.speed >= 0.0) {
            return Err(BurrowError::InvalidConfig(
                "player sight range and speed must not be negative".to_string(),
            ));
        }
        if !self.action_point_floor.is_finite() {
            return Err(BurrowError::InvalidConfig(
                "action_point_floor must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
