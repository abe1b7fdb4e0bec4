//! # World State
//!
//! The set of named levels, which one is active, and travel between them.
//!
//! Each level owns a player. Only the active level's player is live; the
//! others are dormant placeholders. Travelling through a portal swaps the
//! live player into the destination level, so the player's stats, inventory
//! and equipment are owned by exactly one level at any time.

use crate::game::{update_visibility, EngineConfig, Entity, Level, PortalTarget, Position, TurnEvent};
use crate::{BurrowError, BurrowResult};
use log::info;
use serde::{Deserialize, Serialize};

/// All loaded levels and the active one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    levels: Vec<Level>,
    current: usize,
    /// Settings the rules read every turn
    pub config: EngineConfig,
}

impl World {
    /// Builds a world starting on the level named `start`.
    ///
    /// Line of sight is computed for the starting level.
    pub fn new(levels: Vec<Level>, start: &str, config: EngineConfig) -> BurrowResult<Self> {
        let current = levels
            .iter()
            .position(|level| level.name == start)
            .ok_or_else(|| BurrowError::UnknownLevel(start.to_string()))?;
        let mut world = Self {
            levels,
            current,
            config,
        };
        update_visibility(world.current_level_mut());
        Ok(world)
    }

    /// The active level.
    pub fn current_level(&self) -> &Level {
        &self.levels[self.current]
    }

    /// The active level, mutably.
    pub fn current_level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.current]
    }

    /// Name of the active level.
    pub fn current_level_name(&self) -> &str {
        &self.current_level().name
    }

    /// Looks up a level by name.
    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.name == name)
    }

    /// All levels in load order.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Moves the live player from `from` on the active level through a portal.
    ///
    /// Returns `Ok(false)` and leaves everything untouched when a monster
    /// stands on the destination cell.
    pub fn travel(&mut self, from: Position, target: &PortalTarget) -> BurrowResult<bool> {
        let destination = self
            .levels
            .iter()
            .position(|level| level.name == target.level)
            .ok_or_else(|| BurrowError::UnknownLevel(target.level.clone()))?;

        if !self.levels[destination].is_walkable(target.position) {
            return Ok(false);
        }

        let source = self.current;
        if source != destination {
            swap_players(&mut self.levels, source, destination);
            // The dormant player left behind waits on the portal cell.
            self.levels[source].player.character.position = from;
        }
        self.current = destination;

        let level = self.current_level_mut();
        level.player.character.position = target.position;
        update_visibility(level);
        let line = format!("{} travelled to {}", level.player.name(), level.name);
        info!("{}", line);
        level.add_event(line);
        level.last_event = TurnEvent::Portal;
        Ok(true)
    }

    /// Saves the world to JSON.
    pub fn save_to_json(&self) -> BurrowResult<String> {
        serde_json::to_string_pretty(self).map_err(BurrowError::from)
    }

    /// Loads a world from JSON.
    ///
    /// The restored world is checked as thoroughly as a freshly loaded one:
    /// every level's invariants hold and every portal leads to a known level.
    pub fn load_from_json(json: &str) -> BurrowResult<Self> {
        let world: World = serde_json::from_str(json)?;
        if world.current >= world.levels.len() {
            return Err(BurrowError::InvariantViolation(format!(
                "active level index {} out of {} levels",
                world.current,
                world.levels.len()
            )));
        }
        world.config.validate()?;
        for level in &world.levels {
            level.check_invariants()?;
            for target in level.portals.values() {
                if world.level(&target.level).is_none() {
                    return Err(BurrowError::UnknownLevel(target.level.clone()));
                }
            }
        }
        Ok(world)
    }
}

fn swap_players(levels: &mut [Level], a: usize, b: usize) {
    let (low, high) = (a.min(b), a.max(b));
    let (left, right) = levels.split_at_mut(high);
    std::mem::swap(&mut left[low].player, &mut right[0].player);
}
