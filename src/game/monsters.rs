//! # Monster Controller
//!
//! Per-turn monster decisions. Each monster banks its speed in action points
//! every turn and spends one point per whole step: it walks the A* path
//! towards the player, or attacks when the next step would land on the
//! player. A monster with no path passes, draining one turn's worth of
//! points.

use crate::game::{monster_attacks, Entity, EntityId, Level, Position};
use crate::utils::find_path;
use crate::{BurrowError, BurrowResult};
use log::trace;

/// Updates every monster on the level once.
///
/// Monsters act in row-major order of where they stood when the phase
/// began. A monster killed earlier in the phase is skipped.
pub fn update_monsters(level: &mut Level, action_point_floor: f64) -> BurrowResult<()> {
    let mut order: Vec<(Position, EntityId)> = level
        .monsters
        .iter()
        .map(|(position, monster)| (*position, monster.id))
        .collect();
    order.sort_by_key(|(position, _)| (position.y, position.x));

    for (position, id) in order {
        if level.monster_at(position).map(|monster| monster.id) != Some(id) {
            continue;
        }
        update_monster(level, position, action_point_floor)?;
    }
    Ok(())
}

/// Runs one monster's turn.
pub fn update_monster(level: &mut Level, mut position: Position, action_point_floor: f64) -> BurrowResult<()> {
    let monster = level.monsters.get_mut(&position).ok_or_else(|| {
        BurrowError::InvariantViolation(format!("no monster to update at {}", position))
    })?;
    monster.character.gain_action_points();
    let steps = monster.character.action_points.floor().max(0.0) as u32;

    let mut path = find_path(level, position, level.player.position());
    if path.is_empty() {
        pass(level, position, action_point_floor);
        return Ok(());
    }

    for step in 0..steps {
        if step > 0 {
            path = find_path(level, position, level.player.position());
        }
        let Some(&next) = path.get(1) else {
            break;
        };

        if next == level.player.position() {
            monster_attacks(level, position, action_point_floor)?;
        } else {
            move_monster(level, position, next)?;
            position = next;
        }

        // Gone if the player's counter killed it.
        let Some(monster) = level.monsters.get_mut(&position) else {
            break;
        };
        monster.character.spend_action_points(1.0, action_point_floor);
    }
    Ok(())
}

/// Skips the turn, draining one turn's worth of action points.
fn pass(level: &mut Level, position: Position, action_point_floor: f64) {
    if let Some(monster) = level.monsters.get_mut(&position) {
        let speed = monster.character.speed;
        monster.character.spend_action_points(speed, action_point_floor);
        trace!("{} at {} has no path and passes", monster.name(), position);
    }
}

/// Moves a monster one cell, re-keying it in the monster map.
fn move_monster(level: &mut Level, from: Position, to: Position) -> BurrowResult<()> {
    if !level.is_walkable(to) || to == level.player.position() {
        return Err(BurrowError::InvariantViolation(format!(
            "monster at {} cannot step onto {}",
            from, to
        )));
    }
    let mut monster = level.monsters.remove(&from).ok_or_else(|| {
        BurrowError::InvariantViolation(format!("no monster to move at {}", from))
    })?;
    monster.character.position = to;
    level.monsters.insert(to, monster);
    Ok(())
}
