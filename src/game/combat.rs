//! # Combat
//!
//! Melee exchanges between the player and monsters.
//!
//! An attacker hits with `strength x weapon multiplier` (1.0 unarmed),
//! reduced by the defender's helmet fraction (0.0 bare-headed). A defender
//! that survives the blow counters at once for its raw strength and spends
//! an action point doing so. A defender killed by the blow does not counter.

use crate::game::{Character, Entity, Level, Position, TurnEvent};
use crate::{BurrowError, BurrowResult};
use log::debug;

/// What a single exchange did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    /// Hitpoints the defender lost
    pub damage: i32,
    /// Hitpoints the attacker lost to the counter, if the defender survived
    pub counter_damage: Option<i32>,
    pub defender_killed: bool,
    pub attacker_killed: bool,
}

/// Damage `attacker` deals to `defender` in one blow.
///
/// Both stages truncate towards zero: first the armed power, then the
/// helmet reduction.
///
/// # Examples
///
/// ```
/// use burrow::{attack_damage, Character, Item, Position};
///
/// let mut attacker = Character::new("A", 'a', Position::origin(), 10, 20, 1.0, 5);
/// attacker.weapon = Some(Item::sword(Position::origin()));
/// let mut defender = Character::new("D", 'd', Position::origin(), 10, 1, 1.0, 5);
/// defender.helmet = Some(Item::helmet(Position::origin()));
///
/// assert_eq!(attack_damage(&attacker, &defender), 36);
/// ```
pub fn attack_damage(attacker: &Character, defender: &Character) -> i32 {
    let power = (attacker.strength as f64 * attacker.weapon_multiplier()).floor();
    (power * (1.0 - defender.damage_reduction())).floor() as i32
}

/// Runs one exchange, mutating both characters.
pub fn exchange_blows(attacker: &mut Character, defender: &mut Character, action_point_floor: f64) -> AttackReport {
    let damage = attack_damage(attacker, defender);
    defender.hitpoints -= damage;

    let counter_damage = if defender.is_alive() {
        defender.spend_action_points(1.0, action_point_floor);
        attacker.hitpoints -= defender.strength;
        Some(defender.strength)
    } else {
        None
    };

    AttackReport {
        damage,
        counter_damage,
        defender_killed: !defender.is_alive(),
        attacker_killed: !attacker.is_alive(),
    }
}

/// Formats the log line for an exchange.
fn describe(attacker: &str, defender: &str, report: &AttackReport) -> String {
    match report.counter_damage {
        None => format!("{} killed {}", attacker, defender),
        Some(_) if report.attacker_killed => format!(
            "{} attacked {} for {} and was killed by the counter",
            attacker, defender, report.damage
        ),
        Some(counter) => format!(
            "{} attacked {} for {}, {} hit back for {}",
            attacker, defender, report.damage, defender, counter
        ),
    }
}

/// The player attacks the monster standing at `target`.
///
/// Returns [`BurrowError::PlayerDied`] if the counter kills the player.
pub fn player_attacks(level: &mut Level, target: Position, action_point_floor: f64) -> BurrowResult<AttackReport> {
    let monster = level.monsters.get_mut(&target).ok_or_else(|| {
        BurrowError::InvariantViolation(format!("no monster to attack at {}", target))
    })?;
    let report = exchange_blows(&mut level.player.character, &mut monster.character, action_point_floor);
    let line = describe(level.player.name(), monster.name(), &report);
    let monster_name = monster.name().to_string();
    debug!("{}", line);

    level.add_event(line);
    level.last_event = TurnEvent::Attack;
    if report.defender_killed {
        kill_monster(level, target)?;
    }
    if report.attacker_killed {
        return Err(BurrowError::PlayerDied {
            killer: monster_name,
        });
    }
    Ok(report)
}

/// The monster standing at `attacker` attacks the player.
///
/// Returns [`BurrowError::PlayerDied`] if the blow kills the player.
pub fn monster_attacks(level: &mut Level, attacker: Position, action_point_floor: f64) -> BurrowResult<AttackReport> {
    let monster = level.monsters.get_mut(&attacker).ok_or_else(|| {
        BurrowError::InvariantViolation(format!("no monster attacking from {}", attacker))
    })?;
    let report = exchange_blows(&mut monster.character, &mut level.player.character, action_point_floor);
    let line = describe(monster.name(), level.player.name(), &report);
    let monster_name = monster.name().to_string();
    debug!("{}", line);

    level.add_event(line);
    level.last_event = TurnEvent::Hit;
    if report.attacker_killed {
        kill_monster(level, attacker)?;
    }
    if report.defender_killed {
        return Err(BurrowError::PlayerDied {
            killer: monster_name,
        });
    }
    Ok(report)
}

/// Removes a dead monster and spills everything it carried onto its cell.
pub fn kill_monster(level: &mut Level, position: Position) -> BurrowResult<()> {
    let mut monster = level.monsters.remove(&position).ok_or_else(|| {
        BurrowError::InvariantViolation(format!("no monster to remove at {}", position))
    })?;
    for item in monster.character.drain_items() {
        level.place_item(position, item);
    }
    Ok(())
}
