//! # Turn Resolution
//!
//! Applies one player [`Input`] to the active level, then lets the monsters
//! act. Every resolution sets the level's [`TurnEvent`] tag and appends one
//! line to the event log.
//!
//! Item inputs carry ids taken from an earlier snapshot. When the item has
//! since moved (another front-end took it first), the input resolves as a
//! wait instead of an error.

use crate::game::{
    player_attacks, update_monsters, update_visibility, Direction, Entity, EntityId, EquipOutcome, Overlay,
    TurnEvent, World,
};
use crate::input::Input;
use crate::BurrowResult;
use log::debug;

impl World {
    /// Plays one full turn: the player's input, then every monster.
    ///
    /// Returns `Ok(false)` when the input passes no turn (`None`, `QuitGame`,
    /// `CloseWindow`); those leave the world untouched. A player death ends
    /// the turn with [`crate::BurrowError::PlayerDied`].
    pub fn play_turn(&mut self, input: &Input) -> BurrowResult<bool> {
        if !self.resolve_input(input)? {
            return Ok(false);
        }
        let floor = self.config.action_point_floor;
        update_monsters(self.current_level_mut(), floor)?;
        Ok(true)
    }

    /// Applies the player's input to the active level without advancing
    /// monsters.
    pub fn resolve_input(&mut self, input: &Input) -> BurrowResult<bool> {
        if !input.passes_turn() {
            return Ok(false);
        }
        debug!("resolving {:?} on '{}'", input.kind(), self.current_level_name());

        match *input {
            Input::Move(direction) => self.move_player(direction)?,
            Input::TakeAll => self.take_all(),
            Input::TakeItem(id) => self.take_item(id)?,
            Input::DropItem(id) => self.drop_item(id)?,
            Input::EquipItem(id) => self.equip_item(id)?,
            Input::Search => self.search(),
            Input::None | Input::QuitGame | Input::CloseWindow(_) => return Ok(false),
        }
        Ok(true)
    }

    /// Attacks, travels, walks, or opens a door, depending on what lies in
    /// `direction`.
    fn move_player(&mut self, direction: Direction) -> BurrowResult<()> {
        let floor = self.config.action_point_floor;
        let level = self.current_level_mut();
        let from = level.player.position();
        let target = from.step(direction);

        if level.monster_at(target).is_some() {
            player_attacks(level, target, floor)?;
            return Ok(());
        }

        if level.is_walkable(target) {
            if let Some(portal) = level.portal_at(target).cloned() {
                if !self.travel(target, &portal)? {
                    let level = self.current_level_mut();
                    level.add_event(format!("Something blocks the way to {}", portal.level));
                    level.last_event = TurnEvent::Wait;
                }
                return Ok(());
            }
            level.player.character.position = target;
            let line = format!("{} moved to {}", level.player.name(), target);
            level.add_event(line);
            level.last_event = TurnEvent::Move;
            update_visibility(level);
            return Ok(());
        }

        match level.tile_mut(target) {
            Some(tile) if tile.overlay == Overlay::ClosedDoor => {
                tile.overlay = Overlay::OpenDoor;
                let line = format!("{} opened a door", level.player.name());
                level.add_event(line);
                level.last_event = TurnEvent::DoorOpen;
                update_visibility(level);
            }
            _ => {
                let line = format!("{} bumps into a wall", level.player.name());
                level.add_event(line);
                level.last_event = TurnEvent::Wait;
            }
        }
        Ok(())
    }

    /// Picks up every ground item on the player's cell.
    fn take_all(&mut self) {
        let level = self.current_level_mut();
        let here = level.player.position();
        let items = level.items.remove(&here).unwrap_or_default();
        if items.is_empty() {
            level.add_event("There is nothing here");
            level.last_event = TurnEvent::Wait;
            return;
        }

        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        let line = format!("{} picked up: {}", level.player.name(), names.join(", "));
        level.player.character.inventory.extend(items);
        level.add_event(line);
        level.last_event = TurnEvent::Pickup;
    }

    fn take_item(&mut self, id: EntityId) -> BurrowResult<()> {
        let level = self.current_level_mut();
        let here = level.player.position();
        if !level.items_at(here).iter().any(|item| item.id == id) {
            self.item_gone(id);
            return Ok(());
        }
        let item = level.take_ground_item(here, id)?;
        let line = format!("{} picked up {}", level.player.name(), item.name);
        level.player.character.inventory.push(item);
        level.add_event(line);
        level.last_event = TurnEvent::Pickup;
        Ok(())
    }

    fn drop_item(&mut self, id: EntityId) -> BurrowResult<()> {
        let level = self.current_level_mut();
        if !level.player.character.has_item(id) {
            self.item_gone(id);
            return Ok(());
        }
        let item = level.player.character.remove_from_inventory(id)?;
        let line = format!("{} dropped {}", level.player.name(), item.name);
        let here = level.player.position();
        level.place_item(here, item);
        level.add_event(line);
        level.last_event = TurnEvent::Drop;
        Ok(())
    }

    fn equip_item(&mut self, id: EntityId) -> BurrowResult<()> {
        let level = self.current_level_mut();
        let Some(item_name) = level
            .player
            .character
            .inventory
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.name.clone())
        else {
            self.item_gone(id);
            return Ok(());
        };

        let line = match level.player.character.equip(id)? {
            EquipOutcome::Equipped { replaced: None } => {
                level.last_event = TurnEvent::Equip;
                format!("{} equipped {}", level.player.name(), item_name)
            }
            EquipOutcome::Equipped {
                replaced: Some(old),
            } => {
                level.last_event = TurnEvent::Equip;
                format!("{} equipped {}, putting away {}", level.player.name(), item_name, old)
            }
            EquipOutcome::NotEquippable => {
                level.last_event = TurnEvent::Wait;
                format!("{} cannot be equipped", item_name)
            }
        };
        level.add_event(line);
        Ok(())
    }

    /// Resolves an input naming an item that is no longer where the sender
    /// saw it.
    fn item_gone(&mut self, id: EntityId) {
        let level = self.current_level_mut();
        debug!("item {} is gone, {} waits", id, level.player.name());
        let line = format!("{} reaches for something that is no longer there", level.player.name());
        level.add_event(line);
        level.last_event = TurnEvent::Wait;
    }

    /// Waits a turn, looking around.
    fn search(&mut self) {
        let level = self.current_level_mut();
        update_visibility(level);
        let line = format!("{} searched the area", level.player.name());
        level.add_event(line);
        level.last_event = TurnEvent::Wait;
    }
}
