//! # Level Representation
//!
//! Tiles, levels and the per-level maps of monsters, ground items and portals.

use crate::game::{Entity, EventLog, Item, Monster, Player, Position, TurnEvent};
use crate::{BurrowError, BurrowResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base terrain of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Terrain {
    /// Nothing at all; outside the playable area
    #[default]
    Blank,
    StoneWall,
    DirtFloor,
    /// Placeholder under doors, stairs and spawns, resolved while loading
    Pending,
}

/// Feature drawn on top of the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Overlay {
    #[default]
    None,
    ClosedDoor,
    OpenDoor,
    UpStair,
    DownStair,
}

/// A single grid cell.
///
/// `visible` is true only for the current turn's line of sight; `seen`
/// latches once the cell has been visible and never resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    pub overlay: Overlay,
    pub visible: bool,
    pub seen: bool,
}

impl Tile {
    /// Creates an unseen tile.
    pub fn new(terrain: Terrain, overlay: Overlay) -> Self {
        Self {
            terrain,
            overlay,
            visible: false,
            seen: false,
        }
    }

    /// Plain floor tile.
    pub fn floor() -> Self {
        Self::new(Terrain::DirtFloor, Overlay::None)
    }

    /// Plain wall tile.
    pub fn wall() -> Self {
        Self::new(Terrain::StoneWall, Overlay::None)
    }

    /// Whether a character could stand here, ignoring occupants.
    pub fn is_passable(&self) -> bool {
        !matches!(self.terrain, Terrain::StoneWall | Terrain::Blank)
            && self.overlay != Overlay::ClosedDoor
    }

    /// Whether light passes through the tile.
    pub fn is_transparent(&self) -> bool {
        self.is_passable()
    }

    /// Marks the tile as in view this turn.
    pub fn reveal(&mut self) {
        self.visible = true;
        self.seen = true;
    }
}

/// Destination of a portal: a named level and a cell on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalTarget {
    pub level: String,
    pub position: Position,
}

/// One dungeon level: the tile grid and everything standing on it.
///
/// Cloning a level yields an independent snapshot; the session worker hands
/// such snapshots to front-ends after every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Resource name this level was loaded from
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Rows of tiles, `tiles[y][x]`
    pub tiles: Vec<Vec<Tile>>,
    pub player: Player,
    /// Live monsters keyed by their own position
    #[serde(with = "position_map")]
    pub monsters: HashMap<Position, Monster>,
    /// Ground items in drop order
    #[serde(with = "position_map")]
    pub items: HashMap<Position, Vec<Item>>,
    #[serde(with = "position_map")]
    pub portals: HashMap<Position, PortalTarget>,
    pub events: EventLog,
    pub last_event: TurnEvent,
}

impl Level {
    /// Creates a level of blank tiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Level, Player, PlayerTemplate, Position, Terrain};
    ///
    /// let player = Player::from_template(&PlayerTemplate::default(), Position::new(1, 1));
    /// let level = Level::new("test", 4, 3, player, 10);
    /// assert_eq!(level.tile(Position::new(3, 2)).unwrap().terrain, Terrain::Blank);
    /// assert!(level.tile(Position::new(4, 0)).is_none());
    /// ```
    pub fn new(name: impl Into<String>, width: u32, height: u32, player: Player, event_capacity: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles: vec![vec![Tile::default(); width as usize]; height as usize],
            player,
            monsters: HashMap::new(),
            items: HashMap::new(),
            portals: HashMap::new(),
            events: EventLog::new(event_capacity),
            last_event: TurnEvent::Wait,
        }
    }

    /// Checks if a position lies on the grid.
    pub fn in_range(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    /// Gets the tile at a position.
    pub fn tile(&self, position: Position) -> Option<&Tile> {
        if !self.in_range(position) {
            return None;
        }
        self.tiles
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
    }

    /// Gets the tile at a position mutably.
    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        if !self.in_range(position) {
            return None;
        }
        self.tiles
            .get_mut(position.y as usize)
            .and_then(|row| row.get_mut(position.x as usize))
    }

    /// Replaces the tile at a position.
    pub fn set_tile(&mut self, position: Position, tile: Tile) -> BurrowResult<()> {
        let slot = self.tile_mut(position).ok_or_else(|| {
            BurrowError::InvariantViolation(format!("position {} is off the grid", position))
        })?;
        *slot = tile;
        Ok(())
    }

    /// A character may step here: on the grid, passable, and no monster present.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_passable) && !self.monsters.contains_key(&position)
    }

    /// Light passes through this cell. Off-grid cells are opaque.
    pub fn is_transparent(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_transparent)
    }

    /// Walkable cardinal neighbours in right, left, up, down order.
    pub fn walkable_neighbors(&self, position: Position) -> Vec<Position> {
        position
            .cardinal_adjacent_positions()
            .into_iter()
            .filter(|&next| self.is_walkable(next))
            .collect()
    }

    /// Monster standing at a position.
    pub fn monster_at(&self, position: Position) -> Option<&Monster> {
        self.monsters.get(&position)
    }

    /// Ground items at a position, oldest drop first.
    pub fn items_at(&self, position: Position) -> &[Item] {
        self.items.get(&position).map_or(&[], Vec::as_slice)
    }

    /// Puts an item on the ground, after anything already there.
    pub fn place_item(&mut self, position: Position, mut item: Item) {
        item.position = position;
        self.items.entry(position).or_default().push(item);
    }

    /// Removes one ground item by id.
    pub fn take_ground_item(&mut self, position: Position, item_id: crate::EntityId) -> BurrowResult<Item> {
        let pile = self.items.get_mut(&position).ok_or_else(|| {
            BurrowError::InvariantViolation(format!("no items lie at {}", position))
        })?;
        let index = pile.iter().position(|item| item.id == item_id).ok_or_else(|| {
            BurrowError::InvariantViolation(format!("item {} does not lie at {}", item_id, position))
        })?;
        let item = pile.remove(index);
        if pile.is_empty() {
            self.items.remove(&position);
        }
        Ok(item)
    }

    /// Portal leaving from a position.
    pub fn portal_at(&self, position: Position) -> Option<&PortalTarget> {
        self.portals.get(&position)
    }

    /// Appends a line to the event log.
    pub fn add_event(&mut self, line: impl Into<String>) {
        self.events.push(line);
    }

    /// Clears the current-turn visibility of every tile, keeping `seen`.
    pub fn clear_visibility(&mut self) {
        for row in &mut self.tiles {
            for tile in row {
                tile.visible = false;
            }
        }
    }

    /// Iterates every tile with its position.
    pub fn positions(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, tile)| (Position::new(x as i32, y as i32), tile))
        })
    }

    /// Serializes this level for an out-of-process front-end.
    pub fn to_json(&self) -> BurrowResult<String> {
        serde_json::to_string(self).map_err(BurrowError::from)
    }

    /// Verifies the structural invariants of the level.
    ///
    /// - every row has `width` tiles and there are `height` rows
    /// - the player stands on a passable in-range cell with no monster
    /// - every monster is keyed by its own position
    /// - every visible tile is also seen
    /// - the event log has a usable write cursor
    pub fn check_invariants(&self) -> BurrowResult<()> {
        if self.tiles.len() != self.height as usize
            || self.tiles.iter().any(|row| row.len() != self.width as usize)
        {
            return Err(BurrowError::InvariantViolation(format!(
                "level '{}' grid is not {}x{}",
                self.name, self.width, self.height
            )));
        }
        let player_position = self.player.position();
        if !self.tile(player_position).is_some_and(Tile::is_passable)
            || self.monsters.contains_key(&player_position)
        {
            return Err(BurrowError::InvariantViolation(format!(
                "player stands on unwalkable cell {} in '{}'",
                player_position, self.name
            )));
        }
        if let Some((key, monster)) = self
            .monsters
            .iter()
            .find(|(key, monster)| **key != monster.position())
        {
            return Err(BurrowError::InvariantViolation(format!(
                "{} is keyed at {} but stands at {}",
                monster.name(),
                key,
                monster.position()
            )));
        }
        if let Some((position, _)) = self.positions().find(|(_, tile)| tile.visible && !tile.seen) {
            return Err(BurrowError::InvariantViolation(format!(
                "tile {} is visible but not seen",
                position
            )));
        }
        self.events.validate()
    }
}

/// Serializes position-keyed maps as lists of pairs, since JSON object keys
/// must be strings.
mod position_map {
    use crate::game::Position;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S, V>(map: &HashMap<Position, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<HashMap<Position, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let entries: Vec<(Position, V)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
