//! # Entities
//!
//! Characters (the player and monsters) and the items they carry.
//!
//! The player and monsters share one [`Character`] core holding position,
//! stats, inventory and equipment. [`Player`] and [`Monster`] wrap that core,
//! and rules that apply to both (combat, item handling) are written against
//! `Character` directly.

use crate::game::{new_entity_id, EntityId, PlayerTemplate, Position};
use crate::{BurrowError, BurrowResult};
use serde::{Deserialize, Serialize};

/// Identity shared by everything that sits on the grid.
pub trait Entity {
    /// Current grid position.
    fn position(&self) -> Position;

    /// Display name used in event lines.
    fn name(&self) -> &str;

    /// Glyph a front-end may draw.
    fn glyph(&self) -> char;
}

/// Category of an item, deciding which equipment slot it fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Multiplies the wielder's strength
    Weapon,
    /// Reduces incoming damage by a fraction
    Helmet,
    /// Carried but never equipped
    Other,
}

/// A carried or dropped object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub position: Position,
    pub kind: ItemKind,
    /// Damage multiplier for weapons, damage-reduction fraction for helmets
    pub power: f64,
}

impl Item {
    /// Creates a new item with a fresh id.
    pub fn new(name: impl Into<String>, glyph: char, position: Position, kind: ItemKind, power: f64) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            glyph,
            position,
            kind,
            power,
        }
    }

    /// A sword doubling the wielder's strength.
    pub fn sword(position: Position) -> Self {
        Self::new("Sword", 's', position, ItemKind::Weapon, 2.0)
    }

    /// A helmet absorbing a tenth of incoming damage.
    pub fn helmet(position: Position) -> Self {
        Self::new("Helmet", 'h', position, ItemKind::Helmet, 0.1)
    }

    /// Builds the item a level code spawns, if the code names one.
    pub fn from_code(code: char, position: Position) -> Option<Self> {
        match code {
            's' => Some(Self::sword(position)),
            'h' => Some(Self::helmet(position)),
            _ => None,
        }
    }
}

impl Entity for Item {
    fn position(&self) -> Position {
        self.position
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn glyph(&self) -> char {
        self.glyph
    }
}

/// Result of an equip request.
#[derive(Debug, Clone, PartialEq)]
pub enum EquipOutcome {
    /// The item is now worn; any previously worn item went back to the inventory
    Equipped { replaced: Option<String> },
    /// The item has no slot and stays in the inventory
    NotEquippable,
}

/// Stats, inventory and equipment shared by the player and monsters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub glyph: char,
    pub position: Position,
    pub hitpoints: i32,
    pub strength: i32,
    /// Action points gained per turn
    pub speed: f64,
    /// Unspent action points carried between turns
    pub action_points: f64,
    pub sight_range: i32,
    pub inventory: Vec<Item>,
    pub helmet: Option<Item>,
    pub weapon: Option<Item>,
}

impl Character {
    /// Creates a character with an empty inventory and no equipment.
    pub fn new(
        name: impl Into<String>,
        glyph: char,
        position: Position,
        hitpoints: i32,
        strength: i32,
        speed: f64,
        sight_range: i32,
    ) -> Self {
        Self {
            name: name.into(),
            glyph,
            position,
            hitpoints,
            strength,
            speed,
            action_points: 0.0,
            sight_range,
            inventory: Vec::new(),
            helmet: None,
            weapon: None,
        }
    }

    /// Whether the character still has hitpoints left.
    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0
    }

    /// Weapon damage multiplier, 1.0 when unarmed.
    pub fn weapon_multiplier(&self) -> f64 {
        self.weapon.as_ref().map_or(1.0, |weapon| weapon.power)
    }

    /// Fraction of incoming damage absorbed, 0.0 without a helmet.
    pub fn damage_reduction(&self) -> f64 {
        self.helmet.as_ref().map_or(0.0, |helmet| helmet.power)
    }

    /// Adds this turn's action points.
    pub fn gain_action_points(&mut self) {
        self.action_points += self.speed;
    }

    /// Spends action points without going below `floor`.
    pub fn spend_action_points(&mut self, amount: f64, floor: f64) {
        self.action_points = (self.action_points - amount).max(floor);
    }

    /// Whether the inventory holds an item with this id.
    pub fn has_item(&self, item_id: EntityId) -> bool {
        self.inventory.iter().any(|item| item.id == item_id)
    }

    /// Finds an item anywhere on the character: inventory or equipment.
    pub fn find_item(&self, item_id: EntityId) -> Option<&Item> {
        self.inventory
            .iter()
            .chain(self.weapon.iter())
            .chain(self.helmet.iter())
            .find(|item| item.id == item_id)
    }

    /// Removes an item from the inventory, keeping the order of the rest.
    pub fn remove_from_inventory(&mut self, item_id: EntityId) -> BurrowResult<Item> {
        let index = self
            .inventory
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| {
                BurrowError::InvariantViolation(format!(
                    "{} does not carry item {}",
                    self.name, item_id
                ))
            })?;
        Ok(self.inventory.remove(index))
    }

    /// Moves an inventory item into the slot matching its kind.
    ///
    /// Items of kind [`ItemKind::Other`] are left where they are.
    pub fn equip(&mut self, item_id: EntityId) -> BurrowResult<EquipOutcome> {
        let kind = self
            .inventory
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.kind)
            .ok_or_else(|| {
                BurrowError::InvariantViolation(format!(
                    "{} tried to equip item {} they do not carry",
                    self.name, item_id
                ))
            })?;

        let item = match kind {
            ItemKind::Other => return Ok(EquipOutcome::NotEquippable),
            ItemKind::Weapon | ItemKind::Helmet => self.remove_from_inventory(item_id)?,
        };
        let replaced = if kind == ItemKind::Weapon {
            self.weapon.replace(item)
        } else {
            self.helmet.replace(item)
        };
        let replaced_name = replaced.as_ref().map(|old| old.name.clone());
        if let Some(old) = replaced {
            self.inventory.push(old);
        }
        Ok(EquipOutcome::Equipped {
            replaced: replaced_name,
        })
    }

    /// Takes every carried and worn item off the character.
    pub fn drain_items(&mut self) -> Vec<Item> {
        let mut items: Vec<Item> = self.inventory.drain(..).collect();
        items.extend(self.weapon.take());
        items.extend(self.helmet.take());
        items
    }
}

impl Entity for Character {
    fn position(&self) -> Position {
        self.position
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn glyph(&self) -> char {
        self.glyph
    }
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub character: Character,
}

impl Player {
    /// Creates a player from the configured template.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Entity, Player, PlayerTemplate, Position};
    ///
    /// let player = Player::from_template(&PlayerTemplate::default(), Position::new(2, 3));
    /// assert_eq!(player.position(), Position::new(2, 3));
    /// assert!(player.character.is_alive());
    /// ```
    pub fn from_template(template: &PlayerTemplate, position: Position) -> Self {
        Self {
            character: Character::new(
                template.name.clone(),
                template.glyph,
                position,
                template.hitpoints,
                template.strength,
                template.speed,
                template.sight_range,
            ),
        }
    }
}

impl Entity for Player {
    fn position(&self) -> Position {
        self.character.position
    }

    fn name(&self) -> &str {
        &self.character.name
    }

    fn glyph(&self) -> char {
        self.character.glyph
    }
}

/// Monster species with fixed stat templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Rat,
    Spider,
}

impl MonsterKind {
    /// Maps a level code to a species.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'R' => Some(MonsterKind::Rat),
            'S' => Some(MonsterKind::Spider),
            _ => None,
        }
    }

    /// Level code and display glyph.
    pub fn glyph(self) -> char {
        match self {
            MonsterKind::Rat => 'R',
            MonsterKind::Spider => 'S',
        }
    }
}

/// A hostile character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: EntityId,
    pub kind: MonsterKind,
    pub character: Character,
}

impl Monster {
    /// Spawns a monster of `kind` with its template stats and default drop.
    pub fn spawn(kind: MonsterKind, position: Position) -> Self {
        let mut character = match kind {
            MonsterKind::Rat => Character::new("Rat", kind.glyph(), position, 50, 1, 2.0, 10),
            MonsterKind::Spider => Character::new("Spider", kind.glyph(), position, 100, 1, 1.0, 10),
        };
        character.inventory.push(match kind {
            MonsterKind::Rat => Item::helmet(position),
            MonsterKind::Spider => Item::sword(position),
        });
        Self {
            id: new_entity_id(),
            kind,
            character,
        }
    }
}

impl Entity for Monster {
    fn position(&self) -> Position {
        self.character.position
    }

    fn name(&self) -> &str {
        &self.character.name
    }

    fn glyph(&self) -> char {
        self.character.glyph
    }
}
