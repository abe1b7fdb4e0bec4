//! # Console Commands
//!
//! Text commands typed into the console front-end and their translation into
//! [`Input`] values.
//!
//! Item commands select by 1-based index into the list the renderer shows,
//! so they are resolved against the snapshot the player was looking at.

use crate::game::{Direction, Entity, Level};
use crate::input::Input;
use crate::session::SubscriberId;

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    TakeAll,
    /// Take the nth item on the player's cell
    Take(usize),
    /// Equip the nth inventory item
    Equip(usize),
    /// Drop the nth inventory item
    Drop(usize),
    Search,
    Close,
    Quit,
}

impl Command {
    /// Parses one console line.
    ///
    /// Returns `None` for blank or unrecognised lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Command, Direction};
    ///
    /// assert_eq!(Command::parse("d"), Some(Command::Move(Direction::Right)));
    /// assert_eq!(Command::parse("e 2"), Some(Command::Equip(2)));
    /// assert_eq!(Command::parse("e"), None);
    /// ```
    pub fn parse(line: &str) -> Option<Command> {
        let mut words = line.split_whitespace();
        let verb = words.next()?;
        let index = words.next().and_then(|word| word.parse::<usize>().ok());
        if words.next().is_some() {
            return None;
        }

        match (verb, index) {
            ("w", None) => Some(Command::Move(Direction::Up)),
            ("a", None) => Some(Command::Move(Direction::Left)),
            ("s", None) => Some(Command::Move(Direction::Down)),
            ("d", None) => Some(Command::Move(Direction::Right)),
            ("g", None) => Some(Command::TakeAll),
            ("t", Some(n)) => Some(Command::Take(n)),
            ("e", Some(n)) => Some(Command::Equip(n)),
            ("x", Some(n)) => Some(Command::Drop(n)),
            ("f", None) => Some(Command::Search),
            ("c", None) => Some(Command::Close),
            ("q", None) => Some(Command::Quit),
            _ => None,
        }
    }

    /// Translates the command into an input for `subscriber`, resolving item
    /// indices against `snapshot`.
    ///
    /// An index that selects nothing yields [`Input::None`].
    pub fn to_input(self, snapshot: &Level, subscriber: SubscriberId) -> Input {
        let character = &snapshot.player.character;
        let nth = |n: usize| n.checked_sub(1);
        match self {
            Command::Move(direction) => Input::Move(direction),
            Command::TakeAll => Input::TakeAll,
            Command::Take(n) => nth(n)
                .and_then(|i| snapshot.items_at(snapshot.player.position()).get(i))
                .map_or(Input::None, |item| Input::TakeItem(item.id)),
            Command::Equip(n) => nth(n)
                .and_then(|i| character.inventory.get(i))
                .map_or(Input::None, |item| Input::EquipItem(item.id)),
            Command::Drop(n) => nth(n)
                .and_then(|i| character.inventory.get(i))
                .map_or(Input::None, |item| Input::DropItem(item.id)),
            Command::Search => Input::Search,
            Command::Close => Input::CloseWindow(subscriber),
            Command::Quit => Input::QuitGame,
        }
    }
}

/// Help text listing every console command.
pub const COMMAND_HELP: &str = "\
w/a/s/d  move or attack
g        take everything here
t <n>    take the nth item here
e <n>    equip the nth inventory item
x <n>    drop the nth inventory item
f        search
c        close this window
q        quit";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Item, Player, PlayerTemplate, Position, Tile};

    fn snapshot() -> Level {
        let player = Player::from_template(&PlayerTemplate::default(), Position::new(1, 1));
        let mut level = Level::new("snap", 3, 3, player, 4);
        for y in 0..3 {
            for x in 0..3 {
                level.set_tile(Position::new(x, y), Tile::floor()).unwrap();
            }
        }
        level
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("z"), None);
        assert_eq!(Command::parse("t x"), None);
        assert_eq!(Command::parse("w 3"), None);
        assert_eq!(Command::parse("t 1 2"), None);
        assert_eq!(Command::parse("  q  "), Some(Command::Quit));
    }

    #[test]
    fn test_item_indices_resolve_against_snapshot() {
        let mut level = snapshot();
        let sword = Item::sword(Position::origin());
        let sword_id = sword.id;
        level.player.character.inventory.push(sword);
        let helmet = Item::helmet(Position::origin());
        let helmet_id = helmet.id;
        level.place_item(Position::new(1, 1), helmet);
        let me = SubscriberId::new();

        assert_eq!(Command::Equip(1).to_input(&level, me), Input::EquipItem(sword_id));
        assert_eq!(Command::Drop(1).to_input(&level, me), Input::DropItem(sword_id));
        assert_eq!(Command::Take(1).to_input(&level, me), Input::TakeItem(helmet_id));
        assert_eq!(Command::Equip(2).to_input(&level, me), Input::None);
        assert_eq!(Command::Take(0).to_input(&level, me), Input::None);
        assert_eq!(Command::Close.to_input(&level, me), Input::CloseWindow(me));
    }
}
