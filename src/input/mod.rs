//! # Input Module
//!
//! Player intents sent to the session worker, and the console command
//! mapping that produces them.

pub mod commands;

pub use commands::*;

use crate::game::{Direction, EntityId};
use crate::session::SubscriberId;
use serde::{Deserialize, Serialize};

/// A request from a front-end to the session worker.
///
/// Item requests carry the id of the item they act on; `CloseWindow`
/// carries the subscriber that is leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Input {
    /// No-op sentinel: resolves nothing and passes no turn
    #[default]
    None,
    Move(Direction),
    TakeAll,
    TakeItem(EntityId),
    DropItem(EntityId),
    EquipItem(EntityId),
    QuitGame,
    CloseWindow(SubscriberId),
    /// Wait a turn and look around
    Search,
}

/// Payload-free tag of an [`Input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    None,
    Up,
    Down,
    Left,
    Right,
    TakeAll,
    TakeItem,
    DropItem,
    EquipItem,
    QuitGame,
    CloseWindow,
    Search,
}

impl Input {
    /// The tag of this input.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow::{Direction, Input, InputKind};
    ///
    /// assert_eq!(Input::Move(Direction::Left).kind(), InputKind::Left);
    /// assert_eq!(Input::default().kind(), InputKind::None);
    /// ```
    pub fn kind(&self) -> InputKind {
        match self {
            Input::None => InputKind::None,
            Input::Move(Direction::Up) => InputKind::Up,
            Input::Move(Direction::Down) => InputKind::Down,
            Input::Move(Direction::Left) => InputKind::Left,
            Input::Move(Direction::Right) => InputKind::Right,
            Input::TakeAll => InputKind::TakeAll,
            Input::TakeItem(_) => InputKind::TakeItem,
            Input::DropItem(_) => InputKind::DropItem,
            Input::EquipItem(_) => InputKind::EquipItem,
            Input::QuitGame => InputKind::QuitGame,
            Input::CloseWindow(_) => InputKind::CloseWindow,
            Input::Search => InputKind::Search,
        }
    }

    /// Item the input refers to, if any.
    pub fn item(&self) -> Option<EntityId> {
        match self {
            Input::TakeItem(id) | Input::DropItem(id) | Input::EquipItem(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether resolving this input advances the game by a turn.
    pub fn passes_turn(&self) -> bool {
        !matches!(self, Input::None | Input::QuitGame | Input::CloseWindow(_))
    }
}
