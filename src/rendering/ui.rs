//! # Interface Panels
//!
//! Text panels drawn under the map: player status, numbered item lists and
//! the event log.

use crate::game::{Entity, Item, Level};

/// One-line summary of the player.
///
/// # Examples
///
/// ```
/// use burrow::{status_line, EngineConfig, WorldLoader};
///
/// let world = WorldLoader::new(&EngineConfig::default())
///     .with_level("start", "###\n#@#\n###")
///     .load("start")
///     .unwrap();
/// assert_eq!(
///     status_line(world.current_level()),
///     "start | Player HP 50 STR 20 | weapon: none | helmet: none"
/// );
/// ```
pub fn status_line(level: &Level) -> String {
    let character = &level.player.character;
    let slot = |item: &Option<Item>| item.as_ref().map_or("none".to_string(), |item| item.name.clone());
    format!(
        "{} | {} HP {} STR {} | weapon: {} | helmet: {}",
        level.name,
        level.player.name(),
        character.hitpoints,
        character.strength,
        slot(&character.weapon),
        slot(&character.helmet)
    )
}

/// Numbered list of items, 1-based to match console commands.
pub fn numbered_items(title: &str, items: &[Item]) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!("{}:", title)];
    lines.extend(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| format!("  {}) {}", index + 1, item.name)),
    );
    lines
}

/// The event log, oldest line first.
pub fn event_lines(level: &Level) -> Vec<String> {
    level.events.iter().map(str::to_string).collect()
}
