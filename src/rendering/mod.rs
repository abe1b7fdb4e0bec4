//! # Rendering Module
//!
//! Plain-text rendering of level snapshots for the console front-end and
//! for tests.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;

use crate::game::{Entity, Level};

/// Renders a full screen: map, status line, item lists and event log.
pub fn render_snapshot(level: &Level) -> String {
    let mut lines = render_map(level);
    lines.push(String::new());
    lines.push(status_line(level));
    lines.extend(numbered_items("Inventory", &level.player.character.inventory));
    lines.extend(numbered_items("Here", level.items_at(level.player.position())));
    lines.push(String::new());
    lines.extend(event_lines(level));
    lines.join("\n")
}
