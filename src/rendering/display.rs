//! # Map Display
//!
//! Plain-text drawing of a level snapshot with fog of war.
//!
//! Visible cells show their occupant (player, monster, top ground item) or
//! their tile. Cells seen earlier but not visible now show the bare tile in
//! its dimmed form, never occupants. Cells never seen are blank.

use crate::game::{Entity, Level, Overlay, Position, Terrain, Tile};

/// Glyph for a bare tile, bright or dimmed.
///
/// # Examples
///
/// ```
/// use burrow::{tile_glyph, Tile};
///
/// assert_eq!(tile_glyph(&Tile::floor(), false), '.');
/// assert_eq!(tile_glyph(&Tile::floor(), true), ',');
/// assert_eq!(tile_glyph(&Tile::wall(), true), '#');
/// ```
pub fn tile_glyph(tile: &Tile, dimmed: bool) -> char {
    match tile.overlay {
        Overlay::ClosedDoor => return '|',
        Overlay::OpenDoor => return '/',
        Overlay::UpStair => return 'u',
        Overlay::DownStair => return 'd',
        Overlay::None => {}
    }
    match (tile.terrain, dimmed) {
        (Terrain::StoneWall, _) => '#',
        (Terrain::DirtFloor, false) => '.',
        (Terrain::DirtFloor, true) => ',',
        (Terrain::Pending, _) => '?',
        (Terrain::Blank, _) => ' ',
    }
}

/// Renders the level grid as lines of text, one per row.
pub fn render_map(level: &Level) -> Vec<String> {
    level
        .tiles
        .iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, tile)| cell_glyph(level, Position::new(x as i32, y as i32), tile))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

fn cell_glyph(level: &Level, position: Position, tile: &Tile) -> char {
    if tile.visible {
        if level.player.position() == position {
            return level.player.glyph();
        }
        if let Some(monster) = level.monster_at(position) {
            return monster.glyph();
        }
        if let Some(item) = level.items_at(position).last() {
            return item.glyph();
        }
        tile_glyph(tile, false)
    } else if tile.seen {
        tile_glyph(tile, true)
    } else {
        ' '
    }
}
