//! # Level Text Parsing
//!
//! Turns a plain-text level resource into a [`Level`].
//!
//! One row per line, one character per cell. Rows shorter than the longest
//! row are padded with blank cells. Doors, stairs, spawns and the player start
//! are parsed onto [`Terrain::Pending`] and then given the floor terrain of
//! the nearest plain floor cell.

use crate::game::{
    EngineConfig, Item, Level, Monster, MonsterKind, Overlay, Player, Position, Terrain, Tile,
};
use crate::utils::nearest_floor;
use crate::{BurrowError, BurrowResult};
use log::{debug, warn};

/// A parsed level and the `@` marker it contained, if any.
#[derive(Debug, Clone)]
pub struct ParsedLevel {
    pub level: Level,
    pub player_start: Option<Position>,
}

/// What a single level code places on its cell.
enum Cell {
    Tile(Tile),
    PlayerStart,
    Monster(MonsterKind),
    Item(Item),
}

fn decode(code: char, position: Position) -> Option<Cell> {
    let pending = |overlay| Cell::Tile(Tile::new(Terrain::Pending, overlay));
    let cell = match code {
        ' ' | '\t' => Cell::Tile(Tile::default()),
        '#' => Cell::Tile(Tile::wall()),
        '.' => Cell::Tile(Tile::floor()),
        '|' => pending(Overlay::ClosedDoor),
        '/' => pending(Overlay::OpenDoor),
        'u' => pending(Overlay::UpStair),
        'd' => pending(Overlay::DownStair),
        '@' => Cell::PlayerStart,
        _ => {
            if let Some(kind) = MonsterKind::from_code(code) {
                Cell::Monster(kind)
            } else {
                Cell::Item(Item::from_code(code, position)?)
            }
        }
    };
    Some(cell)
}

/// Parses one level resource.
///
/// # Examples
///
/// ```
/// use burrow::{parse_level, EngineConfig, Position, Terrain};
///
/// let parsed = parse_level("hall", "####\n#@.\n##", &EngineConfig::default()).unwrap();
/// assert_eq!(parsed.player_start, Some(Position::new(1, 1)));
/// assert_eq!(parsed.level.width, 4);
/// // padding
/// assert_eq!(parsed.level.tile(Position::new(3, 2)).unwrap().terrain, Terrain::Blank);
/// // the start cell resolves to floor
/// assert_eq!(parsed.level.tile(Position::new(1, 1)).unwrap().terrain, Terrain::DirtFloor);
/// ```
pub fn parse_level(name: &str, text: &str, config: &EngineConfig) -> BurrowResult<ParsedLevel> {
    let rows: Vec<&str> = text.lines().collect();
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    if rows.is_empty() || width == 0 {
        return Err(BurrowError::EmptyLevel(name.to_string()));
    }

    let player = Player::from_template(&config.player, Position::origin());
    let mut level = Level::new(name, width as u32, rows.len() as u32, player, config.event_log_capacity);
    let mut player_start = None;

    for (y, row) in rows.iter().enumerate() {
        for (x, code) in row.chars().enumerate() {
            let position = Position::new(x as i32, y as i32);
            let cell = decode(code, position).ok_or_else(|| BurrowError::UnknownTileCode {
                level: name.to_string(),
                line: y + 1,
                column: x + 1,
                code,
            })?;

            let tile = match cell {
                Cell::Tile(tile) => tile,
                Cell::PlayerStart => {
                    if player_start.replace(position).is_some() {
                        return Err(BurrowError::DuplicatePlayerStart(name.to_string()));
                    }
                    Tile::new(Terrain::Pending, Overlay::None)
                }
                Cell::Monster(kind) => {
                    level.monsters.insert(position, Monster::spawn(kind, position));
                    Tile::new(Terrain::Pending, Overlay::None)
                }
                Cell::Item(item) => {
                    level.place_item(position, item);
                    Tile::new(Terrain::Pending, Overlay::None)
                }
            };
            level.set_tile(position, tile)?;
        }
    }

    resolve_pending(&mut level);
    if let Some(start) = player_start {
        level.player.character.position = start;
    }
    debug!(
        "parsed level '{}': {}x{}, {} monsters, {} item piles",
        name,
        level.width,
        level.height,
        level.monsters.len(),
        level.items.len()
    );

    Ok(ParsedLevel {
        level,
        player_start,
    })
}

/// Gives every pending cell floor terrain.
///
/// A pending cell with no plain floor reachable from it is still floored,
/// with a warning, so no pending terrain survives loading.
fn resolve_pending(level: &mut Level) {
    let pending: Vec<Position> = level
        .positions()
        .filter(|(_, tile)| tile.terrain == Terrain::Pending)
        .map(|(position, _)| position)
        .collect();

    for position in pending {
        if nearest_floor(level, position).is_none() {
            warn!(
                "level '{}': no floor reachable from {}, flooring it anyway",
                level.name, position
            );
        }
        if let Some(tile) = level.tile_mut(position) {
            tile.terrain = Terrain::DirtFloor;
        }
    }
}
