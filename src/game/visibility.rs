//! # Visibility
//!
//! Radius-limited ray casting from the player. Every cell inside the sight
//! circle gets a Bresenham ray; each ray reveals cells until it reaches an
//! opaque one, which is itself revealed before the ray stops.

use crate::game::{Entity, Level, Position};
use crate::utils::bresenham_line;

/// Recomputes line of sight for the level's player.
///
/// All `visible` flags are cleared first; `seen` flags are only ever set.
pub fn update_visibility(level: &mut Level) {
    level.clear_visibility();

    let origin = level.player.position();
    let range = level.player.character.sight_range;
    for y in origin.y - range..=origin.y + range {
        for x in origin.x - range..=origin.x + range {
            let target = Position::new(x, y);
            if origin.euclidean_distance(target) <= range as f64 {
                cast_ray(level, origin, target);
            }
        }
    }
}

fn cast_ray(level: &mut Level, origin: Position, target: Position) {
    for position in bresenham_line(origin, target) {
        let Some(tile) = level.tile_mut(position) else {
            return;
        };
        tile.reveal();
        if !tile.is_transparent() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Overlay, Player, PlayerTemplate, Terrain, Tile};
    use proptest::prelude::*;

    fn corridor_with_door() -> Level {
        // ###########
        // #....|....#
        // ###########
        let template = PlayerTemplate {
            sight_range: 8,
            ..PlayerTemplate::default()
        };
        let player = Player::from_template(&template, Position::new(1, 1));
        let mut level = Level::new("corridor", 11, 3, player, 10);
        for y in 0..3 {
            for x in 0..11 {
                let tile = if y == 1 && (1..10).contains(&x) {
                    Tile::floor()
                } else {
                    Tile::wall()
                };
                level.set_tile(Position::new(x, y), tile).unwrap();
            }
        }
        level
            .set_tile(Position::new(5, 1), Tile::new(Terrain::DirtFloor, Overlay::ClosedDoor))
            .unwrap();
        level
    }

    #[test]
    fn test_closed_door_stops_rays_but_is_seen() {
        let mut level = corridor_with_door();
        update_visibility(&mut level);

        assert!(level.tile(Position::new(1, 1)).unwrap().visible);
        assert!(level.tile(Position::new(4, 1)).unwrap().visible);
        assert!(level.tile(Position::new(5, 1)).unwrap().visible);
        assert!(!level.tile(Position::new(6, 1)).unwrap().visible);
        assert!(!level.tile(Position::new(6, 1)).unwrap().seen);
        // walls bordering the lit corridor are visible too
        assert!(level.tile(Position::new(2, 0)).unwrap().visible);
    }

    #[test]
    fn test_opening_door_extends_sight() {
        let mut level = corridor_with_door();
        update_visibility(&mut level);
        level.tile_mut(Position::new(5, 1)).unwrap().overlay = Overlay::OpenDoor;
        update_visibility(&mut level);

        assert!(level.tile(Position::new(8, 1)).unwrap().visible);
    }

    #[test]
    fn test_seen_survives_moving_away() {
        let mut level = corridor_with_door();
        level.tile_mut(Position::new(5, 1)).unwrap().overlay = Overlay::OpenDoor;
        level.player.character.sight_range = 2;
        update_visibility(&mut level);
        assert!(level.tile(Position::new(3, 1)).unwrap().visible);

        level.player.character.position = Position::new(8, 1);
        update_visibility(&mut level);
        let far_tile = level.tile(Position::new(3, 1)).unwrap();
        assert!(!far_tile.visible);
        assert!(far_tile.seen);
    }

    #[test]
    fn test_sight_is_radius_limited() {
        let mut level = corridor_with_door();
        level.tile_mut(Position::new(5, 1)).unwrap().overlay = Overlay::OpenDoor;
        level.player.character.sight_range = 3;
        update_visibility(&mut level);

        assert!(level.tile(Position::new(4, 1)).unwrap().visible);
        assert!(!level.tile(Position::new(5, 1)).unwrap().visible);
    }

    proptest! {
        #[test]
        fn visible_implies_seen_and_seen_never_reverts(
            moves in proptest::collection::vec(1i32..10, 1..8),
            range in 0i32..10,
        ) {
            let mut level = corridor_with_door();
            level.tile_mut(Position::new(5, 1)).unwrap().overlay = Overlay::OpenDoor;
            level.player.character.sight_range = range;

            let mut previously_seen = Vec::new();
            for x in moves {
                level.player.character.position = Position::new(x, 1);
                update_visibility(&mut level);

                for (position, tile) in level.positions() {
                    prop_assert!(!tile.visible || tile.seen);
                    if previously_seen.contains(&position) {
                        prop_assert!(tile.seen);
                    }
                }
                previously_seen = level
                    .positions()
                    .filter(|(_, tile)| tile.seen)
                    .map(|(position, _)| position)
                    .collect();
            }
        }
    }
}
