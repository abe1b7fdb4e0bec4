//! # Pathfinding Algorithms
//!
//! Grid searches over a level's walkable cells: A* for monster movement and
//! breadth-first sweeps for load-time floor resolution and reachability.
//!
//! A cell is walkable when it is on the grid, its terrain is neither wall nor
//! blank, it is not a closed door, and no monster stands on it. Moves are the
//! four cardinal steps at unit cost.

use crate::game::{Level, Position, Terrain};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Node for the A* open set.
///
/// Ordered so that `BinaryHeap` pops the lowest priority first and, among
/// equal priorities, the node discovered first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AStarNode {
    position: Position,
    priority: u32,
    discovered: u64,
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.discovered.cmp(&self.discovered))
    }
}

/// Finds a shortest walkable path from `start` to `goal`.
///
/// Returns the cells from `start` to `goal` inclusive, or an empty vector
/// when the goal cannot be reached. The start cell itself is never checked
/// for walkability, so a monster may search from the cell it occupies.
///
/// # Examples
///
/// ```
/// use burrow::{find_path, EngineConfig, Position, WorldLoader};
///
/// let world = WorldLoader::new(&EngineConfig::default())
///     .with_level("room", "#####\n#@..#\n#...#\n#####")
///     .load("room")
///     .unwrap();
/// let level = world.current_level();
/// let path = find_path(level, Position::new(1, 1), Position::new(3, 2));
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.last(), Some(&Position::new(3, 2)));
/// ```
pub fn find_path(level: &Level, start: Position, goal: Position) -> Vec<Position> {
    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut cost_so_far: HashMap<Position, u32> = HashMap::new();
    let mut discovered = 0u64;

    cost_so_far.insert(start, 0);
    open_set.push(AStarNode {
        position: start,
        priority: start.manhattan_distance(goal),
        discovered,
    });

    while let Some(AStarNode { position: current, .. }) = open_set.pop() {
        if current == goal {
            let mut path = vec![current];
            let mut step = current;
            while let Some(&previous) = came_from.get(&step) {
                path.push(previous);
                step = previous;
            }
            path.reverse();
            return path;
        }

        let current_cost = cost_so_far.get(&current).copied().unwrap_or(0);
        for next in level.walkable_neighbors(current) {
            let new_cost = current_cost + 1;
            if cost_so_far.get(&next).map_or(true, |&known| new_cost < known) {
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, current);
                discovered += 1;
                open_set.push(AStarNode {
                    position: next,
                    priority: new_cost + next.manhattan_distance(goal),
                    discovered,
                });
            }
        }
    }

    Vec::new()
}

/// Breadth-first search from `start` along walkable cells for the nearest
/// plain floor cell. `start` itself counts if it is floor.
pub fn nearest_floor(level: &Level, start: Position) -> Option<Position> {
    ::pathfinding::prelude::bfs(
        &start,
        |&position| level.walkable_neighbors(position),
        |&position| level.tile(position).is_some_and(|tile| tile.terrain == Terrain::DirtFloor),
    )
    .and_then(|path| path.last().copied())
}

/// Every cell reachable from `start` by cardinal walkable steps, `start`
/// included.
pub fn reachable_cells(level: &Level, start: Position) -> HashSet<Position> {
    ::pathfinding::prelude::bfs_reach(start, |&position| level.walkable_neighbors(position)).collect()
}
