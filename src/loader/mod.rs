//! # Loader Module
//!
//! Builds a [`World`] from level text resources and a linkage table.
//!
//! Loading is all-or-nothing: any unknown code, missing level or bad portal
//! aborts with an error and no partial world is returned.

pub mod linkage;
pub mod map;

pub use linkage::*;
pub use map::*;

use crate::game::{EngineConfig, Level, Position, World};
use crate::{BurrowError, BurrowResult};
use log::info;
use std::path::Path;

/// File name of the linkage table inside a world directory.
pub const LINKAGE_FILE_NAME: &str = "world";

/// File extension of level resources inside a world directory.
pub const LEVEL_FILE_EXTENSION: &str = "map";

/// Collects level resources and links them into a world.
///
/// # Examples
///
/// ```
/// use burrow::{EngineConfig, Position, WorldLoader};
///
/// let world = WorldLoader::new(&EngineConfig::default())
///     .with_level("upper", "#####\n#@.d#\n#####")
///     .with_level("lower", "####\n#u.#\n####")
///     .load_with_links("upper\nupper,3,1,lower,2,1\nlower,1,1,upper,2,1")
///     .unwrap();
/// assert_eq!(world.current_level_name(), "upper");
/// assert!(world.current_level().portal_at(Position::new(3, 1)).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct WorldLoader {
    config: EngineConfig,
    sources: Vec<(String, String)>,
}

impl WorldLoader {
    /// Creates a loader with no levels.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
            sources: Vec::new(),
        }
    }

    /// Adds a level resource, replacing any earlier one with the same name.
    pub fn with_level(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        let text = text.into();
        match self.sources.iter_mut().find(|(existing, _)| *existing == name) {
            Some(source) => source.1 = text,
            None => self.sources.push((name, text)),
        }
        self
    }

    /// Loads a world directory: every `*.map` file is a level named after its
    /// file stem, and the `world` file is the linkage table.
    pub fn load_directory(config: &EngineConfig, dir: impl AsRef<Path>) -> BurrowResult<World> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == LEVEL_FILE_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loader = Self::new(config);
        for path in paths {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path)?;
            loader = loader.with_level(name, text);
        }

        let linkage = std::fs::read_to_string(dir.join(LINKAGE_FILE_NAME))?;
        info!("loading world from {}", dir.display());
        loader.load_with_links(&linkage)
    }

    /// Loads the levels with no portals, starting on `start`.
    pub fn load(self, start: &str) -> BurrowResult<World> {
        self.link(Linkage {
            start: start.to_string(),
            portals: Vec::new(),
        })
    }

    /// Parses a linkage table and loads the levels with its portals. The
    /// table's first row names the starting level.
    pub fn load_with_links(self, linkage: &str) -> BurrowResult<World> {
        let linkage = parse_linkage(linkage)?;
        self.link(linkage)
    }

    /// Parses every level, wires the portals and picks the starting level.
    pub fn link(self, linkage: Linkage) -> BurrowResult<World> {
        let mut parsed = self
            .sources
            .iter()
            .map(|(name, text)| parse_level(name, text, &self.config))
            .collect::<BurrowResult<Vec<ParsedLevel>>>()?;

        let start = parsed
            .iter()
            .find(|candidate| candidate.level.name == linkage.start)
            .ok_or_else(|| BurrowError::UnknownLevel(linkage.start.clone()))?;
        if start.player_start.is_none() {
            return Err(BurrowError::MissingPlayerStart(linkage.start.clone()));
        }

        for link in &linkage.portals {
            let target = find(&parsed, &link.target.level)?;
            if !target.level.is_walkable(link.target.position) {
                return Err(BurrowError::InvalidPortal {
                    level: link.level.clone(),
                    position: link.position,
                    reason: format!(
                        "destination {} in '{}' is not walkable",
                        link.target.position, link.target.level
                    ),
                });
            }

            let source = find_mut(&mut parsed, &link.level)?;
            if !source.level.in_range(link.position) {
                return Err(BurrowError::InvalidPortal {
                    level: link.level.clone(),
                    position: link.position,
                    reason: "portal lies off the grid".to_string(),
                });
            }
            source.level.portals.insert(link.position, link.target.clone());
        }

        let mut levels = Vec::with_capacity(parsed.len());
        for candidate in parsed {
            let mut level = candidate.level;
            if candidate.player_start.is_none() {
                let arrival = linkage
                    .portals
                    .iter()
                    .find(|link| link.target.level == level.name)
                    .map(|link| link.target.position);
                if let Some(spot) = arrival.or_else(|| first_walkable(&level)) {
                    level.player.character.position = spot;
                }
            }
            levels.push(level);
        }

        info!(
            "loaded {} levels with {} portals, starting on '{}'",
            levels.len(),
            linkage.portals.len(),
            linkage.start
        );
        World::new(levels, &linkage.start, self.config)
    }
}

fn find<'a>(parsed: &'a [ParsedLevel], name: &str) -> BurrowResult<&'a ParsedLevel> {
    parsed
        .iter()
        .find(|candidate| candidate.level.name == name)
        .ok_or_else(|| BurrowError::UnknownLevel(name.to_string()))
}

fn find_mut<'a>(parsed: &'a mut [ParsedLevel], name: &str) -> BurrowResult<&'a mut ParsedLevel> {
    parsed
        .iter_mut()
        .find(|candidate| candidate.level.name == name)
        .ok_or_else(|| BurrowError::UnknownLevel(name.to_string()))
}

/// Where a dormant player waits on a level nobody starts on.
fn first_walkable(level: &Level) -> Option<Position> {
    level
        .positions()
        .map(|(position, _)| position)
        .find(|&position| level.is_walkable(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Entity, Terrain};
    use std::fs;

    const UPPER: &str = "\
#######
#@...d#
#######";

    const LOWER: &str = "\
######
#u..R#
######";

    fn loader() -> WorldLoader {
        WorldLoader::new(&EngineConfig::for_testing())
            .with_level("upper", UPPER)
            .with_level("lower", LOWER)
    }

    #[test]
    fn test_links_portals_both_ways() {
        let world = loader()
            .load_with_links("upper\nupper,5,1,lower,2,1\nlower,1,1,upper,4,1")
            .unwrap();

        let upper = world.level("upper").unwrap();
        let lower = world.level("lower").unwrap();
        assert_eq!(upper.portal_at(Position::new(5, 1)).unwrap().level, "lower");
        assert_eq!(lower.portal_at(Position::new(1, 1)).unwrap().position, Position::new(4, 1));
        // the dormant player waits where the portal drops arrivals
        assert_eq!(lower.player.position(), Position::new(2, 1));
        assert!(lower.check_invariants().is_ok());
    }

    #[test]
    fn test_start_level_needs_player() {
        let result = loader().load("lower");
        assert!(matches!(result, Err(BurrowError::MissingPlayerStart(_))));
    }

    #[test]
    fn test_unknown_levels_are_fatal() {
        assert!(matches!(loader().load("nowhere"), Err(BurrowError::UnknownLevel(_))));
        assert!(matches!(
            loader().load_with_links("upper\nupper,5,1,cellar,1,1"),
            Err(BurrowError::UnknownLevel(name)) if name == "cellar"
        ));
    }

    #[test]
    fn test_portal_into_wall_or_monster_is_invalid() {
        assert!(matches!(
            loader().load_with_links("upper\nupper,5,1,lower,0,0"),
            Err(BurrowError::InvalidPortal { .. })
        ));
        assert!(matches!(
            loader().load_with_links("upper\nupper,5,1,lower,4,1"),
            Err(BurrowError::InvalidPortal { .. })
        ));
        assert!(matches!(
            loader().load_with_links("upper\nupper,50,1,lower,2,1"),
            Err(BurrowError::InvalidPortal { .. })
        ));
    }

    #[test]
    fn test_with_level_replaces_same_name() {
        let world = WorldLoader::new(&EngineConfig::for_testing())
            .with_level("only", "###")
            .with_level("only", "###\n#@#\n###")
            .load("only")
            .unwrap();
        assert_eq!(world.levels().len(), 1);
        assert_eq!(world.current_level().height, 3);
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("upper.map"), UPPER).unwrap();
        fs::write(dir.path().join("lower.map"), LOWER).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a level").unwrap();
        fs::write(
            dir.path().join(LINKAGE_FILE_NAME),
            "upper\nupper,5,1,lower,2,1\nlower,1,1,upper,4,1\n",
        )
        .unwrap();

        let world = WorldLoader::load_directory(&EngineConfig::for_testing(), dir.path()).unwrap();
        assert_eq!(world.levels().len(), 2);
        assert_eq!(world.current_level_name(), "upper");
        let level = world.current_level();
        assert!(level.positions().all(|(_, tile)| tile.terrain != Terrain::Pending));
        assert!(level.tile(Position::new(1, 1)).unwrap().visible);
    }

    #[test]
    fn test_load_directory_without_linkage() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("upper.map"), UPPER).unwrap();
        let result = WorldLoader::load_directory(&EngineConfig::for_testing(), dir.path());
        assert!(matches!(result, Err(BurrowError::Io(_))));
    }
}
