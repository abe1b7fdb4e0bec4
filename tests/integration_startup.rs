//! Integration tests ensuring the shipped world and directory loading start up cleanly.

use burrow::{
    reachable_cells, BurrowError, BurrowResult, EngineConfig, Entity, Position, Terrain, WorldLoader,
};
use std::fs;
use std::path::PathBuf;

fn shipped_world() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join("maps")
}

#[test]
fn test_shipped_world_loads() -> BurrowResult<()> {
    let world = WorldLoader::load_directory(&EngineConfig::default(), shipped_world())?;

    assert_eq!(world.current_level_name(), "level1");
    assert_eq!(world.levels().len(), 2);
    let level = world.current_level();
    assert_eq!(level.player.position(), Position::new(1, 1));
    assert_eq!(level.player.name(), "Player");
    assert!(!level.monsters.is_empty());
    assert!(level.tile(Position::new(1, 1)).is_some_and(|tile| tile.visible && tile.seen));

    for level in world.levels() {
        level.check_invariants()?;
        assert!(!level.portals.is_empty(), "level {} has no portal", level.name);
        for position in reachable_cells(level, level.player.position()) {
            assert_ne!(level.tile(position).map(|tile| tile.terrain), Some(Terrain::Pending));
        }
    }
    Ok(())
}

#[test]
fn test_config_file_shapes_the_player() -> BurrowResult<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("burrow.json");
    fs::write(
        &config_path,
        r#"{ "player": { "name": "Delver", "hitpoints": 75 }, "event_log_capacity": 3 }"#,
    )?;

    let config = EngineConfig::from_json_file(&config_path)?;
    let world = WorldLoader::load_directory(&config, shipped_world())?;
    let player = &world.current_level().player;
    assert_eq!(player.name(), "Delver");
    assert_eq!(player.character.hitpoints, 75);
    assert_eq!(player.character.strength, 20);
    assert_eq!(world.current_level().events.capacity(), 3);
    Ok(())
}

#[test]
fn test_bad_level_file_aborts_startup() -> BurrowResult<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("start.map"), "#####\n#@.%#\n#####")?;
    fs::write(dir.path().join("world"), "start\n")?;

    let result = WorldLoader::load_directory(&EngineConfig::default(), dir.path());
    match result {
        Err(BurrowError::UnknownTileCode { level, code, .. }) => {
            assert_eq!(level, "start");
            assert_eq!(code, '%');
        }
        other => panic!("expected an unknown tile code, got {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn test_world_file_naming_missing_level_aborts_startup() -> BurrowResult<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("start.map"), "###\n#@#\n###")?;
    fs::write(dir.path().join("world"), "basement\n")?;

    let result = WorldLoader::load_directory(&EngineConfig::default(), dir.path());
    assert!(matches!(result, Err(BurrowError::UnknownLevel(name)) if name == "basement"));
    Ok(())
}
