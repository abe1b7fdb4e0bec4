//! Integration tests for portal travel between levels.

use burrow::{
    BurrowResult, Direction, EngineConfig, Entity, Input, Position, TurnEvent, World, WorldLoader,
};

const SURFACE: &str = "\
#######
#@.h.d#
#######";

const CELLAR: &str = "\
#######
#u...S#
#######";

const LINKS: &str = "\
surface
surface, 5, 1, cellar, 2, 1
cellar, 1, 1, surface, 4, 1";

fn two_level_world() -> World {
    WorldLoader::new(&EngineConfig::for_testing())
        .with_level("surface", SURFACE)
        .with_level("cellar", CELLAR)
        .load_with_links(LINKS)
        .unwrap()
}

fn walk(world: &mut World, direction: Direction, steps: usize) -> BurrowResult<()> {
    for _ in 0..steps {
        world.play_turn(&Input::Move(direction))?;
    }
    Ok(())
}

#[test]
fn test_portal_carries_player_and_belongings() -> BurrowResult<()> {
    let mut world = two_level_world();

    walk(&mut world, Direction::Right, 2)?;
    world.play_turn(&Input::TakeAll)?;
    let helmet_id = world.current_level().player.character.inventory[0].id;
    world.play_turn(&Input::EquipItem(helmet_id))?;

    // two more steps: onto (4, 1), then into the portal at (5, 1)
    walk(&mut world, Direction::Right, 2)?;

    assert_eq!(world.current_level_name(), "cellar");
    let cellar = world.current_level();
    assert_eq!(cellar.player.position(), Position::new(2, 1));
    assert_eq!(cellar.last_event, TurnEvent::Portal);
    assert_eq!(cellar.events.latest(), Some("Tester travelled to cellar"));
    assert_eq!(
        cellar.player.character.helmet.as_ref().map(|helmet| helmet.id),
        Some(helmet_id)
    );
    assert!(cellar.tile(Position::new(4, 1)).is_some_and(|tile| tile.visible));

    let surface = world.level("surface").unwrap();
    assert!(surface.player.character.helmet.is_none());
    assert!(surface.player.character.inventory.is_empty());
    Ok(())
}

#[test]
fn test_round_trip_through_both_portals() -> BurrowResult<()> {
    let mut world = two_level_world();
    walk(&mut world, Direction::Right, 4)?;
    assert_eq!(world.current_level_name(), "cellar");

    world.play_turn(&Input::Move(Direction::Left))?;
    assert_eq!(world.current_level_name(), "surface");
    assert_eq!(world.current_level().player.position(), Position::new(4, 1));

    for level in world.levels() {
        level.check_invariants()?;
    }
    Ok(())
}

#[test]
fn test_occupied_destination_blocks_travel() -> BurrowResult<()> {
    let links = "surface\nsurface, 5, 1, cellar, 4, 1";
    let mut world = WorldLoader::new(&EngineConfig::for_testing())
        .with_level("surface", SURFACE)
        .with_level("cellar", "#######\n#u....#\n#######")
        .load_with_links(links)?;

    // a monster wanders onto the arrival cell after loading
    let arrival = Position::new(4, 1);
    let cellar_index = world.levels().iter().position(|level| level.name == "cellar").unwrap();
    let mut saved: serde_json::Value = serde_json::from_str(&world.save_to_json()?)?;
    let rat = burrow::Monster::spawn(burrow::MonsterKind::Rat, arrival);
    saved["levels"][cellar_index]["monsters"] = serde_json::json!([[arrival, rat]]);
    // the cellar's dormant player waited on the arrival cell; move it aside
    saved["levels"][cellar_index]["player"]["character"]["position"] =
        serde_json::json!(Position::new(1, 1));
    world = World::load_from_json(&saved.to_string())?;

    walk(&mut world, Direction::Right, 4)?;
    assert_eq!(world.current_level_name(), "surface");
    assert_eq!(world.current_level().player.position(), Position::new(4, 1));
    assert_eq!(world.current_level().events.latest(), Some("Something blocks the way to cellar"));
    Ok(())
}

#[test]
fn test_saved_session_resumes_on_the_same_level() -> BurrowResult<()> {
    let mut world = two_level_world();
    walk(&mut world, Direction::Right, 4)?;

    let restored = World::load_from_json(&world.save_to_json()?)?;
    assert_eq!(restored.current_level_name(), "cellar");
    assert_eq!(restored, world);
    Ok(())
}
