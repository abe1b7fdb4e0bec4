//! Tests for the console front-end's view of session snapshots.

use burrow::{
    render_map, render_snapshot, Command, Direction, EngineConfig, Input, Session, SessionClient, Snapshot,
    WorldLoader,
};
use std::time::Duration;
use tokio::time::timeout;
use tokio_test::assert_ok;

const LEVEL: &str = "\
#########
#@.s|...#
#########";

async fn next(client: &mut SessionClient) -> Snapshot {
    timeout(Duration::from_secs(5), client.next_snapshot())
        .await
        .expect("timed out waiting for a snapshot")
        .expect("session ended early")
}

#[test]
fn test_map_hides_unseen_cells() {
    let world = WorldLoader::new(&EngineConfig::for_testing())
        .with_level("start", LEVEL)
        .load("start")
        .unwrap();
    let map = render_map(world.current_level());

    // nothing behind the closed door is drawn
    assert_eq!(map, vec!["#####", "#@.s|", "#####"]);
}

#[tokio::test]
async fn test_console_commands_drive_the_session() {
    let world = WorldLoader::new(&EngineConfig::for_testing())
        .with_level("start", LEVEL)
        .load("start")
        .unwrap();
    let mut session = Session::new(world);
    let mut client = session.subscribe();
    let worker = session.spawn();
    let mut latest = next(&mut client).await;

    for line in ["d", "d", "g", "e 1"] {
        let command = Command::parse(line).unwrap();
        assert_ok!(client.send(command.to_input(&latest, client.id())).await);
        latest = next(&mut client).await;
    }

    let screen = render_snapshot(&latest);
    assert!(screen.contains("weapon: Sword"), "{}", screen);
    assert!(screen.lines().any(|line| line == "Tester equipped Sword"));
    assert!(latest.player.character.inventory.is_empty());

    // the door opens on the next step right and the corridor comes into view
    let open = Command::Move(Direction::Right).to_input(&latest, client.id());
    assert_eq!(open, Input::Move(Direction::Right));
    assert_ok!(client.send(open).await);
    latest = next(&mut client).await;
    assert_eq!(render_map(&latest)[1], "#..@/...#");

    assert_ok!(client.send(Command::Quit.to_input(&latest, client.id())).await);
    assert_ok!(worker.await.unwrap());
}
