//! Integration tests for the worker/subscriber protocol.

use burrow::{
    Direction, EngineConfig, Entity, Input, Position, Session, SessionClient, SessionEnd, Snapshot,
    World, WorldLoader,
};
use std::time::Duration;
use tokio::time::timeout;
use tokio_test::assert_ok;

const ROOM: &str = "\
##########
#........#
#........#
#........#
#........#
#....@...#
#........#
##########";

fn room_world() -> World {
    WorldLoader::new(&EngineConfig::for_testing())
        .with_level("room", ROOM)
        .load("room")
        .unwrap()
}

async fn next(client: &mut SessionClient) -> Option<Snapshot> {
    timeout(Duration::from_secs(5), client.next_snapshot())
        .await
        .expect("timed out waiting for a snapshot")
}

#[tokio::test]
async fn test_every_subscriber_sees_every_turn_in_order() {
    let mut session = Session::new(room_world());
    let mut first = session.subscribe();
    let mut second = session.subscribe();
    let worker = session.spawn();

    let start = next(&mut first).await.unwrap();
    assert_eq!(next(&mut second).await.unwrap().player.position(), start.player.position());

    let moves = [Direction::Right, Direction::Right, Direction::Up];
    for direction in moves {
        assert_ok!(first.send(Input::Move(direction)).await);
    }

    let mut seen_by_first = Vec::new();
    let mut seen_by_second = Vec::new();
    for _ in moves {
        seen_by_first.push(next(&mut first).await.unwrap().player.position());
        seen_by_second.push(next(&mut second).await.unwrap().player.position());
    }
    let expected = vec![Position::new(6, 5), Position::new(7, 5), Position::new(7, 4)];
    assert_eq!(seen_by_first, expected);
    assert_eq!(seen_by_second, expected);

    assert_ok!(second.send(Input::QuitGame).await);
    assert_eq!(worker.await.unwrap().unwrap(), SessionEnd::Quit);
}

#[tokio::test]
async fn test_turn_appends_exactly_one_line_per_move() {
    let mut session = Session::new(room_world());
    let mut client = session.subscribe();
    let worker = session.spawn();
    let start = next(&mut client).await.unwrap();

    for direction in [Direction::Right, Direction::Right, Direction::Up] {
        assert_ok!(client.send(Input::Move(direction)).await);
    }
    let mut last = None;
    for _ in 0..3 {
        last = next(&mut client).await;
    }
    let last = last.unwrap();

    assert_eq!(last.player.position(), Position::new(7, 4));
    assert_eq!(last.events.total_written(), start.events.total_written() + 3);
    let lines: Vec<&str> = last.events.iter().collect();
    assert_eq!(
        lines,
        vec![
            "Tester moved to (6, 5)",
            "Tester moved to (7, 5)",
            "Tester moved to (7, 4)"
        ]
    );

    assert_ok!(client.send(Input::QuitGame).await);
    assert_ok!(worker.await.unwrap());
}

#[tokio::test]
async fn test_closing_one_window_leaves_the_other_playing() {
    let mut session = Session::new(room_world());
    let mut closing = session.subscribe();
    let mut remaining = session.subscribe();
    let worker = session.spawn();
    next(&mut closing).await.unwrap();
    next(&mut remaining).await.unwrap();

    assert_ok!(closing.close().await);
    assert_ok!(remaining.send(Input::Search).await);
    assert!(next(&mut remaining).await.is_some());
    assert!(next(&mut closing).await.is_none());

    assert_ok!(remaining.close().await);
    assert_eq!(worker.await.unwrap().unwrap(), SessionEnd::NoSubscribers);
}

#[tokio::test]
async fn test_chasing_monster_reaches_player_and_attacks() {
    // a rat five cells away: two steps a turn, then attacks instead of moving
    let world = WorldLoader::new(&EngineConfig::for_testing())
        .with_level("corridor", "########\n#@....R#\n########")
        .load("corridor")
        .unwrap();
    let mut session = Session::new(world);
    let mut client = session.subscribe();
    let worker = session.spawn();
    next(&mut client).await.unwrap();

    let mut rat_positions = Vec::new();
    for _ in 0..3 {
        assert_ok!(client.send(Input::Search).await);
        let snapshot = next(&mut client).await.unwrap();
        rat_positions.push(*snapshot.monsters.keys().next().unwrap());
        if rat_positions.len() == 3 {
            assert_eq!(snapshot.player.character.hitpoints, 98);
        }
    }
    assert_eq!(
        rat_positions,
        vec![Position::new(4, 1), Position::new(2, 1), Position::new(2, 1)]
    );

    assert_ok!(client.send(Input::QuitGame).await);
    assert_ok!(worker.await.unwrap());
}
