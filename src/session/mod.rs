//! # Session Module
//!
//! The game loop worker and the channels front-ends use to talk to it.
//!
//! One worker task owns the [`World`]. Front-ends submit [`Input`] values on
//! a shared bounded channel and each receives its own stream of immutable
//! [`Snapshot`]s. The worker resolves one input completely, runs the monster
//! phase, and only then publishes, so every subscriber sees every turn in
//! order and no snapshot is ever mutated after it is sent.

use crate::game::{Level, World};
use crate::input::Input;
use crate::{BurrowError, BurrowResult};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Immutable view of the active level after a turn.
pub type Snapshot = Arc<Level>;

/// Identifies one subscriber's outbound channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    /// Creates a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why the worker stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// A front-end sent `QuitGame`
    Quit,
    /// The last subscriber closed its window or went away
    NoSubscribers,
    /// Every input sender was dropped
    InputClosed,
    /// The player was killed; the final snapshot was still published
    PlayerDied { killer: String },
}

struct Subscriber {
    id: SubscriberId,
    snapshots: mpsc::Sender<Snapshot>,
}

/// The game loop, before it is started.
pub struct Session {
    world: World,
    inputs: mpsc::Receiver<Input>,
    input_sender: mpsc::Sender<Input>,
    subscribers: Vec<Subscriber>,
}

impl Session {
    /// Creates a session around a loaded world. Queue sizes come from the
    /// world's configuration.
    pub fn new(world: World) -> Self {
        let (input_sender, inputs) = mpsc::channel(world.config.input_queue_capacity.max(1));
        Self {
            world,
            inputs,
            input_sender,
            subscribers: Vec::new(),
        }
    }

    /// Attaches a new front-end.
    pub fn subscribe(&mut self) -> SessionClient {
        let (sender, snapshots) = mpsc::channel(self.world.config.snapshot_queue_capacity.max(1));
        let id = SubscriberId::new();
        self.subscribers.push(Subscriber {
            id,
            snapshots: sender,
        });
        debug!("subscriber {} attached", id);
        SessionClient {
            id,
            snapshots,
            inputs: self.input_sender.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Runs the worker on its own task.
    pub fn spawn(self) -> JoinHandle<BurrowResult<SessionEnd>> {
        tokio::spawn(self.run())
    }

    /// Runs the game loop until it ends.
    ///
    /// The starting level is published before the first input is read.
    /// Internal invariant violations end the loop with an error; a player
    /// death is a normal [`SessionEnd::PlayerDied`] outcome.
    pub async fn run(self) -> BurrowResult<SessionEnd> {
        let Session {
            mut world,
            mut inputs,
            input_sender,
            mut subscribers,
        } = self;
        // Only clients keep the input channel open.
        drop(input_sender);

        info!(
            "session started on '{}' with {} subscribers",
            world.current_level_name(),
            subscribers.len()
        );
        publish(&mut subscribers, &world).await;
        if subscribers.is_empty() {
            info!("session ended: no subscribers");
            return Ok(SessionEnd::NoSubscribers);
        }

        while let Some(input) = inputs.recv().await {
            match input {
                Input::QuitGame => {
                    info!("session ended: quit");
                    return Ok(SessionEnd::Quit);
                }
                Input::CloseWindow(id) => {
                    let before = subscribers.len();
                    subscribers.retain(|subscriber| subscriber.id != id);
                    if subscribers.len() < before {
                        info!("subscriber {} closed its window", id);
                    } else {
                        debug!("close request for unknown subscriber {}", id);
                    }
                }
                input => match world.play_turn(&input) {
                    Ok(true) => publish(&mut subscribers, &world).await,
                    Ok(false) => {}
                    Err(BurrowError::PlayerDied { killer }) => {
                        publish(&mut subscribers, &world).await;
                        info!("session ended: player killed by {}", killer);
                        return Ok(SessionEnd::PlayerDied { killer });
                    }
                    Err(err) => {
                        error!("session aborted: {}", err);
                        return Err(err);
                    }
                },
            }

            if subscribers.is_empty() {
                info!("session ended: no subscribers");
                return Ok(SessionEnd::NoSubscribers);
            }
        }

        info!("session ended: input channel closed");
        Ok(SessionEnd::InputClosed)
    }
}

/// Sends the active level to every subscriber, dropping those that are gone.
async fn publish(subscribers: &mut Vec<Subscriber>, world: &World) {
    let snapshot: Snapshot = Arc::new(world.current_level().clone());
    let mut gone = Vec::new();
    for subscriber in subscribers.iter() {
        if subscriber.snapshots.send(Arc::clone(&snapshot)).await.is_err() {
            warn!("subscriber {} stopped listening, dropping it", subscriber.id);
            gone.push(subscriber.id);
        }
    }
    subscribers.retain(|subscriber| !gone.contains(&subscriber.id));
}

/// A front-end's end of the session.
#[derive(Debug)]
pub struct SessionClient {
    id: SubscriberId,
    snapshots: mpsc::Receiver<Snapshot>,
    inputs: mpsc::Sender<Input>,
}

impl SessionClient {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Submits an input, waiting while the worker's queue is full.
    pub async fn send(&self, input: Input) -> BurrowResult<()> {
        self.inputs
            .send(input)
            .await
            .map_err(|_| BurrowError::SessionClosed)
    }

    /// Waits for the next snapshot. `None` once this subscriber is closed or
    /// the session has ended.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        self.snapshots.recv().await
    }

    /// Asks the worker to stop publishing to this subscriber.
    pub async fn close(&self) -> BurrowResult<()> {
        self.send(Input::CloseWindow(self.id)).await
    }

    /// Splits the client into its id, snapshot stream and input sender.
    pub fn into_parts(self) -> (SubscriberId, mpsc::Receiver<Snapshot>, mpsc::Sender<Input>) {
        (self.id, self.snapshots, self.inputs)
    }
}
