//! # Burrow Dungeon Engine
//!
//! The game-state engine of a turn-based dungeon crawler.
//!
//! ## Architecture Overview
//!
//! Burrow owns everything that happens between "the player pressed a key" and
//! "here is the new state of the level". Presentation (pixels, sound, input
//! devices) lives outside the crate and talks to the engine through two
//! message channels only:
//!
//! - **Loader**: parses level text resources and the world-linkage table into
//!   a [`World`] of named levels joined by portals
//! - **Visibility**: radius-limited ray casting for line of sight and fog of war
//! - **Pathfinding**: A* over the walkable grid for monster movement
//! - **Turn resolution**: movement, combat, doors, items and portals
//! - **Monster control**: action-point budgets spent chasing the player
//! - **Session**: the single worker that resolves one [`Input`] at a time and
//!   publishes immutable [`Level`] snapshots to every subscriber
//!
//! ## Example
//!
//! ```
//! use burrow::{EngineConfig, Entity, WorldLoader};
//!
//! let config = EngineConfig::for_testing();
//! let world = WorldLoader::new(&config)
//!     .with_level("start", "#####\n#@..#\n#####")
//!     .load("start")
//!     .unwrap();
//! assert_eq!(world.current_level().player.position().x, 1);
//! ```

pub mod game;
pub mod input;
pub mod loader;
pub mod rendering;
pub mod session;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use input::*;
pub use loader::*;
pub use rendering::*;
pub use session::*;
pub use utils::*;

/// Core error type for the Burrow engine.
#[derive(thiserror::Error, Debug)]
pub enum BurrowError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A level resource contains a character with no tile meaning
    #[error("Unknown tile code {code:?} in level '{level}' at line {line}, column {column}")]
    UnknownTileCode {
        level: String,
        line: usize,
        column: usize,
        code: char,
    },

    /// A level that must host the player has no `@` marker
    #[error("Level '{0}' has no player start")]
    MissingPlayerStart(String),

    /// A level has more than one `@` marker
    #[error("Level '{0}' has more than one player start")]
    DuplicatePlayerStart(String),

    /// A level resource has no rows
    #[error("Level '{0}' is empty")]
    EmptyLevel(String),

    /// The world-linkage table could not be parsed
    #[error("Malformed world file at line {line}: {reason}")]
    MalformedWorld { line: usize, reason: String },

    /// A level name did not resolve to a loaded level
    #[error("Unknown level '{0}'")]
    UnknownLevel(String),

    /// A portal points somewhere the player cannot stand
    #[error("Invalid portal in level '{level}' at {position:?}: {reason}")]
    InvalidPortal {
        level: String,
        position: game::Position,
        reason: String,
    },

    /// Internal ownership or bookkeeping invariant was broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The player's hitpoints reached zero
    #[error("The player was killed by {killer}")]
    PlayerDied { killer: String },

    /// The session worker is no longer accepting input
    #[error("Session closed")]
    SessionClosed,

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the Burrow codebase.
pub type BurrowResult<T> = Result<T, BurrowError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Number of lines kept in a level's circular event log
    pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 10;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HITPOINTS: i32 = 50;

    /// Default player strength
    pub const DEFAULT_PLAYER_STRENGTH: i32 = 20;

    /// Default player speed in action points per turn
    pub const DEFAULT_PLAYER_SPEED: f64 = 1.0;

    /// Default player sight radius in tiles
    pub const DEFAULT_PLAYER_SIGHT_RANGE: i32 = 7;

    /// Lowest value a character's action point budget may reach
    pub const DEFAULT_ACTION_POINT_FLOOR: f64 = 0.0;

    /// Inputs the worker buffers before senders are back-pressured
    pub const DEFAULT_INPUT_QUEUE_CAPACITY: usize = 16;

    /// Snapshots buffered per subscriber before the worker waits on it
    pub const DEFAULT_SNAPSHOT_QUEUE_CAPACITY: usize = 4;
}
