//! # Level Events
//!
//! The human-readable event log kept by every level, and the tag describing
//! what the most recent turn did.

use crate::{BurrowError, BurrowResult};
use serde::{Deserialize, Serialize};

/// What the last resolved action was, for front-ends that pick sounds or
/// animations without parsing log text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Nothing happened, or the player waited
    #[default]
    Wait,
    /// The player stepped to a new cell
    Move,
    /// A closed door was opened
    DoorOpen,
    /// The player attacked a monster
    Attack,
    /// A monster hit the player
    Hit,
    /// The player travelled through a portal
    Portal,
    /// The player picked something up
    Pickup,
    /// The player dropped something
    Drop,
    /// The player equipped something
    Equip,
}

/// Fixed-capacity circular log of event lines.
///
/// Writing past the capacity silently overwrites the oldest line. The log
/// never shrinks.
///
/// # Examples
///
/// ```
/// use burrow::EventLog;
///
/// let mut log = EventLog::new(2);
/// log.push("one");
/// log.push("two");
/// log.push("three");
/// let lines: Vec<&str> = log.iter().collect();
/// assert_eq!(lines, vec!["two", "three"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    slots: Vec<Option<String>>,
    cursor: usize,
    total: u64,
}

impl EventLog {
    /// Creates an empty log holding at most `capacity` lines (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            cursor: 0,
            total: 0,
        }
    }

    /// Appends a line, overwriting the oldest one once the log is full.
    pub fn push(&mut self, line: impl Into<String>) {
        self.slots[self.cursor] = Some(line.into());
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.total += 1;
    }

    /// Iterates retained lines from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        let (newer, older) = self.slots.split_at(self.cursor);
        older
            .iter()
            .chain(newer.iter())
            .filter_map(|slot| slot.as_deref())
    }

    /// Returns the most recently written line.
    pub fn latest(&self) -> Option<&str> {
        let index = (self.cursor + self.slots.len() - 1) % self.slots.len();
        self.slots[index].as_deref()
    }

    /// Number of lines currently retained.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Maximum number of retained lines.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of lines ever written, including overwritten ones.
    pub fn total_written(&self) -> u64 {
        self.total
    }

    /// Checks a log restored from outside: at least one slot, and the write
    /// cursor inside the slots.
    pub fn validate(&self) -> BurrowResult<()> {
        if self.slots.is_empty() || self.cursor >= self.slots.len() {
            return Err(BurrowError::InvariantViolation(format!(
                "event log cursor {} outside {} slots",
                self.cursor,
                self.slots.len()
            )));
        }
        Ok(())
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EVENT_LOG_CAPACITY)
    }
}
