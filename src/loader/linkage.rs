//! # World Linkage
//!
//! Parses the table that wires levels together with portals.
//!
//! The first non-blank row holds the starting level's name. Every further row
//! is `level, x, y, target_level, target_x, target_y`: stepping onto `(x, y)`
//! in `level` moves the player to `(target_x, target_y)` in `target_level`.
//! Fields are comma separated; spaces around them are ignored.

use crate::game::{PortalTarget, Position};
use crate::{BurrowError, BurrowResult};

/// One portal row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalLink {
    pub level: String,
    pub position: Position,
    pub target: PortalTarget,
}

/// The parsed linkage table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linkage {
    pub start: String,
    pub portals: Vec<PortalLink>,
}

/// Parses a linkage table.
///
/// # Examples
///
/// ```
/// use burrow::{parse_linkage, Position};
///
/// let linkage = parse_linkage("level1\nlevel1, 4, 2, level2, 1, 1").unwrap();
/// assert_eq!(linkage.start, "level1");
/// assert_eq!(linkage.portals[0].target.level, "level2");
/// assert_eq!(linkage.portals[0].position, Position::new(4, 2));
/// ```
pub fn parse_linkage(text: &str) -> BurrowResult<Linkage> {
    let mut rows = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (start_line, start_row) = rows.next().ok_or_else(|| BurrowError::MalformedWorld {
        line: 1,
        reason: "no starting level".to_string(),
    })?;
    let start = fields(start_row)
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| BurrowError::MalformedWorld {
            line: start_line,
            reason: "no starting level".to_string(),
        })?
        .to_string();

    let portals = rows
        .map(|(line, row)| parse_portal(line, row))
        .collect::<BurrowResult<Vec<_>>>()?;

    Ok(Linkage { start, portals })
}

fn fields(row: &str) -> impl Iterator<Item = &str> {
    row.split(',').map(str::trim)
}

fn parse_portal(line: usize, row: &str) -> BurrowResult<PortalLink> {
    let columns: Vec<&str> = fields(row).collect();
    let &[level, x, y, target_level, target_x, target_y] = columns.as_slice() else {
        return Err(BurrowError::MalformedWorld {
            line,
            reason: format!("expected 6 fields, found {}", columns.len()),
        });
    };
    if level.is_empty() || target_level.is_empty() {
        return Err(BurrowError::MalformedWorld {
            line,
            reason: "empty level name".to_string(),
        });
    }

    let coordinate = |text: &str| {
        text.parse::<i32>().map_err(|_| BurrowError::MalformedWorld {
            line,
            reason: format!("bad coordinate '{}'", text),
        })
    };

    Ok(PortalLink {
        level: level.to_string(),
        position: Position::new(coordinate(x)?, coordinate(y)?),
        target: PortalTarget {
            level: target_level.to_string(),
            position: Position::new(coordinate(target_x)?, coordinate(target_y)?),
        },
    })
}
