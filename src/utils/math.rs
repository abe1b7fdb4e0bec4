//! # Grid Geometry
//!
//! Discrete line drawing used by the visibility engine.

use crate::game::Position;

/// Cells on the Bresenham line from `start` to `end`, both included, in
/// walking order from `start`.
///
/// Lines steeper than 45 degrees are walked with the axes swapped so the
/// error term always accumulates along the shorter axis, then swapped back
/// when each cell is emitted.
///
/// # Examples
///
/// ```
/// use burrow::{bresenham_line, Position};
///
/// let line = bresenham_line(Position::new(0, 0), Position::new(3, 1));
/// assert_eq!(line.first(), Some(&Position::new(0, 0)));
/// assert_eq!(line.last(), Some(&Position::new(3, 1)));
/// assert_eq!(line.len(), 4);
/// ```
pub fn bresenham_line(start: Position, end: Position) -> Vec<Position> {
    let steep = (end.y - start.y).abs() > (end.x - start.x).abs();
    let (from, to) = if steep {
        (Position::new(start.y, start.x), Position::new(end.y, end.x))
    } else {
        (start, end)
    };

    let delta_x = (to.x - from.x).abs();
    let delta_y = (to.y - from.y).abs();
    let x_step = if from.x <= to.x { 1 } else { -1 };
    let y_step = if from.y <= to.y { 1 } else { -1 };

    let mut points = Vec::with_capacity(delta_x as usize + 1);
    let mut error = 0;
    let mut x = from.x;
    let mut y = from.y;
    loop {
        points.push(if steep {
            Position::new(y, x)
        } else {
            Position::new(x, y)
        });
        if x == to.x {
            break;
        }
        error += delta_y;
        if 2 * error >= delta_x {
            y += y_step;
            error -= delta_x;
        }
        x += x_step;
    }
    points
}
