//! Grid geometry helpers for feasibility testing and fit scoring.
//!
//! This module is the single source of truth for "does this robot fit
//! here" and for the waste metric that best-fit uses to rank candidate
//! positions. All functions are read-only over the grid.

use crate::model::Grid;

/// Checks whether a `width × height` footprint fits at `(x, y)`.
///
/// Fails when the rectangle would leave the grid or when any cell inside
/// it is already occupied. No side effects; every placement strategy
/// routes its candidates through this check.
///
/// # Parameters
/// * `grid` - The occupancy grid
/// * `width` - Footprint width in cells
/// * `height` - Footprint height in cells
/// * `x`, `y` - Candidate top-left cell
pub fn can_place(grid: &Grid, width: usize, height: usize, x: usize, y: usize) -> bool {
    if x + width > grid.size() || y + height > grid.size() {
        return false;
    }

    for dy in 0..height {
        for dx in 0..width {
            if !grid.is_free(x + dx, y + dy) {
                return false;
            }
        }
    }

    true
}

/// Counts empty cells in the 1-cell border around a candidate rectangle.
///
/// Walks offsets `-1..=width` and `-1..=height`, skips the rectangle's
/// own interior, clips to grid bounds, and counts the border cells that
/// are empty. A tight fit against neighbours or grid edges scores low,
/// which is what best-fit minimizes.
///
/// # Returns
/// The number of empty border cells; zero for a perfectly enclosed fit.
pub fn wasted_space(grid: &Grid, width: usize, height: usize, x: usize, y: usize) -> usize {
    let size = grid.size() as isize;
    let (w, h) = (width as isize, height as isize);
    let mut wasted = 0;

    for dy in -1..=h {
        for dx in -1..=w {
            // Interior cells belong to the candidate itself.
            if dx >= 0 && dx < w && dy >= 0 && dy < h {
                continue;
            }
            let cx = x as isize + dx;
            let cy = y as isize + dy;
            if cx < 0 || cx >= size || cy < 0 || cy >= size {
                continue;
            }
            if grid.is_free(cx as usize, cy as usize) {
                wasted += 1;
            }
        }
    }

    wasted
}
