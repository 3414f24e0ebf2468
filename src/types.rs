//! Common types and traits for the 2D warehouse grid.
//!
//! This module defines the reusable geometry primitives shared by the
//! placement engine and the API layer: cell coordinates, axis-aligned
//! cell rectangles, and a trait abstraction for anything with a footprint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A cell coordinate on the warehouse grid.
///
/// `x` grows to the right, `y` grows downward; `(0, 0)` is the top-left
/// cell. Placed robots store the coordinate of their top-left cell.
///
/// # Examples
/// ```
/// use gridstow::types::GridPoint;
///
/// let origin = GridPoint::new(0, 0);
/// assert_eq!(origin.x, 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
}

impl GridPoint {
    /// Creates a new cell coordinate.
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Converts to tuple format.
    #[inline]
    #[allow(dead_code)]
    pub const fn as_tuple(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}

impl From<(usize, usize)> for GridPoint {
    #[inline]
    fn from(tuple: (usize, usize)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

/// An axis-aligned rectangle of grid cells.
///
/// Covers the half-open cell range `[x, x + width) × [y, y + height)`.
/// Used for overlap detection and for re-deriving occupancy from placed
/// robots independently of the grid array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    /// Creates a new cell rectangle.
    #[inline]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from a top-left corner and a footprint.
    #[inline]
    pub fn from_corner(corner: GridPoint, footprint: (usize, usize)) -> Self {
        Self::new(corner.x, corner.y, footprint.0, footprint.1)
    }

    /// First column to the right of the rectangle.
    #[inline]
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    /// First row below the rectangle.
    #[inline]
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Number of cells covered.
    #[inline]
    #[allow(dead_code)]
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Checks whether two rectangles share at least one cell.
    ///
    /// Two rectangles do NOT overlap when they are separated along at
    /// least one axis.
    #[inline]
    #[allow(dead_code)]
    pub const fn intersects(&self, other: &Self) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Checks whether a cell lies inside the rectangle.
    #[inline]
    pub const fn contains_cell(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Checks whether the rectangle lies fully inside a `size × size` grid.
    #[inline]
    #[allow(dead_code)]
    pub const fn within_grid(&self, size: usize) -> bool {
        self.right() <= size && self.bottom() <= size
    }
}

/// Trait for objects with a rectangular cell footprint.
///
/// Provides a common interface for everything that takes up grid space.
pub trait Footprinted {
    /// Returns the footprint as `(width, height)` in cells.
    fn footprint(&self) -> (usize, usize);

    /// Number of cells the footprint covers.
    fn area(&self) -> usize {
        let (w, h) = self.footprint();
        w * h
    }

    /// Checks whether the footprint can fit a `size × size` grid at all.
    fn fits_grid(&self, size: usize) -> bool {
        let (w, h) = self.footprint();
        w <= size && h <= size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_and_area() {
        let r = Rect::new(2, 3, 4, 2);
        assert_eq!(r.right(), 6);
        assert_eq!(r.bottom(), 5);
        assert_eq!(r.area(), 8);
    }

    #[test]
    fn rect_intersects() {
        let a = Rect::new(0, 0, 3, 3);
        let b = Rect::new(2, 2, 3, 3);
        let c = Rect::new(3, 0, 2, 2);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Touching edges share no cell.
        assert!(!a.intersects(&c));
    }

    #[test]
    fn rect_contains_cell_is_half_open() {
        let r = Rect::new(1, 1, 2, 2);
        assert!(r.contains_cell(1, 1));
        assert!(r.contains_cell(2, 2));
        assert!(!r.contains_cell(3, 1));
        assert!(!r.contains_cell(1, 3));
        assert!(!r.contains_cell(0, 0));
    }

    #[test]
    fn rect_within_grid() {
        assert!(Rect::new(8, 9, 2, 1).within_grid(10));
        assert!(!Rect::new(9, 9, 2, 1).within_grid(10));
        assert!(!Rect::new(0, 0, 11, 1).within_grid(10));
    }

    #[test]
    fn grid_point_conversion() {
        let p: GridPoint = (4, 7).into();
        assert_eq!(p.as_tuple(), (4, 7));
    }
}
