//! Data models for the warehouse placement simulation.
//!
//! This module defines the fundamental data structures for 2D grid packing:
//! - `Robot`: a rectangular unit to be placed, with fixed width and height
//! - `Grid`: the square occupancy matrix of the warehouse floor
//! - `PackingSession`: owns one grid plus one robot fleet for a packing run
//!
//! All structures implement the traits from the `types` module where they
//! have spatial extent.

use crate::types::{Footprinted, GridPoint, Rect};

/// Validation error for fleet and grid input data.
#[derive(Debug, Clone)]
pub enum ValidationError {
    InvalidGridSize(String),
    InvalidDimension(String),
    MissingId(String),
    DuplicateId(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidGridSize(msg) => write!(f, "Invalid grid size: {}", msg),
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::MissingId(msg) => write!(f, "Missing id: {}", msg),
            ValidationError::DuplicateId(msg) => write!(f, "Duplicate id: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Helper function to validate a single cell dimension (DRY principle).
fn validate_dimension(value: usize, name: &str, id: &str) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidDimension(format!(
            "{} of robot '{}' must be at least 1 cell, got: {}",
            name, id, value
        )));
    }
    Ok(())
}

/// Represents a rectangular robot unit to be placed on the grid.
///
/// A robot starts unplaced; the placement engine assigns at most one
/// position per packing run. `defective` is a cosmetic attribute carried
/// through from input to output and never read by the engine.
///
/// # Fields
/// * `id` - Unique identifier within one fleet
/// * `width` - Footprint width in cells
/// * `height` - Footprint height in cells
/// * `position` - Top-left cell once placed, `None` while unplaced
/// * `defective` - Flavor flag assigned at load time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Robot {
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub position: Option<GridPoint>,
    pub defective: bool,
}

impl Robot {
    /// Creates a new unplaced robot with validation.
    ///
    /// # Parameters
    /// * `id` - Unique identifier, must be non-empty
    /// * `width` - Footprint width in cells, must be at least 1
    /// * `height` - Footprint height in cells, must be at least 1
    /// * `defective` - Cosmetic flag
    ///
    /// # Returns
    /// `Ok(Robot)` for valid values, otherwise `Err(ValidationError)`
    ///
    /// # Examples
    /// ```
    /// use gridstow::model::Robot;
    ///
    /// let ok = Robot::new("robot_01", 2, 1, false);
    /// assert!(ok.is_ok());
    ///
    /// let bad = Robot::new("robot_02", 0, 1, false);
    /// assert!(bad.is_err());
    /// ```
    pub fn new(
        id: impl Into<String>,
        width: usize,
        height: usize,
        defective: bool,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::MissingId(
                "every robot must carry a non-empty id".to_string(),
            ));
        }
        validate_dimension(width, "Width", &id)?;
        validate_dimension(height, "Height", &id)?;
        Ok(Self {
            id,
            width,
            height,
            position: None,
            defective,
        })
    }

    /// Whether the robot has been assigned a position in the current run.
    #[inline]
    pub fn placed(&self) -> bool {
        self.position.is_some()
    }

    /// The cell rectangle covered by the robot, if placed.
    #[inline]
    pub fn rect(&self) -> Option<Rect> {
        self.position
            .map(|corner| Rect::from_corner(corner, self.footprint()))
    }
}

impl Footprinted for Robot {
    fn footprint(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// The square occupancy matrix of the warehouse floor.
///
/// Each cell is either empty or holds the fleet slot index of the robot
/// occupying it. Mutation calls do not enforce bounds: callers must have
/// verified feasibility beforehand, which keeps the placement hot path
/// free of redundant checks. Overlap is detected by recomputation from
/// robot rectangles, not prevented by this structure.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<usize>>,
}

impl Grid {
    /// Creates an all-empty `size × size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Edge length of the grid in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the occupant slot of a cell, or `None` when empty.
    ///
    /// Callers pass in-bounds coordinates only.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Option<usize> {
        self.cells[y * self.size + x]
    }

    /// Whether a cell is empty. Coordinates must be in bounds.
    #[inline]
    pub fn is_free(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_none()
    }

    /// Marks every cell of the rectangle as occupied by `slot`.
    ///
    /// The caller must already have verified that the rectangle is fully
    /// in bounds and overlaps no occupied cell.
    pub fn occupy(&mut self, slot: usize, x: usize, y: usize, width: usize, height: usize) {
        for dy in 0..height {
            let row = (y + dy) * self.size;
            for dx in 0..width {
                self.cells[row + x + dx] = Some(slot);
            }
        }
    }

    /// Resets every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Number of occupied cells, derived from the stored matrix.
    #[allow(dead_code)]
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// One packing run's worth of state: a grid plus its robot fleet.
///
/// All engine functions operate on an explicit session passed by the
/// caller; there is no ambient global state. Re-running a placement
/// always goes through [`PackingSession::reset_placements`] first so no
/// stale occupancy leaks into the new pass.
#[derive(Clone, Debug)]
pub struct PackingSession {
    grid: Grid,
    robots: Vec<Robot>,
}

impl PackingSession {
    /// Creates a session from a grid size and an already-built fleet.
    ///
    /// The engine accepts any positive grid size; range policy (the 5-50
    /// product constraint) is enforced by the API layer. Duplicate robot
    /// ids are rejected here because downstream accounting keys cells and
    /// results by id.
    pub fn new(grid_size: usize, robots: Vec<Robot>) -> Result<Self, ValidationError> {
        if grid_size == 0 {
            return Err(ValidationError::InvalidGridSize(
                "grid size must be at least 1".to_string(),
            ));
        }
        for (i, robot) in robots.iter().enumerate() {
            if robots[..i].iter().any(|other| other.id == robot.id) {
                return Err(ValidationError::DuplicateId(format!(
                    "robot id '{}' appears more than once",
                    robot.id
                )));
            }
        }
        Ok(Self {
            grid: Grid::new(grid_size),
            robots,
        })
    }

    /// Read access to the occupancy grid.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Edge length of the session grid.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid.size()
    }

    /// Read access to the fleet, in input order.
    #[inline]
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Clears the grid and every robot's placement state.
    ///
    /// After this call the session is indistinguishable from a freshly
    /// created one, regardless of prior run history.
    pub fn reset_placements(&mut self) {
        self.grid.clear();
        for robot in &mut self.robots {
            robot.position = None;
        }
    }

    /// Replaces the grid with a larger (or smaller) one and resets all
    /// placements, since old coordinates are meaningless on the new grid.
    pub fn resize_grid(&mut self, size: usize) {
        self.grid = Grid::new(size);
        for robot in &mut self.robots {
            robot.position = None;
        }
    }

    /// Commits a feasibility-checked placement for the robot at `slot`.
    pub fn place(&mut self, slot: usize, x: usize, y: usize) {
        let (width, height) = self.robots[slot].footprint();
        self.grid.occupy(slot, x, y, width, height);
        self.robots[slot].position = Some(GridPoint::new(x, y));
    }

    /// Total footprint area of the whole fleet, placed or not.
    pub fn total_robot_area(&self) -> usize {
        self.robots.iter().map(Footprinted::area).sum()
    }

    /// Total footprint area of currently placed robots.
    pub fn placed_area(&self) -> usize {
        self.robots
            .iter()
            .filter(|r| r.placed())
            .map(Footprinted::area)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet(specs: &[(&str, usize, usize)]) -> Vec<Robot> {
        specs
            .iter()
            .map(|&(id, w, h)| Robot::new(id, w, h, false).unwrap())
            .collect()
    }

    #[test]
    fn robot_validation() {
        assert!(Robot::new("a", 1, 1, false).is_ok());
        assert!(matches!(
            Robot::new("a", 0, 1, false),
            Err(ValidationError::InvalidDimension(_))
        ));
        assert!(matches!(
            Robot::new("a", 1, 0, true),
            Err(ValidationError::InvalidDimension(_))
        ));
        assert!(matches!(
            Robot::new("   ", 1, 1, false),
            Err(ValidationError::MissingId(_))
        ));
    }

    #[test]
    fn robot_rect_tracks_position() {
        let mut robot = Robot::new("a", 3, 2, false).unwrap();
        assert!(robot.rect().is_none());
        assert!(!robot.placed());

        robot.position = Some(GridPoint::new(1, 4));
        assert!(robot.placed());
        assert_eq!(robot.rect(), Some(Rect::new(1, 4, 3, 2)));
    }

    #[test]
    fn grid_occupy_and_clear() {
        let mut grid = Grid::new(5);
        assert_eq!(grid.occupied_cells(), 0);

        grid.occupy(0, 1, 1, 2, 3);
        assert_eq!(grid.occupied_cells(), 6);
        assert_eq!(grid.cell(1, 1), Some(0));
        assert_eq!(grid.cell(2, 3), Some(0));
        assert!(grid.is_free(0, 0));
        assert!(grid.is_free(3, 1));

        grid.clear();
        assert_eq!(grid.occupied_cells(), 0);
    }

    #[test]
    fn session_rejects_zero_grid() {
        assert!(matches!(
            PackingSession::new(0, Vec::new()),
            Err(ValidationError::InvalidGridSize(_))
        ));
    }

    #[test]
    fn session_rejects_duplicate_ids() {
        let robots = fleet(&[("a", 1, 1), ("b", 2, 2), ("a", 3, 1)]);
        assert!(matches!(
            PackingSession::new(10, robots),
            Err(ValidationError::DuplicateId(_))
        ));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut session = PackingSession::new(6, fleet(&[("a", 2, 2), ("b", 1, 3)])).unwrap();
        session.place(0, 0, 0);
        session.place(1, 4, 2);
        assert_eq!(session.placed_area(), 7);
        assert_eq!(session.grid().occupied_cells(), 7);

        session.reset_placements();
        assert_eq!(session.placed_area(), 0);
        assert_eq!(session.grid().occupied_cells(), 0);
        assert!(session.robots().iter().all(|r| r.position.is_none()));
    }

    #[test]
    fn resize_discards_placements() {
        let mut session = PackingSession::new(4, fleet(&[("a", 2, 2)])).unwrap();
        session.place(0, 2, 2);

        session.resize_grid(9);
        assert_eq!(session.grid_size(), 9);
        assert_eq!(session.grid().occupied_cells(), 0);
        assert!(!session.robots()[0].placed());
    }
}
