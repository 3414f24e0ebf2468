//! Placement engine for the warehouse grid.
//!
//! This module implements the three interchangeable placement heuristics
//! used to assign robots to grid positions:
//! - best-fit: largest robots first, tightest surviving gap wins
//! - first-fit: input order, first feasible position wins
//! - bottom-left: largest robots first, pushed down then left
//!
//! A pass consumes a [`PackingSession`], mutates its grid and robot state,
//! and derives utilization and collision statistics from the final state.

use std::cmp::Reverse;

use serde::Serialize;
use utoipa::ToSchema;

use crate::geometry::{can_place, wasted_space};
use crate::model::{Grid, PackingSession, Robot};
use crate::types::{Footprinted, GridPoint};

/// Selectable placement heuristic.
///
/// Unknown selector strings fall back to [`Algorithm::BestFit`], matching
/// the behaviour the frontend relies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    BestFit,
    FirstFit,
    BottomLeft,
}

impl Algorithm {
    /// Resolves a selector string, falling back to best-fit.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "firstfit" | "first_fit" | "first-fit" => Algorithm::FirstFit,
            "bottomleft" | "bottom_left" | "bottom-left" => Algorithm::BottomLeft,
            _ => Algorithm::BestFit,
        }
    }

    /// The canonical selector name, as the API and events report it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::BestFit => "bestFit",
            Algorithm::FirstFit => "firstFit",
            Algorithm::BottomLeft => "bottomLeft",
        }
    }
}

/// Configuration for a packing pass.
///
/// Controls the grid auto-expansion that runs before placement: when the
/// fleet's total footprint exceeds `expand_load_factor` of the grid area,
/// the grid grows to `ceil(sqrt(total_area × expand_headroom))`, capped at
/// `max_grid_size` and never shrinking.
#[derive(Copy, Clone, Debug)]
pub struct PackingConfig {
    /// Whether the grid may grow to make room for a crowded fleet
    pub auto_expand: bool,
    /// Fill ratio above which expansion kicks in (0.0 to 1.0)
    pub expand_load_factor: f64,
    /// Area headroom factor applied when sizing the expanded grid
    pub expand_headroom: f64,
    /// Hard cap on the expanded edge length
    pub max_grid_size: usize,
}

impl PackingConfig {
    pub const DEFAULT_AUTO_EXPAND: bool = true;
    pub const DEFAULT_EXPAND_LOAD_FACTOR: f64 = 0.8;
    pub const DEFAULT_EXPAND_HEADROOM: f64 = 1.5;
    pub const DEFAULT_MAX_GRID_SIZE: usize = 50;

    /// Creates a builder for custom configuration.
    pub fn builder() -> PackingConfigBuilder {
        PackingConfigBuilder::default()
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            auto_expand: Self::DEFAULT_AUTO_EXPAND,
            expand_load_factor: Self::DEFAULT_EXPAND_LOAD_FACTOR,
            expand_headroom: Self::DEFAULT_EXPAND_HEADROOM,
            max_grid_size: Self::DEFAULT_MAX_GRID_SIZE,
        }
    }
}

/// Builder for [`PackingConfig`].
#[derive(Clone, Debug, Default)]
pub struct PackingConfigBuilder {
    config: PackingConfig,
}

impl PackingConfigBuilder {
    /// Enables or disables grid auto-expansion.
    pub fn auto_expand(mut self, enabled: bool) -> Self {
        self.config.auto_expand = enabled;
        self
    }

    /// Sets the fill ratio that triggers expansion.
    pub fn expand_load_factor(mut self, ratio: f64) -> Self {
        self.config.expand_load_factor = ratio;
        self
    }

    /// Sets the area headroom used when sizing the new grid.
    pub fn expand_headroom(mut self, factor: f64) -> Self {
        self.config.expand_headroom = factor;
        self
    }

    /// Sets the maximum edge length expansion may reach.
    pub fn max_grid_size(mut self, size: usize) -> Self {
        self.config.max_grid_size = size;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> PackingConfig {
        self.config
    }
}

/// Reasons why a robot could not be placed.
///
/// An unplaced robot is not an error; the pass records it and continues
/// with the rest of the fleet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnplacedReason {
    ExceedsGridBounds,
    NoFreePosition,
}

impl UnplacedReason {
    pub fn code(&self) -> &'static str {
        match self {
            UnplacedReason::ExceedsGridBounds => "exceeds_grid_bounds",
            UnplacedReason::NoFreePosition => "no_free_position",
        }
    }
}

impl std::fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnplacedReason::ExceedsGridBounds => {
                write!(f, "Robot footprint exceeds the grid in at least one dimension")
            }
            UnplacedReason::NoFreePosition => {
                write!(f, "No free position left on the grid")
            }
        }
    }
}

/// A robot that could not be placed, with the reason.
#[derive(Clone, Debug)]
pub struct UnplacedRobot {
    pub robot: Robot,
    pub reason: UnplacedReason,
}

/// Aggregate statistics derived from the final session state.
///
/// `collisions` is recomputed from robot rectangles rather than read off
/// the grid array, so it catches any placement pass that violates the
/// non-overlap invariant regardless of how the grid was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStats {
    pub total_robots: usize,
    pub placed_robots: usize,
    /// Percentage of grid cells covered by placed robots, rounded.
    pub utilization: u32,
    /// Grid cells covered by more than one placed robot.
    pub collisions: usize,
}

/// Events emitted during a packing pass, for live visualization.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum PackEvent {
    /// The pass begins on a grid of the given size.
    Started {
        algorithm: &'static str,
        grid_size: usize,
    },
    /// Auto-expansion replaced the grid before placement.
    GridExpanded {
        previous_size: usize,
        grid_size: usize,
    },
    /// A robot was committed to a position.
    RobotPlaced {
        id: String,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// A robot stays unplaced for this pass.
    RobotUnplaced {
        id: String,
        width: usize,
        height: usize,
        reason_code: String,
        reason_text: String,
    },
    /// The pass finished; statistics are final.
    Finished { stats: PlacementStats },
}

/// Result of one packing pass.
#[derive(Clone, Debug)]
pub struct PackingResult {
    pub session: PackingSession,
    pub unplaced: Vec<UnplacedRobot>,
    pub stats: PlacementStats,
}

impl PackingResult {
    /// Whether every robot found a position.
    #[allow(dead_code)]
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Number of robots that found a position.
    pub fn placed_count(&self) -> usize {
        self.stats.placed_robots
    }

    /// Number of robots left unplaced.
    #[allow(dead_code)]
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// Final edge length of the grid, after any auto-expansion.
    pub fn grid_size(&self) -> usize {
        self.session.grid_size()
    }
}

/// Runs a packing pass with the default configuration.
///
/// # Parameters
/// * `session` - Grid plus fleet; placement state is reset before the pass
/// * `algorithm` - The heuristic to run
#[allow(dead_code)]
pub fn pack(session: PackingSession, algorithm: Algorithm) -> PackingResult {
    pack_with_config(session, algorithm, PackingConfig::default())
}

/// Runs a packing pass with a custom configuration.
pub fn pack_with_config(
    session: PackingSession,
    algorithm: Algorithm,
    config: PackingConfig,
) -> PackingResult {
    pack_with_progress(session, algorithm, config, |_| {})
}

/// Runs a packing pass and reports each step through a callback.
///
/// The pass itself is synchronous and single-threaded; the callback makes
/// it suitable for SSE streaming when the caller runs it off the request
/// thread. The session's placement state is fully reset before the pass,
/// so stale occupancy can never leak into the new run.
pub fn pack_with_progress(
    mut session: PackingSession,
    algorithm: Algorithm,
    config: PackingConfig,
    mut on_event: impl FnMut(&PackEvent),
) -> PackingResult {
    session.reset_placements();

    on_event(&PackEvent::Started {
        algorithm: algorithm.as_str(),
        grid_size: session.grid_size(),
    });

    if config.auto_expand {
        if let Some(new_size) = expanded_grid_size(&session, &config) {
            let previous_size = session.grid_size();
            session.resize_grid(new_size);
            on_event(&PackEvent::GridExpanded {
                previous_size,
                grid_size: new_size,
            });
        }
    }

    let mut unplaced = Vec::new();

    for slot in placement_order(session.robots(), algorithm) {
        let (width, height) = session.robots()[slot].footprint();

        match find_position(session.grid(), width, height, algorithm) {
            Some(point) => {
                session.place(slot, point.x, point.y);
                let robot = &session.robots()[slot];
                on_event(&PackEvent::RobotPlaced {
                    id: robot.id.clone(),
                    x: point.x,
                    y: point.y,
                    width,
                    height,
                });
            }
            None => {
                let robot = session.robots()[slot].clone();
                let reason = if robot.fits_grid(session.grid_size()) {
                    UnplacedReason::NoFreePosition
                } else {
                    UnplacedReason::ExceedsGridBounds
                };
                on_event(&PackEvent::RobotUnplaced {
                    id: robot.id.clone(),
                    width,
                    height,
                    reason_code: reason.code().to_string(),
                    reason_text: reason.to_string(),
                });
                unplaced.push(UnplacedRobot { robot, reason });
            }
        }
    }

    let stats = collect_stats(&session);
    debug_assert_eq!(
        stats.collisions, 0,
        "placement pass committed overlapping robots"
    );
    on_event(&PackEvent::Finished { stats });

    PackingResult {
        session,
        unplaced,
        stats,
    }
}

/// Fleet processing order for a heuristic.
///
/// First-fit keeps input order. Best-fit and bottom-left sort descending
/// by footprint area; the stable sort keeps relative input order between
/// equal areas, which makes all three passes deterministic.
fn placement_order(robots: &[Robot], algorithm: Algorithm) -> Vec<usize> {
    let mut order: Vec<usize> = (0..robots.len()).collect();
    match algorithm {
        Algorithm::FirstFit => {}
        Algorithm::BestFit | Algorithm::BottomLeft => {
            order.sort_by_key(|&slot| Reverse(robots[slot].area()));
        }
    }
    order
}

/// Picks a position for one footprint according to the heuristic.
fn find_position(
    grid: &Grid,
    width: usize,
    height: usize,
    algorithm: Algorithm,
) -> Option<GridPoint> {
    match algorithm {
        Algorithm::FirstFit => first_feasible_position(grid, width, height),
        Algorithm::BestFit => tightest_position(grid, width, height),
        Algorithm::BottomLeft => bottom_left_position(grid, width, height),
    }
}

/// First feasible position in row-major scan order (y outer, x inner).
fn first_feasible_position(
    grid: &Grid,
    width: usize,
    height: usize,
) -> Option<GridPoint> {
    let size = grid.size();
    if width > size || height > size {
        return None;
    }
    for y in 0..=size - height {
        for x in 0..=size - width {
            if can_place(grid, width, height, x, y) {
                return Some(GridPoint::new(x, y));
            }
        }
    }
    None
}

/// Feasible position with minimal wasted border space.
///
/// Strict `<` on the comparison keeps the first row-major candidate on
/// ties, which the determinism guarantee depends on.
fn tightest_position(grid: &Grid, width: usize, height: usize) -> Option<GridPoint> {
    let size = grid.size();
    if width > size || height > size {
        return None;
    }

    let mut best: Option<(GridPoint, usize)> = None;
    for y in 0..=size - height {
        for x in 0..=size - width {
            if !can_place(grid, width, height, x, y) {
                continue;
            }
            let waste = wasted_space(grid, width, height, x, y);
            if best.is_none_or(|(_, min)| waste < min) {
                best = Some((GridPoint::new(x, y), waste));
            }
        }
    }
    best.map(|(point, _)| point)
}

/// Feasible position with maximal y, then minimal x.
///
/// Approximates bottom-left-justified packing without skyline tracking:
/// any lower row wins, and within the lowest reachable row the leftmost
/// feasible column wins.
fn bottom_left_position(
    grid: &Grid,
    width: usize,
    height: usize,
) -> Option<GridPoint> {
    let size = grid.size();
    if width > size || height > size {
        return None;
    }

    let mut best: Option<GridPoint> = None;
    for y in 0..=size - height {
        for x in 0..=size - width {
            if !can_place(grid, width, height, x, y) {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => y > current.y || (y == current.y && x < current.x),
            };
            if better {
                best = Some(GridPoint::new(x, y));
            }
        }
    }
    best
}

/// Computes the expanded grid edge for a crowded fleet, if any.
fn expanded_grid_size(session: &PackingSession, config: &PackingConfig) -> Option<usize> {
    let total_area = session.total_robot_area();
    let grid_cells = session.grid_size() * session.grid_size();
    if (total_area as f64) <= grid_cells as f64 * config.expand_load_factor {
        return None;
    }

    let target = (total_area as f64 * config.expand_headroom).sqrt().ceil() as usize;
    let new_size = target.min(config.max_grid_size);
    (new_size > session.grid_size()).then_some(new_size)
}

/// Derives the aggregate statistics from the final session state.
///
/// Utilization is `round(100 × placed area / grid area)`. The collision
/// tally counts grid cells covered by more than one placed robot's
/// rectangle; it deliberately ignores the grid's stored occupancy and is
/// run after every pass as the authoritative overlap detector.
pub fn collect_stats(session: &PackingSession) -> PlacementStats {
    let size = session.grid_size();
    let grid_cells = size * size;
    let placed_area = session.placed_area();

    let utilization = if grid_cells == 0 {
        0
    } else {
        ((placed_area * 100) as f64 / grid_cells as f64).round() as u32
    };

    let rects: Vec<_> = session.robots().iter().filter_map(|r| r.rect()).collect();
    let mut collisions = 0;
    for y in 0..size {
        for x in 0..size {
            let covering = rects.iter().filter(|r| r.contains_cell(x, y)).count();
            if covering > 1 {
                collisions += 1;
            }
        }
    }

    PlacementStats {
        total_robots: session.robots().len(),
        placed_robots: session.robots().iter().filter(|r| r.placed()).count(),
        utilization,
        collisions,
    }
}
