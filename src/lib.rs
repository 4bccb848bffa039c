//! lpa_planner - incremental shortest-path planning on occupancy grids
//!
//! This crate provides a Lifelong Planning A* (LPA*) engine for computing
//! and incrementally maintaining start-to-goal routes over a discretized
//! 2D occupancy grid, plus the grid collaborator it plans against.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Cell, Key, Node, Occupancy, Path2D, Point2D, COST_INFINITY};
pub use common::{PathPlanner, PlannerError, PlannerResult};
pub use path_planning::{LpaStarConfig, LpaStarPlanner, Outcome, PlannerState};
pub use utils::OccupancyGrid;
