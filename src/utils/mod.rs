//! Utility modules for lpa_planner

pub mod grid_map;

pub use grid_map::*;
