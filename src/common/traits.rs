//! Common traits defining interfaces for grid planning

use crate::common::error::PlannerResult;
use crate::common::types::{Path2D, Point2D};
use crate::utils::OccupancyGrid;

/// Trait for grid-based path planning algorithms
pub trait PathPlanner {
    /// Plan a path from start to goal over the given occupancy grid,
    /// returned in world coordinates.
    fn plan(
        &mut self,
        start: Point2D,
        goal: Point2D,
        grid: &OccupancyGrid,
    ) -> PlannerResult<Path2D>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait seam compiles with an independent implementation
    struct DummyPlanner;

    impl PathPlanner for DummyPlanner {
        fn plan(
            &mut self,
            _start: Point2D,
            _goal: Point2D,
            _grid: &OccupancyGrid,
        ) -> PlannerResult<Path2D> {
            Ok(Path2D::new())
        }
    }

    #[test]
    fn test_path_planner_trait() {
        let ox = [0.0, 2.0];
        let oy = [0.0, 2.0];
        let grid = OccupancyGrid::new(&ox, &oy, 1.0, 0.0).unwrap();
        let mut planner = DummyPlanner;
        let result = planner.plan(Point2D::new(0.0, 0.0), Point2D::new(2.0, 2.0), &grid);
        assert!(result.is_ok());
    }
}
