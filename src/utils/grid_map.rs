//! Occupancy grid for the incremental planner
//!
//! Builds a dense, row-major occupancy classification from obstacle point
//! lists (or directly from a prepared classification matrix) and resolves
//! world coordinates to grid cells. The planner only ever reads from this
//! structure; it snapshots the cells into its own store per episode.

use nalgebra as na;

use crate::common::{Cell, Occupancy, PlannerError, PlannerResult, Point2D};

/// Dense 2D occupancy grid with world-space geometry.
///
/// Cells are addressed by integer `(x, y)` with the row-major id
/// `y * width + x`.
pub struct OccupancyGrid {
    resolution: f64,
    min_x: f64,
    min_y: f64,
    width: usize,
    height: usize,
    occupancy: na::DMatrix<Occupancy>,
}

impl OccupancyGrid {
    /// Build a grid from obstacle positions.
    ///
    /// Bounds come from the obstacle extents. Cells containing an obstacle
    /// point are `Occupied`; remaining cells whose center lies within
    /// `robot_radius` of any obstacle point are `Inflated`.
    pub fn new(
        ox: &[f64],
        oy: &[f64],
        resolution: f64,
        robot_radius: f64,
    ) -> PlannerResult<Self> {
        if ox.is_empty() || oy.is_empty() {
            return Err(PlannerError::EmptyGrid);
        }
        if ox.len() != oy.len() {
            return Err(PlannerError::InvalidParameter(format!(
                "obstacle coordinate lists differ in length: {} vs {}",
                ox.len(),
                oy.len()
            )));
        }
        if resolution <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }

        let min_x = ox.iter().fold(f64::INFINITY, |a, &b| a.min(b)).round();
        let min_y = oy.iter().fold(f64::INFINITY, |a, &b| a.min(b)).round();
        let max_x = ox.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)).round();
        let max_y = oy.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)).round();

        let width = ((max_x - min_x) / resolution).round() as usize + 1;
        let height = ((max_y - min_y) / resolution).round() as usize + 1;

        let mut occupancy = na::DMatrix::from_element(height, width, Occupancy::Free);

        // Obstacle points claim the cell they fall into
        for (&px, &py) in ox.iter().zip(oy.iter()) {
            let ix = ((px - min_x) / resolution).round() as i64;
            let iy = ((py - min_y) / resolution).round() as i64;
            if ix >= 0 && (ix as usize) < width && iy >= 0 && (iy as usize) < height {
                occupancy[(iy as usize, ix as usize)] = Occupancy::Occupied;
            }
        }

        // Inflate free cells within robot_radius of any obstacle point
        for iy in 0..height {
            let y = min_y + iy as f64 * resolution;
            for ix in 0..width {
                if occupancy[(iy, ix)] != Occupancy::Free {
                    continue;
                }
                let x = min_x + ix as f64 * resolution;
                for (&px, &py) in ox.iter().zip(oy.iter()) {
                    let d = ((px - x).powi(2) + (py - y).powi(2)).sqrt();
                    if d <= robot_radius {
                        occupancy[(iy, ix)] = Occupancy::Inflated;
                        break;
                    }
                }
            }
        }

        Ok(Self {
            resolution,
            min_x,
            min_y,
            width,
            height,
            occupancy,
        })
    }

    /// Build a grid directly from a prepared occupancy classification.
    ///
    /// Rows index `y`, columns index `x`; `origin` is the world position of
    /// cell `(0, 0)`.
    pub fn from_occupancy(
        occupancy: na::DMatrix<Occupancy>,
        resolution: f64,
        origin: Point2D,
    ) -> PlannerResult<Self> {
        if occupancy.is_empty() {
            return Err(PlannerError::EmptyGrid);
        }
        if resolution <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }
        let height = occupancy.nrows();
        let width = occupancy.ncols();
        Ok(Self {
            resolution,
            min_x: origin.x,
            min_y: origin.y,
            width,
            height,
            occupancy,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Number of cells in the grid
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major id for in-bounds integer coordinates
    pub fn row_major(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    /// Cell at integer coordinates, `None` when out of bounds
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        let occupancy = self.occupancy[(y as usize, x as usize)];
        Some(Cell::new(x, y, self.row_major(x, y), occupancy))
    }

    /// Dense row-major cell sequence, the planner's snapshot input
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.len());
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let occupancy = self.occupancy[(y as usize, x as usize)];
                cells.push(Cell::new(x, y, self.row_major(x, y), occupancy));
            }
        }
        cells
    }

    /// Resolve a world position to the nearest grid cell at this grid's
    /// resolution, `None` when the position rounds outside the bounds.
    pub fn nearest_cell(&self, position: Point2D) -> Option<Cell> {
        let ix = ((position.x - self.min_x) / self.resolution).round() as i32;
        let iy = ((position.y - self.min_y) / self.resolution).round() as i32;
        self.cell_at(ix, iy)
    }

    /// World position of a cell's center
    pub fn cell_position(&self, cell: &Cell) -> Point2D {
        Point2D::new(
            self.min_x + cell.x as f64 * self.resolution,
            self.min_y + cell.y as f64 * self.resolution,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary_obstacles(size: i32) -> (Vec<f64>, Vec<f64>) {
        let mut ox = Vec::new();
        let mut oy = Vec::new();
        for i in 0..=size {
            ox.push(i as f64);
            oy.push(0.0);
            ox.push(i as f64);
            oy.push(size as f64);
            ox.push(0.0);
            oy.push(i as f64);
            ox.push(size as f64);
            oy.push(i as f64);
        }
        (ox, oy)
    }

    #[test]
    fn test_grid_dimensions_from_extents() {
        let (ox, oy) = boundary_obstacles(10);
        let grid = OccupancyGrid::new(&ox, &oy, 1.0, 0.0).unwrap();
        assert_eq!(grid.width(), 11);
        assert_eq!(grid.height(), 11);
        assert_eq!(grid.len(), 121);
    }

    #[test]
    fn test_obstacle_cells_are_occupied() {
        let (ox, oy) = boundary_obstacles(10);
        let grid = OccupancyGrid::new(&ox, &oy, 1.0, 0.0).unwrap();
        assert_eq!(grid.cell_at(0, 0).unwrap().occupancy, Occupancy::Occupied);
        assert_eq!(grid.cell_at(10, 5).unwrap().occupancy, Occupancy::Occupied);
        assert_eq!(grid.cell_at(5, 5).unwrap().occupancy, Occupancy::Free);
    }

    #[test]
    fn test_inflation_marks_cells_near_obstacles() {
        let (ox, oy) = boundary_obstacles(10);
        let grid = OccupancyGrid::new(&ox, &oy, 1.0, 1.0).unwrap();
        // one cell in from the wall is within the robot radius
        assert_eq!(grid.cell_at(1, 5).unwrap().occupancy, Occupancy::Inflated);
        assert_eq!(grid.cell_at(5, 5).unwrap().occupancy, Occupancy::Free);
    }

    #[test]
    fn test_row_major_ids_are_dense() {
        let (ox, oy) = boundary_obstacles(4);
        let grid = OccupancyGrid::new(&ox, &oy, 1.0, 0.0).unwrap();
        let cells = grid.cells();
        assert_eq!(cells.len(), grid.len());
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.id, i);
            assert_eq!(cell.id, grid.row_major(cell.x, cell.y));
        }
    }

    #[test]
    fn test_nearest_cell_rounds_to_grid() {
        let (ox, oy) = boundary_obstacles(10);
        let grid = OccupancyGrid::new(&ox, &oy, 1.0, 0.0).unwrap();
        let cell = grid.nearest_cell(Point2D::new(4.4, 5.6)).unwrap();
        assert_eq!((cell.x, cell.y), (4, 6));
        assert!(grid.nearest_cell(Point2D::new(-3.0, 5.0)).is_none());
        assert!(grid.nearest_cell(Point2D::new(5.0, 30.0)).is_none());
    }

    #[test]
    fn test_cell_position_round_trip() {
        let (ox, oy) = boundary_obstacles(10);
        let grid = OccupancyGrid::new(&ox, &oy, 1.0, 0.0).unwrap();
        let cell = grid.cell_at(3, 7).unwrap();
        let p = grid.cell_position(&cell);
        assert_eq!(grid.nearest_cell(p).unwrap().id, cell.id);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(
            OccupancyGrid::new(&[], &[], 1.0, 0.0),
            Err(PlannerError::EmptyGrid)
        ));
        assert!(matches!(
            OccupancyGrid::new(&[0.0], &[0.0, 1.0], 1.0, 0.0),
            Err(PlannerError::InvalidParameter(_))
        ));
        assert!(matches!(
            OccupancyGrid::new(&[0.0], &[0.0], 0.0, 0.0),
            Err(PlannerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_occupancy_snapshot() {
        let m = na::DMatrix::from_element(2, 3, Occupancy::Free);
        let grid = OccupancyGrid::from_occupancy(m, 0.5, Point2D::new(1.0, 2.0)).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        let cell = grid.cell_at(2, 1).unwrap();
        let p = grid.cell_position(&cell);
        assert!((p.x - 2.0).abs() < 1e-10);
        assert!((p.y - 2.5).abs() < 1e-10);
    }
}
