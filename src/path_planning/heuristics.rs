//! Cost-to-goal estimates for the incremental planner
//!
//! All estimates are pure functions over grid cells and return non-negative
//! finite values. Under this planner's uniform unit step cost (diagonal
//! moves cost the same as orthogonal ones) the true distance between two
//! cells is their Chebyshev distance, so `chebyshev` is the tightest
//! admissible estimate; `euclidean` and `octile` are the conventional
//! choices when diagonal moves are weighted.

use crate::common::Cell;

/// Straight-line distance between cell centers
pub fn euclidean(a: &Cell, b: &Cell) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Chebyshev distance: exact remaining cost under uniform unit steps
pub fn chebyshev(a: &Cell, b: &Cell) -> f64 {
    let dx = (a.x - b.x).abs() as f64;
    let dy = (a.y - b.y).abs() as f64;
    dx.max(dy)
}

/// Octile distance: shortest 8-connected distance with sqrt(2) diagonals
pub fn octile(a: &Cell, b: &Cell) -> f64 {
    let dx = (a.x - b.x).abs() as f64;
    let dy = (a.y - b.y).abs() as f64;
    dx.max(dy) + (std::f64::consts::SQRT_2 - 1.0) * dx.min(dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Occupancy;

    fn cell(x: i32, y: i32) -> Cell {
        Cell::new(x, y, 0, Occupancy::Free)
    }

    #[test]
    fn test_euclidean() {
        assert!((euclidean(&cell(0, 0), &cell(3, 4)) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_chebyshev() {
        assert_eq!(chebyshev(&cell(0, 0), &cell(3, 4)), 4.0);
        assert_eq!(chebyshev(&cell(2, 2), &cell(2, 2)), 0.0);
    }

    #[test]
    fn test_octile() {
        let d = octile(&cell(0, 0), &cell(2, 3));
        assert!((d - (3.0 + (std::f64::consts::SQRT_2 - 1.0) * 2.0)).abs() < 1e-10);
    }

    #[test]
    fn test_zero_at_goal() {
        let estimates: [fn(&Cell, &Cell) -> f64; 3] = [euclidean, chebyshev, octile];
        for h in estimates.iter() {
            assert_eq!(h(&cell(5, 7), &cell(5, 7)), 0.0);
        }
    }
}
