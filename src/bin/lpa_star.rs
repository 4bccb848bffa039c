// LPA* incremental path planning demo

use lpa_planner::{LpaStarConfig, LpaStarPlanner, OccupancyGrid, PathPlanner, Point2D};

fn main() {
    env_logger::init();

    println!("LPA* path planning start!!");

    let sx = 2.0; // start x position [m]
    let sy = 2.0; // start y position [m]
    let gx = 18.0; // goal x position [m]
    let gy = 18.0; // goal y position [m]
    let grid_size = 1.0; // grid size [m]
    let robot_radius = 0.5; // robot radius [m]

    println!("Setting up environment...");

    // Create boundary obstacles
    let mut ox = Vec::new();
    let mut oy = Vec::new();

    for i in 0..21 {
        ox.push(i as f64);
        oy.push(0.0);
        ox.push(i as f64);
        oy.push(20.0);
        ox.push(0.0);
        oy.push(i as f64);
        ox.push(20.0);
        oy.push(i as f64);
    }

    // Add internal obstacle (vertical wall)
    for i in 5..15 {
        ox.push(10.0);
        oy.push(i as f64);
    }

    println!("Created {} obstacles", ox.len());

    let grid = match OccupancyGrid::new(&ox, &oy, grid_size, robot_radius) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Grid construction failed: {}", e);
            return;
        }
    };

    let mut planner = LpaStarPlanner::new(LpaStarConfig::default());

    match planner.plan(Point2D::new(sx, sy), Point2D::new(gx, gy), &grid) {
        Ok(path) => {
            println!("Path found with {} points, length: {:.2}", path.len(), path.total_length());
            for (x, y) in path.x_coords().iter().zip(path.y_coords().iter()) {
                println!("  ({:.1}, {:.1})", x, y);
            }
        }
        Err(e) => {
            println!("Planning failed: {}", e);
        }
    }

    println!("LPA* path planning finish!!");
}
