//! Lifelong Planning A* over an occupancy grid
//!
//! Incremental variant of A* that maintains, per cell, the best known
//! cost-to-start (`gcost`) and a one-step lookahead (`rhs`) derived from
//! neighbour costs. The search keeps a frontier of locally inconsistent
//! cells ordered by a two-part key and propagates consistency until the
//! goal holds the minimum key and agrees with its lookahead, so a later
//! localized change only reopens the affected region instead of forcing a
//! full replan.
//!
//! All 8 neighbour moves cost one unit; diagonal steps carry no extra
//! weight. Switching to sqrt(2) diagonals would change produced paths.
//!
//! Reference: Koenig, S., Likhachev, M., & Furcy, D. (2004).
//! "Lifelong Planning A*"

use itertools::iproduct;
use log::{debug, trace};

use crate::common::{
    almost_equal, Cell, Key, Node, Path2D, PathPlanner, PlannerError, PlannerResult, Point2D,
    COST_INFINITY,
};
use crate::path_planning::frontier::PriorityFrontier;
use crate::path_planning::heuristics;
use crate::path_planning::node_store::NodeStore;
use crate::utils::OccupancyGrid;

/// Admissible cost-to-goal estimate supplied by the application
pub type HeuristicFn = fn(&Cell, &Cell) -> f64;

/// Configuration for the LPA* planner
#[derive(Debug, Clone)]
pub struct LpaStarConfig {
    /// Cost-to-goal estimate; must be admissible and consistent for the
    /// optimality guarantees to hold
    pub heuristic: HeuristicFn,
    /// Tolerance for the local-consistency comparison of gcost and rhs
    pub tolerance: f64,
    /// Optional cap on search iterations; `None` leaves the search
    /// unbounded
    pub max_iterations: Option<usize>,
}

impl Default for LpaStarConfig {
    fn default() -> Self {
        Self {
            heuristic: heuristics::euclidean,
            tolerance: 1e-6,
            max_iterations: None,
        }
    }
}

/// How a terminated planning episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    Unreachable,
    Exhausted,
}

/// Lifecycle of one planner instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    Uninitialized,
    Initialized,
    Computing,
    Terminated(Outcome),
}

/// Incremental LPA* planner.
///
/// Owns its node store and frontier exclusively for the duration of a
/// planning episode; concurrent episodes need independent instances.
pub struct LpaStarPlanner {
    config: LpaStarConfig,
    store: NodeStore,
    frontier: PriorityFrontier,
    start_id: usize,
    goal_id: usize,
    goal_cell: Option<Cell>,
    width: usize,
    height: usize,
    state: PlannerState,
    path: Vec<Node>,
}

impl LpaStarPlanner {
    pub fn new(config: LpaStarConfig) -> Self {
        Self {
            config,
            store: NodeStore::new(Vec::new()),
            frontier: PriorityFrontier::new(),
            start_id: 0,
            goal_id: 0,
            goal_cell: None,
            width: 0,
            height: 0,
            state: PlannerState::Uninitialized,
            path: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(LpaStarConfig::default())
    }

    pub fn state(&self) -> PlannerState {
        self.state
    }

    /// The path extracted by the last successful computation, start to goal
    pub fn path(&self) -> &[Node] {
        &self.path
    }

    /// Snapshot the grid and seed the search.
    ///
    /// Resolves both endpoints to their nearest in-bounds cells, rebuilds
    /// the node store with every cost at the sentinel, keys the goal and
    /// the start (`rhs = 0`), and seeds the frontier with the start node
    /// alone. Any previously extracted path is discarded.
    pub fn initialize(
        &mut self,
        start: Point2D,
        goal: Point2D,
        grid: &OccupancyGrid,
    ) -> PlannerResult<()> {
        let cells = grid.cells();
        if cells.is_empty() {
            return Err(PlannerError::EmptyGrid);
        }
        let start_cell = grid.nearest_cell(start).ok_or_else(|| {
            PlannerError::UnresolvedEndpoint(format!(
                "start ({:.3}, {:.3}) is outside the grid",
                start.x, start.y
            ))
        })?;
        let goal_cell = grid.nearest_cell(goal).ok_or_else(|| {
            PlannerError::UnresolvedEndpoint(format!(
                "goal ({:.3}, {:.3}) is outside the grid",
                goal.x, goal.y
            ))
        })?;

        self.width = grid.width();
        self.height = grid.height();
        self.start_id = start_cell.id;
        self.goal_id = goal_cell.id;
        self.goal_cell = Some(goal_cell);

        self.store = NodeStore::new(cells.into_iter().map(Node::new).collect());

        let mut goal_node = self.store.get(self.goal_id)?.clone();
        goal_node.hcost = 0.0;
        self.calculate_keys(&mut goal_node)?;
        self.store.set(self.goal_id, goal_node)?;

        let mut start_node = self.store.get(self.start_id)?.clone();
        start_node.rhs = 0.0;
        self.calculate_keys(&mut start_node)?;
        self.store.set(self.start_id, start_node.clone())?;

        self.frontier.clear();
        self.frontier.push(start_node)?;
        self.path.clear();
        self.state = PlannerState::Initialized;

        debug!(
            "initialized {}x{} grid, start id {} at ({}, {}), goal id {} at ({}, {})",
            self.width,
            self.height,
            self.start_id,
            start_cell.x,
            start_cell.y,
            self.goal_id,
            goal_cell.x,
            goal_cell.y
        );
        Ok(())
    }

    /// Propagate consistency until the goal is settled, then extract the
    /// path.
    ///
    /// Each iteration pops the minimum-key node. An overconsistent node
    /// commits its lookahead as the true cost and updates its neighbours;
    /// otherwise the node's cost is reset to the sentinel and the update
    /// also covers the node itself, since its own lookahead may now depend
    /// on different predecessors. Terminates with `Unreachable` when the
    /// free space is exhausted before the goal is settled, and with
    /// `Exhausted` when the configured iteration cap fires first.
    ///
    /// Calling again without an intervening change terminates immediately
    /// and leaves the path unchanged.
    pub fn compute_shortest_path(&mut self) -> PlannerResult<&[Node]> {
        if self.state == PlannerState::Uninitialized {
            return Err(PlannerError::NotInitialized);
        }
        self.state = PlannerState::Computing;

        let mut iterations: usize = 0;
        while self.continue_search()? {
            if let Some(max) = self.config.max_iterations {
                if iterations >= max {
                    self.state = PlannerState::Terminated(Outcome::Exhausted);
                    return Err(PlannerError::IterationLimitExceeded(max));
                }
            }
            iterations += 1;

            let popped = match self.frontier.pop_min() {
                Some(node) => node,
                None => {
                    self.state = PlannerState::Terminated(Outcome::Unreachable);
                    return Err(PlannerError::Unreachable { iterations });
                }
            };
            // the store copy is authoritative; entries are value snapshots
            let mut min = self.store.get(popped.id)?.clone();
            trace!(
                "iteration {}: pop id {} at ({}, {}), g={:.1}, rhs={:.1}",
                iterations,
                min.id,
                min.cell.x,
                min.cell.y,
                min.gcost,
                min.rhs
            );

            if min.gcost > min.rhs {
                // locally overconsistent: the lookahead becomes the true cost
                min.gcost = min.rhs;
                self.store.set(min.id, min.clone())?;
                for id in self.neighbour_ids(&min.cell) {
                    self.update_cell(id)?;
                }
            } else {
                min.gcost = COST_INFINITY;
                self.store.set(min.id, min.clone())?;
                for id in self.neighbour_ids(&min.cell) {
                    self.update_cell(id)?;
                }
                // its own rhs may now need recomputation from its own
                // predecessors
                self.update_cell(min.id)?;
            }
        }

        let goal = self.store.get(self.goal_id)?.clone();
        if goal.gcost >= COST_INFINITY {
            self.state = PlannerState::Terminated(Outcome::Unreachable);
            debug!("goal unreachable after {} iterations", iterations);
            return Err(PlannerError::Unreachable { iterations });
        }

        self.path = self.trace_path(&goal)?;
        self.state = PlannerState::Terminated(Outcome::Found);
        debug!(
            "goal found after {} iterations, path of {} nodes, cost {:.1}",
            iterations,
            self.path.len(),
            goal.gcost
        );
        Ok(&self.path)
    }

    /// Recompute a cell's lookahead and re-queue it when inconsistent.
    ///
    /// Occupied and inflated cells never receive updates and never enter
    /// the frontier. For every other non-start cell the lookahead is one
    /// unit above the cheapest free predecessor; the parent follows that
    /// minimum, ties resolved by the fixed neighbour scan order. When no
    /// predecessor is below the sentinel the lookahead clamps to the
    /// sentinel and the parent clears.
    fn update_cell(&mut self, id: usize) -> PlannerResult<()> {
        let mut n = self.store.get(id)?.clone();
        if !n.cell.is_free() {
            return Ok(());
        }

        if n.id != self.start_id {
            let mut best_cost = COST_INFINITY;
            let mut best_parent = None;
            for pid in self.neighbour_ids(&n.cell) {
                let predecessor = self.store.get(pid)?;
                if !predecessor.cell.is_free() {
                    continue;
                }
                if predecessor.gcost >= COST_INFINITY {
                    continue;
                }
                let cost = predecessor.gcost + 1.0;
                if cost < best_cost {
                    best_cost = cost;
                    best_parent = Some(pid);
                }
            }
            n.rhs = best_cost;
            n.parent = best_parent;
        }

        if self.frontier.contains(n.id) {
            self.frontier.remove(n.id);
        }
        if !almost_equal(n.gcost, n.rhs, self.config.tolerance) {
            self.calculate_keys(&mut n)?;
            self.frontier.push(n.clone())?;
        }
        self.store.set(n.id, n)?;
        Ok(())
    }

    /// Refresh a node's heuristic and two-part key
    fn calculate_keys(&self, n: &mut Node) -> PlannerResult<()> {
        let goal_cell = self.goal_cell.ok_or(PlannerError::NotInitialized)?;
        let h = (self.config.heuristic)(&n.cell, &goal_cell);
        if !h.is_finite() || h < 0.0 {
            return Err(PlannerError::NumericalError(format!(
                "heuristic returned {} for cell ({}, {})",
                h, n.cell.x, n.cell.y
            )));
        }
        n.hcost = h;
        n.key1 = n.gcost.min(n.rhs + n.hcost);
        n.key2 = n.gcost.min(n.rhs);
        Ok(())
    }

    /// Termination test: keep iterating unless the goal holds the overall
    /// minimum key and is locally consistent.
    ///
    /// An empty frontier means every node is consistent, so the goal
    /// trivially holds the minimum; the caller then classifies the episode
    /// by the goal's cost.
    fn continue_search(&mut self) -> PlannerResult<bool> {
        let mut goal = self.store.get(self.goal_id)?.clone();
        goal.hcost = 0.0;
        self.calculate_keys(&mut goal)?;
        let goal_key = Key::new(goal.key1, goal.key2)?;

        let top = match self.frontier.peek_min() {
            None => return Ok(false),
            Some(key) => key,
        };
        let goal_consistent = almost_equal(goal.rhs, goal.gcost, self.config.tolerance);
        Ok(top < goal_key || !goal_consistent)
    }

    /// Row-major ids of the 8 in-bounds neighbours of a cell.
    ///
    /// Fixed scan order: dx outer, dy inner, each over -1, 0, 1 with the
    /// cell itself skipped. Predecessor ties resolve to the first minimum
    /// in this order.
    fn neighbour_ids(&self, cell: &Cell) -> Vec<usize> {
        let x_max = self.width as i32 - 1;
        let y_max = self.height as i32 - 1;
        iproduct!(-1i32..=1, -1i32..=1)
            .filter(|&(dx, dy)| !(dx == 0 && dy == 0))
            .filter_map(|(dx, dy)| {
                let nx = cell.x + dx;
                let ny = cell.y + dy;
                if nx >= 0 && nx <= x_max && ny >= 0 && ny <= y_max {
                    Some(ny as usize * self.width + nx as usize)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Walk parent links back from the goal and reverse into start-to-goal
    /// order. A chain longer than the store or a dangling id is a broken
    /// invariant and fails instead of looping.
    fn trace_path(&self, goal_node: &Node) -> PlannerResult<Vec<Node>> {
        let mut path = vec![goal_node.clone()];
        loop {
            let parent = match path.last().and_then(|n| n.parent) {
                Some(id) => id,
                None => break,
            };
            if path.len() > self.store.len() {
                return Err(PlannerError::CorruptPath(format!(
                    "parent chain exceeds {} nodes",
                    self.store.len()
                )));
            }
            path.push(self.store.get(parent)?.clone());
        }
        path.reverse();
        match path.first() {
            Some(first) if first.id == self.start_id => Ok(path),
            _ => Err(PlannerError::CorruptPath(
                "parent chain does not terminate at the start node".to_string(),
            )),
        }
    }
}

impl PathPlanner for LpaStarPlanner {
    fn plan(
        &mut self,
        start: Point2D,
        goal: Point2D,
        grid: &OccupancyGrid,
    ) -> PlannerResult<Path2D> {
        self.initialize(start, goal, grid)?;
        self.compute_shortest_path()?;
        let points = self
            .path
            .iter()
            .map(|n| grid.cell_position(&n.cell))
            .collect();
        Ok(Path2D::from_points(points))
    }
}
