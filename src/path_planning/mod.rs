// Incremental path planning module

pub mod frontier;
pub mod heuristics;
pub mod lpa_star;
pub mod node_store;

pub use frontier::PriorityFrontier;
pub use lpa_star::{LpaStarConfig, LpaStarPlanner, Outcome, PlannerState};
pub use node_store::NodeStore;
