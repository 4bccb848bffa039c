//! Error types for lpa_planner

use std::fmt;

/// Main error type for the incremental planner
#[derive(Debug)]
pub enum PlannerError {
    /// Grid snapshot contained no cells
    EmptyGrid,
    /// Invalid construction parameter
    InvalidParameter(String),
    /// Start or goal position could not be resolved to an in-bounds cell
    UnresolvedEndpoint(String),
    /// The goal cannot be reached from the start over free cells
    Unreachable { iterations: usize },
    /// The optional iteration guard fired before the search terminated
    IterationLimitExceeded(usize),
    /// Row-major id outside the node store's index range
    InvalidNodeId(usize),
    /// Cyclic or dangling parent chain during path extraction
    CorruptPath(String),
    /// Numerical computation failed (NaN key, invalid heuristic value)
    NumericalError(String),
    /// Planner method called before `initialize`
    NotInitialized,
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::EmptyGrid => write!(f, "Grid error: grid contains no cells"),
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::UnresolvedEndpoint(msg) => write!(f, "Unresolved endpoint: {}", msg),
            PlannerError::Unreachable { iterations } => {
                write!(f, "Planning error: goal unreachable after {} iterations", iterations)
            }
            PlannerError::IterationLimitExceeded(max) => {
                write!(f, "Planning error: iteration limit of {} exceeded", max)
            }
            PlannerError::InvalidNodeId(id) => {
                write!(f, "Invariant violation: node id {} out of range", id)
            }
            PlannerError::CorruptPath(msg) => {
                write!(f, "Invariant violation: corrupt path: {}", msg)
            }
            PlannerError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            PlannerError::NotInitialized => {
                write!(f, "Planning error: planner has not been initialized")
            }
        }
    }
}

impl std::error::Error for PlannerError {}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
