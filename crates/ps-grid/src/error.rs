//! Grid-subsystem error types.
//!
//! Construction problems (`GridError`) are fatal to setup.  Search failures
//! (`PathError`) are ordinary results: callers log them and carry on.

use thiserror::Error;

use ps_core::Point2;

/// Errors raised while building an occupancy grid or its graph.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("malformed occupancy grid: row {row} has {found} cells, expected {expected}")]
    Malformed {
        row:      usize,
        expected: usize,
        found:    usize,
    },

    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),

    #[error("unexpected map character {ch:?} at row {row}, column {col}")]
    BadMapChar { ch: char, row: usize, col: usize },
}

pub type GridResult<T> = Result<T, GridError>;

/// Why a path search returned no route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("start {0} lies outside the grid or on a blocked cell")]
    StartBlocked(Point2),

    #[error("goal {0} lies outside the grid or on a blocked cell")]
    GoalBlocked(Point2),

    #[error("no route from {from} to {to}")]
    NoRoute { from: Point2, to: Point2 },
}
