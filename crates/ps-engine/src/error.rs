use thiserror::Error;

use ps_core::{CoreError, CrossingId};
use ps_grid::{GridError, PathError};
use ps_route::RouteError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("environment has no walkable cells")]
    EmptyGraph,

    #[error("environment has no crossings")]
    NoCrossings,

    #[error("crossing {0} is declared twice")]
    DuplicateCrossing(CrossingId),

    #[error("unknown crossing {0}")]
    UnknownCrossing(CrossingId),

    #[error("agent {0:?} already exists")]
    DuplicateAgent(String),

    #[error("unknown agent {0:?}")]
    UnknownAgent(String),

    #[error("agent {agent:?} was given a non-finite velocity")]
    NonFiniteVelocity { agent: String },

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("no route: {0}")]
    Path(#[from] PathError),

    #[error("route error: {0}")]
    Route(#[from] RouteError),
}

pub type EngineResult<T> = Result<T, EngineError>;
